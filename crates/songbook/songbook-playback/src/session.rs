// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scoped playback for a screen's lifetime.
//!
//! Operations on a [`PlaybackHandle`] are serialized: a `dispose` issued
//! while a `play` is still loading waits for that `play` to finish and then
//! releases whatever it loaded. Anything issued after `dispose` fails with
//! [`PlaybackError::Disposed`](crate::PlaybackError::Disposed).

use std::{future::Future, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::error;

use crate::{
    backend::{AudioBackend, Playable},
    controller::{PlaybackController, PlaybackState},
    err::Result,
};

/// Cloneable, shareable access to one [`PlaybackController`].
pub struct PlaybackHandle<B: AudioBackend> {
    inner: Arc<Mutex<PlaybackController<B>>>,
}

impl<B: AudioBackend> Clone for PlaybackHandle<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: AudioBackend> PlaybackHandle<B> {
    pub fn new(backend: B) -> Self { Self::from_controller(PlaybackController::new(backend)) }

    pub fn from_controller(controller: PlaybackController<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub async fn play(&self, song: &(impl Playable + Sync + ?Sized)) -> Result<()> {
        self.inner.lock().await.play(song).await
    }

    pub async fn stop(&self) -> Result<()> { self.inner.lock().await.stop().await }

    pub async fn dispose(&self) -> Result<()> { self.inner.lock().await.dispose().await }

    pub async fn state(&self) -> PlaybackState { self.inner.lock().await.state() }

    pub async fn current_song(&self) -> Option<String> {
        self.inner.lock().await.current_song().map(ToOwned::to_owned)
    }
}

/// Run `body` with a fresh playback handle and dispose it on every exit.
///
/// Disposal runs after `body` returns, whatever it returns, and also when it
/// panics; the panic is resumed once the resource has been released. The
/// outer `Err` is reserved for a failed disposal; errors of `body` travel
/// inside `T`.
pub async fn with_playback<B, F, Fut, T>(backend: B, body: F) -> Result<T>
where
    B: AudioBackend,
    F: FnOnce(PlaybackHandle<B>) -> Fut,
    Fut: Future<Output = T>,
{
    let handle = PlaybackHandle::new(backend);
    let outcome = AssertUnwindSafe(body(handle.clone())).catch_unwind().await;

    let disposed = handle.dispose().await;
    if let Err(e) = &disposed {
        error!(error = %e, "Failed to dispose playback scope");
    }

    match outcome {
        Ok(value) => disposed.map(|()| value),
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
