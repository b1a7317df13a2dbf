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

//! Lifecycle of the single audio resource owned by a screen.
//!
//! ```text
//!            play                 stop
//!   Idle ──────────► Loaded ─► Playing ───► Loaded ─► ...
//!    ▲  open failed    │  start failed          │
//!    └─────────────────┘                        │ dispose (from any state)
//!                                               ▼
//!                                           Unloaded
//! ```

use std::sync::Arc;

use snafu::{ResultExt, ensure};
use tracing::{debug, error, info, warn};

use crate::{
    backend::{AudioBackend, Playable},
    err::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PlaybackState {
    /// No resource loaded.
    Idle,
    /// A resource is loaded but not playing.
    Loaded,
    Playing,
    /// Disposed; terminal.
    Unloaded,
}

struct LoadedTrack<R> {
    song_id:  String,
    resource: R,
}

/// Owns at most one loaded audio resource.
///
/// [`dispose`](Self::dispose) must run once the owning screen goes away;
/// [`with_playback`](crate::with_playback) guarantees that. A controller
/// dropped while still holding a resource releases it on the ambient tokio
/// runtime and logs a warning.
pub struct PlaybackController<B: AudioBackend> {
    backend: Arc<B>,
    state:   PlaybackState,
    current: Option<LoadedTrack<B::Resource>>,
}

impl<B: AudioBackend> PlaybackController<B> {
    pub fn new(backend: B) -> Self { Self::with_shared_backend(Arc::new(backend)) }

    pub const fn with_shared_backend(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: PlaybackState::Idle,
            current: None,
        }
    }

    pub const fn state(&self) -> PlaybackState { self.state }

    pub fn is_disposed(&self) -> bool { self.state == PlaybackState::Unloaded }

    /// Id of the song whose resource is currently loaded.
    pub fn current_song(&self) -> Option<&str> {
        self.current.as_ref().map(|track| track.song_id.as_str())
    }

    /// Load `song` and start it.
    ///
    /// A resource loaded for a different song is released first. Replaying
    /// the song that is already playing does nothing; replaying a stopped
    /// song restarts it on the loaded resource. On failure the controller is
    /// left `Idle` with nothing loaded.
    pub async fn play(&mut self, song: &(impl Playable + ?Sized)) -> Result<()> {
        ensure!(self.state != PlaybackState::Unloaded, DisposedSnafu);
        let song_id = song.id();

        if self.current_song() == Some(song_id) {
            if self.state == PlaybackState::Playing {
                return Ok(());
            }
            return self.start_current().await;
        }

        self.release_current().await?;

        let resource = self
            .backend
            .open(song.source())
            .await
            .context(LoadSnafu { song_id })?;
        self.current = Some(LoadedTrack {
            song_id: song_id.to_owned(),
            resource,
        });
        self.state = PlaybackState::Loaded;
        debug!(song_id, source = %song.source(), "Loaded audio");

        self.start_current().await
    }

    /// Halt playback, keeping the resource loaded. A no-op unless playing.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        let Some(track) = self.current.as_mut() else {
            return Ok(());
        };

        self.backend
            .halt(&mut track.resource)
            .await
            .context(HaltSnafu {
                song_id: track.song_id.as_str(),
            })?;
        self.state = PlaybackState::Loaded;
        debug!(song_id = %track.song_id, "Playback halted");
        Ok(())
    }

    /// Release any loaded resource and enter `Unloaded`.
    ///
    /// Only the first call does anything. The controller ends up `Unloaded`
    /// even when the release itself fails.
    pub async fn dispose(&mut self) -> Result<()> {
        if self.state == PlaybackState::Unloaded {
            return Ok(());
        }

        let released = self.release_current().await;
        self.state = PlaybackState::Unloaded;
        info!("Playback controller disposed");
        released
    }

    async fn start_current(&mut self) -> Result<()> {
        let Some(track) = self.current.as_mut() else {
            return Ok(());
        };
        let song_id = track.song_id.clone();

        let started = self.backend.start(&mut track.resource).await;
        match started {
            Ok(()) => {
                self.state = PlaybackState::Playing;
                info!(%song_id, "Playback started");
                Ok(())
            }
            Err(source) => {
                if let Some(track) = self.current.take() {
                    if let Err(e) = self.backend.release(track.resource).await {
                        warn!(%song_id, error = %e, "Failed to release audio after start failure");
                    }
                }
                self.state = PlaybackState::Idle;
                Err(source).context(StartSnafu { song_id })
            }
        }
    }

    async fn release_current(&mut self) -> Result<()> {
        let Some(LoadedTrack { song_id, resource }) = self.current.take() else {
            return Ok(());
        };
        self.state = PlaybackState::Idle;

        self.backend
            .release(resource)
            .await
            .context(ReleaseSnafu {
                song_id: song_id.as_str(),
            })?;
        debug!(%song_id, "Released audio");
        Ok(())
    }
}

impl<B: AudioBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) {
        let Some(LoadedTrack { song_id, resource }) = self.current.take() else {
            return;
        };
        warn!(%song_id, "Playback controller dropped without dispose, releasing audio");

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let backend = Arc::clone(&self.backend);
                runtime.spawn(async move {
                    if let Err(e) = backend.release(resource).await {
                        warn!(%song_id, error = %e, "Failed to release leaked audio");
                    }
                });
            }
            Err(_) => error!(%song_id, "No tokio runtime to release leaked audio"),
        }
    }
}
