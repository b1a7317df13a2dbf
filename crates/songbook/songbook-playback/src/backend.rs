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

//! The audio runtime consumed by [`PlaybackController`].
//!
//! [`PlaybackController`]: crate::PlaybackController

use std::{
    fmt,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Location of an encoded audio stream bound to one song.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::From,
)]
#[serde(transparent)]
pub struct AudioSource(PathBuf);

impl AudioSource {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self(path.into()) }

    pub fn path(&self) -> &Path { &self.0 }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.display().fmt(f) }
}

/// Anything the controller can play.
pub trait Playable {
    /// Stable identity used to decide whether a resource can be reused.
    fn id(&self) -> &str;

    fn source(&self) -> &AudioSource;
}

/// Failure reported by an [`AudioBackend`].
#[derive(Debug)]
pub struct AudioError {
    message: String,
    source:  Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AudioError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source:  None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source:  Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str { &self.message }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.message) }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Platform audio runtime.
///
/// Every call may suspend and every call may fail. A resource returned by
/// [`open`](AudioBackend::open) must eventually be handed back to
/// [`release`](AudioBackend::release).
#[async_trait]
pub trait AudioBackend: Send + Sync + 'static {
    /// A loaded, decodable stream.
    type Resource: Send + 'static;

    async fn open(&self, source: &AudioSource) -> Result<Self::Resource, AudioError>;

    async fn start(&self, resource: &mut Self::Resource) -> Result<(), AudioError>;

    async fn halt(&self, resource: &mut Self::Resource) -> Result<(), AudioError>;

    async fn release(&self, resource: Self::Resource) -> Result<(), AudioError>;
}
