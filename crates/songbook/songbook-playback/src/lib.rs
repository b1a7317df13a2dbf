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

//! Playback resource lifecycle.
//!
//! A [`PlaybackController`] owns at most one loaded audio resource and is
//! tied to the lifetime of the screen that created it. The audio runtime is
//! consumed through the [`AudioBackend`] trait.

pub mod backend;
pub mod controller;
pub mod err;
pub mod session;

pub use backend::{AudioBackend, AudioError, AudioSource, Playable};
pub use controller::{PlaybackController, PlaybackState};
pub use err::{PlaybackError, Result};
pub use session::{PlaybackHandle, with_playback};
