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

use snafu::Snafu;

use crate::backend::AudioError;

pub type Result<T> = std::result::Result<T, PlaybackError>;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum PlaybackError {
    #[snafu(display("Failed to load audio for song {song_id}"))]
    Load {
        song_id: String,
        source:  AudioError,
        #[snafu(implicit)]
        loc:     snafu::Location,
    },

    #[snafu(display("Failed to start playback of song {song_id}"))]
    Start {
        song_id: String,
        source:  AudioError,
        #[snafu(implicit)]
        loc:     snafu::Location,
    },

    #[snafu(display("Failed to halt playback of song {song_id}"))]
    Halt {
        song_id: String,
        source:  AudioError,
        #[snafu(implicit)]
        loc:     snafu::Location,
    },

    #[snafu(display("Failed to release audio for song {song_id}"))]
    Release {
        song_id: String,
        source:  AudioError,
        #[snafu(implicit)]
        loc:     snafu::Location,
    },

    #[snafu(display("Playback controller has been disposed"))]
    Disposed {
        #[snafu(implicit)]
        loc: snafu::Location,
    },
}
