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


//! User-facing acknowledgements.
//!
//! Every outcome a screen reports (favorite toggled, account registered,
//! login attempted, any failure) is turned into a [`Notice`] here, so the
//! wording lives in one place.

use std::fmt;

use songbook_playback::PlaybackError;
use songbook_store::{AccountError, FavoriteAction, StorageError};

use crate::{
    catalog::CatalogError,
    services::{FavoritesServiceError, LoginSession},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr,
)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level:   NoticeLevel,
    pub title:   String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, "Success", message)
    }

    pub fn info(message: impl Into<String>) -> Self { Self::new(NoticeLevel::Info, "Info", message) }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }

    pub fn registered(username: &str) -> Self {
        Self::success(format!("Account {username} created. You can log in now."))
    }

    /// Outcome of a login attempt: the opened session, or `None` when the
    /// credentials did not match.
    pub fn login(session: Option<&LoginSession>) -> Self {
        session.map_or_else(
            || Self::error("Login failed", "Invalid username or password."),
            |session| Self::success(format!("Welcome, {}!", session.username)),
        )
    }

    pub const fn is_error(&self) -> bool { matches!(self.level, NoticeLevel::Error) }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.title, self.message)
    }
}

impl From<FavoriteAction> for Notice {
    fn from(action: FavoriteAction) -> Self {
        match action {
            FavoriteAction::Added => Self::success("Song added to favorites!"),
            FavoriteAction::Removed => Self::info("Song removed from favorites."),
        }
    }
}

impl From<&AccountError> for Notice {
    fn from(err: &AccountError) -> Self {
        match err {
            AccountError::EmptyCredentials { .. } | AccountError::DuplicateUsername { .. } => {
                Self::error("Registration failed", err.to_string())
            }
            AccountError::StorageUnavailable { .. } => {
                Self::error("Error", "Accounts are unavailable right now. Try again later.")
            }
        }
    }
}

impl From<&StorageError> for Notice {
    fn from(_: &StorageError) -> Self {
        Self::error("Error", "Favorites are unavailable right now. Try again later.")
    }
}

impl From<&FavoritesServiceError> for Notice {
    fn from(err: &FavoritesServiceError) -> Self {
        match err {
            FavoritesServiceError::UnknownSong { .. } => Self::error("Error", err.to_string()),
            FavoritesServiceError::Storage { source, .. } => source.into(),
        }
    }
}

impl From<&PlaybackError> for Notice {
    fn from(err: &PlaybackError) -> Self {
        match err {
            PlaybackError::Load { song_id, .. } => {
                Self::error("Playback failed", format!("Could not load song {song_id}."))
            }
            PlaybackError::Start { song_id, .. } => {
                Self::error("Playback failed", format!("Could not play song {song_id}."))
            }
            PlaybackError::Halt { song_id, .. } => {
                Self::error("Playback failed", format!("Could not stop song {song_id}."))
            }
            PlaybackError::Release { .. } | PlaybackError::Disposed { .. } => {
                Self::error("Playback failed", err.to_string())
            }
        }
    }
}

impl From<&CatalogError> for Notice {
    fn from(err: &CatalogError) -> Self { Self::error("Catalog error", err.to_string()) }
}
