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

//! Persisted set of favorite song ids.
//!
//! The set is stored under [`FAVORITES_KEY`] as a JSON array in insertion
//! order; membership is all that callers can observe.

use std::collections::BTreeSet;

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::{
    err::Error,
    kv::{KvStore, Mutation},
};

/// Storage key holding the favorite song ids.
pub const FAVORITES_KEY: &str = "favorites";

/// What a toggle did to the set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum FavoriteAction {
    Added,
    Removed,
}

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum StorageError {
    #[snafu(display("Favorites storage unavailable"))]
    StorageUnavailable {
        source: Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },
}

#[derive(Clone)]
pub struct FavoritesStore {
    kv: KvStore,
}

impl FavoritesStore {
    pub const fn new(kv: KvStore) -> Self { Self { kv } }

    pub async fn is_favorite(&self, song_id: &str) -> Result<bool, StorageError> {
        Ok(self.load().await?.iter().any(|id| id == song_id))
    }

    /// Remove `song_id` if present, insert it otherwise, and persist the
    /// resulting set.
    #[tracing::instrument(level = "trace", skip(self), err)]
    pub async fn toggle_favorite(&self, song_id: &str) -> Result<FavoriteAction, StorageError> {
        let song_id = song_id.to_owned();
        let action = self
            .kv
            .update(FAVORITES_KEY, move |ids: &mut Vec<String>| {
                let before = ids.len();
                ids.retain(|id| *id != song_id);
                if ids.len() == before {
                    ids.push(song_id);
                    Mutation::Write(FavoriteAction::Added)
                } else {
                    Mutation::Write(FavoriteAction::Removed)
                }
            })
            .await
            .context(StorageUnavailableSnafu)?;

        debug!(%action, "Toggled favorite");
        Ok(action)
    }

    /// Insert `song_id` unless already present; `true` when it was added.
    #[tracing::instrument(level = "trace", skip(self), err)]
    pub async fn add_favorite(&self, song_id: &str) -> Result<bool, StorageError> {
        let song_id = song_id.to_owned();
        self.kv
            .update(FAVORITES_KEY, move |ids: &mut Vec<String>| {
                if ids.contains(&song_id) {
                    Mutation::Skip(false)
                } else {
                    ids.push(song_id);
                    Mutation::Write(true)
                }
            })
            .await
            .context(StorageUnavailableSnafu)
    }

    pub async fn list_favorites(&self) -> Result<BTreeSet<String>, StorageError> {
        Ok(self.load().await?.into_iter().collect())
    }

    async fn load(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .kv
            .get(FAVORITES_KEY)
            .await
            .context(StorageUnavailableSnafu)?
            .unwrap_or_default())
    }
}
