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


use std::sync::Arc;

use snafu::{ResultExt, Snafu, ensure};
use songbook_store::{FavoriteAction, FavoritesStore, StorageError};
use tracing::info;

use crate::{
    app_state::AppState,
    catalog::{Catalog, Song},
};

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum FavoritesServiceError {
    #[snafu(display("Song {song_id} is not in the catalog"))]
    UnknownSong {
        song_id: String,
        #[snafu(implicit)]
        loc:     snafu::Location,
    },

    #[snafu(display("Failed to access favorites"))]
    Storage {
        source: StorageError,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },
}

/// Favorites restricted to songs of the catalog.
pub struct FavoritesService {
    store:   FavoritesStore,
    catalog: Catalog,
}

impl FavoritesService {
    pub const fn new(store: FavoritesStore, catalog: Catalog) -> Self { Self { store, catalog } }

    /// Toggle a catalog song. Unknown ids are rejected before storage is
    /// touched.
    pub async fn toggle(&self, song_id: &str) -> Result<FavoriteAction, FavoritesServiceError> {
        ensure!(
            self.catalog.contains(song_id),
            UnknownSongSnafu { song_id }
        );
        let action = self
            .store
            .toggle_favorite(song_id)
            .await
            .context(StorageSnafu)?;
        info!(song_id, %action, "Favorite toggled");
        Ok(action)
    }

    pub async fn is_favorite(&self, song_id: &str) -> Result<bool, FavoritesServiceError> {
        self.store.is_favorite(song_id).await.context(StorageSnafu)
    }

    /// Favorite songs in catalog order. Stored ids with no catalog entry are
    /// skipped.
    pub async fn favorite_songs(&self) -> Result<Vec<Song>, FavoritesServiceError> {
        let ids = self.store.list_favorites().await.context(StorageSnafu)?;
        Ok(self.catalog.resolve(&ids))
    }
}

pub trait FavoritesServiceExt {
    fn favorites(&self) -> &Arc<FavoritesService>;
}

impl FavoritesServiceExt for AppState {
    fn favorites(&self) -> &Arc<FavoritesService> { self.favorites_service() }
}
