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

use songbook_store::{AccountStore, FavoritesStore, KvStore};
use tracing::info;

use crate::{
    catalog::Catalog,
    config::AppConfig,
    services::{AccountService, FavoritesService},
};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config:    AppConfig,
    kv:        KvStore,
    catalog:   Catalog,
    accounts:  Arc<AccountService>,
    favorites: Arc<FavoritesService>,
}

impl AppState {
    /// Open the configured store and wire the services over it.
    ///
    /// # Errors
    /// Returns an error if the store cannot be opened or migrated.
    pub async fn new(config: AppConfig, catalog: Catalog) -> anyhow::Result<Self> {
        let kv = KvStore::open_with(&config.store).await?;
        info!(backend = %config.store.backend, songs = catalog.len(), "Store opened");
        Ok(Self::with_store(kv, config, catalog))
    }

    /// Wire the services over an already opened store.
    pub fn with_store(kv: KvStore, config: AppConfig, catalog: Catalog) -> Self {
        let accounts = Arc::new(AccountService::new(AccountStore::new(kv.clone())));
        let favorites = Arc::new(FavoritesService::new(
            FavoritesStore::new(kv.clone()),
            catalog.clone(),
        ));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                kv,
                catalog,
                accounts,
                favorites,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig { &self.inner.config }

    pub fn catalog(&self) -> &Catalog { &self.inner.catalog }

    pub fn kv(&self) -> KvStore { self.inner.kv.clone() }

    pub(crate) fn account_service(&self) -> &Arc<AccountService> { &self.inner.accounts }

    pub(crate) fn favorites_service(&self) -> &Arc<FavoritesService> { &self.inner.favorites }

    /// Close the store. Services fail with a closed-store error afterwards.
    pub async fn close(&self) -> songbook_store::Result<()> {
        self.inner.kv.close().await?;
        info!("Store closed");
        Ok(())
    }
}
