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

use std::{
    collections::BTreeSet,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use snafu::ensure;
use songbook_common_telemetry::init_default_ut_logging;
use songbook_store::{
    AccountError, AccountStore, FavoriteAction, FavoritesStore, KvBackend, KvStore,
    MemoryBackend, StorageError, StoreConfig, err::UnavailableSnafu,
};
use tempfile::TempDir;

/// Memory backend whose reads or writes can be switched off.
#[derive(Default)]
struct FlakyBackend {
    inner:       MemoryBackend,
    fail_reads:  Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

#[async_trait]
impl KvBackend for FlakyBackend {
    async fn get(&self, key: &str) -> songbook_store::Result<Option<String>> {
        ensure!(
            !self.fail_reads.load(Ordering::SeqCst),
            UnavailableSnafu { message: "read refused" }
        );
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> songbook_store::Result<()> {
        ensure!(
            !self.fail_writes.load(Ordering::SeqCst),
            UnavailableSnafu { message: "write refused" }
        );
        self.inner.set(key, value).await
    }

    async fn close(&self) -> songbook_store::Result<()> { Ok(()) }
}

fn sqlite_config(dir: &TempDir) -> StoreConfig {
    StoreConfig::builder()
        .db_path(dir.path().join("songbook.db"))
        .build()
}

#[tokio::test]
async fn favorites_scenario_over_sqlite() {
    init_default_ut_logging();
    let tempdir = TempDir::new().unwrap();
    let kv = KvStore::open_with(&sqlite_config(&tempdir)).await.unwrap();
    let favorites = FavoritesStore::new(kv.clone());

    assert_eq!(favorites.toggle_favorite("1").await.unwrap(), FavoriteAction::Added);
    assert_eq!(favorites.toggle_favorite("2").await.unwrap(), FavoriteAction::Added);
    assert_eq!(favorites.toggle_favorite("1").await.unwrap(), FavoriteAction::Removed);

    assert_eq!(
        favorites.list_favorites().await.unwrap(),
        BTreeSet::from(["2".to_string()])
    );
    kv.close().await.unwrap();
}

#[tokio::test]
async fn accounts_and_favorites_survive_reopen() {
    init_default_ut_logging();
    let tempdir = TempDir::new().unwrap();
    let config = sqlite_config(&tempdir);

    let kv = KvStore::open_with(&config).await.unwrap();
    AccountStore::new(kv.clone()).register("bob", "pw").await.unwrap();
    FavoritesStore::new(kv.clone()).toggle_favorite("4").await.unwrap();
    kv.close().await.unwrap();

    let kv = KvStore::open_with(&config).await.unwrap();
    let accounts = AccountStore::new(kv.clone());
    assert!(accounts.login("bob", "pw").await.unwrap());
    assert!(!accounts.login("bob", "wrong").await.unwrap());
    assert!(FavoritesStore::new(kv.clone()).is_favorite("4").await.unwrap());
    assert!(matches!(
        accounts.register("bob", "other").await.unwrap_err(),
        AccountError::DuplicateUsername { .. }
    ));
}

#[tokio::test]
async fn odd_toggle_counts_stay_favorite() {
    init_default_ut_logging();
    let favorites = FavoritesStore::new(KvStore::in_memory());
    let toggles = ["a", "b", "c", "a", "d", "b", "a"];

    for id in toggles {
        favorites.toggle_favorite(id).await.unwrap();
    }

    let expected: BTreeSet<String> = ["a", "c", "d"].iter().map(ToString::to_string).collect();
    assert_eq!(favorites.list_favorites().await.unwrap(), expected);
}

#[tokio::test]
async fn concurrent_toggles_on_one_store_all_land() {
    init_default_ut_logging();
    let favorites = FavoritesStore::new(KvStore::in_memory());

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let favorites = favorites.clone();
            tokio::spawn(async move { favorites.toggle_favorite(&i.to_string()).await })
        })
        .collect();
    for task in futures::future::join_all(tasks).await {
        assert_eq!(task.unwrap().unwrap(), FavoriteAction::Added);
    }

    assert_eq!(favorites.list_favorites().await.unwrap().len(), 32);
}

#[tokio::test]
async fn storage_faults_surface_as_storage_unavailable() {
    init_default_ut_logging();
    let backend = FlakyBackend::default();
    let fail_reads = Arc::clone(&backend.fail_reads);
    let fail_writes = Arc::clone(&backend.fail_writes);
    let kv = KvStore::open(backend);
    let accounts = AccountStore::new(kv.clone());
    let favorites = FavoritesStore::new(kv.clone());

    fail_writes.store(true, Ordering::SeqCst);
    assert!(matches!(
        accounts.register("bob", "pw").await.unwrap_err(),
        AccountError::StorageUnavailable { .. }
    ));
    assert!(matches!(
        favorites.toggle_favorite("1").await.unwrap_err(),
        StorageError::StorageUnavailable { .. }
    ));

    fail_writes.store(false, Ordering::SeqCst);
    assert!(!accounts.login("bob", "pw").await.unwrap());
    assert!(favorites.list_favorites().await.unwrap().is_empty());

    fail_reads.store(true, Ordering::SeqCst);
    assert!(matches!(
        accounts.login("bob", "pw").await.unwrap_err(),
        AccountError::StorageUnavailable { .. }
    ));
    assert!(favorites.is_favorite("1").await.is_err());
}
