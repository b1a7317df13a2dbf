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

//! Local state persistence for Songbook.
//!
//! Accounts and favorites live in one asynchronous key-value store addressed
//! by string keys, each key holding a whole JSON value.

pub mod accounts;
pub mod backend;
pub mod config;
pub mod db;
pub mod err;
pub mod favorites;
pub mod kv;

pub use accounts::{Account, AccountError, AccountStore, USERS_KEY};
pub use backend::{KvBackend, MemoryBackend};
pub use config::{BackendKind, StoreConfig};
pub use db::DBStore;
pub use err::{Error, Result};
pub use favorites::{FAVORITES_KEY, FavoriteAction, FavoritesStore, StorageError};
pub use kv::{KvStore, Mutation};
