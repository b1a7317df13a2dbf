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


//! Songbook application layer.
//!
//! [`AppState`] composes the key-value store, the static [`Catalog`] and the
//! account and favorites services. Screens reach the services through the
//! extension traits in [`services`] and report outcomes as [`Notice`]s.

pub mod app_state;
pub mod catalog;
pub mod config;
pub mod notice;
pub mod services;

pub use app_state::AppState;
pub use catalog::{Catalog, CatalogError, Song};
pub use config::AppConfig;
pub use notice::{Notice, NoticeLevel};
pub use services::{
    AccountService, AccountServiceExt, FavoritesService, FavoritesServiceError,
    FavoritesServiceExt, LoginSession,
};
use songbook_common_telemetry::WorkerGuard;

/// Install the panic hook and global logging from `config`.
///
/// Keep the returned guards alive for as long as logs should be written.
pub fn init_logging(config: &AppConfig) -> Vec<WorkerGuard> {
    songbook_common_telemetry::set_panic_hook();
    songbook_common_telemetry::init_global_logging("songbook", &config.logging)
}
