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

use std::{path::PathBuf, time::Duration};

use smart_default::SmartDefault;

/// Which substrate backs the key-value store.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum BackendKind {
    /// SQLite file at [`StoreConfig::db_path`]
    #[default]
    Sqlite,
    /// Process-local map, lost on exit
    Memory,
}

/// Key-value store configuration
#[derive(Debug, Clone, SmartDefault, bon::Builder)]
#[builder(on(String, into), on(Duration, into))]
pub struct StoreConfig {
    /// Storage substrate
    #[builder(default, getter)]
    pub backend: BackendKind,

    /// Path to the SQLite database file
    #[default(_code = "PathBuf::from(\"songbook.db\")")]
    #[builder(default = "songbook.db", into, getter)]
    pub db_path: PathBuf,

    /// Maximum number of connections in the pool
    #[default = 10]
    #[builder(default = 10, getter)]
    pub max_connections: u32,

    /// Minimum number of idle connections
    #[default = 1]
    #[builder(default = 1, getter)]
    pub min_connections: u32,

    /// Connection timeout (default: 30 seconds)
    #[default(_code = "Duration::from_secs(30)")]
    #[builder(default = Duration::from_secs(30), getter)]
    pub connect_timeout: Duration,

    /// Maximum lifetime of a connection (default: 30 minutes)
    #[default(_code = "Some(Duration::from_secs(1800))")]
    #[builder(required, default = Some(Duration::from_secs(1800)), getter)]
    pub max_lifetime: Option<Duration>,

    /// Idle timeout for connections (default: 10 minutes)
    #[default(_code = "Some(Duration::from_secs(600))")]
    #[builder(required, default = Some(Duration::from_secs(600)), getter)]
    pub idle_timeout: Option<Duration>,
}

impl StoreConfig {
    /// Configuration for a throwaway in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builder() {
        let built = StoreConfig::builder().build();
        let defaulted = StoreConfig::default();

        assert_eq!(built.backend, defaulted.backend);
        assert_eq!(built.db_path, defaulted.db_path);
        assert_eq!(built.max_connections, 10);
        assert_eq!(built.min_connections, defaulted.min_connections);
        assert_eq!(built.connect_timeout, Duration::from_secs(30));
        assert_eq!(built.max_lifetime, defaulted.max_lifetime);
        assert_eq!(built.max_lifetime, Some(Duration::from_secs(1800)));
        assert_eq!(built.idle_timeout, defaulted.idle_timeout);
        assert_eq!(built.idle_timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn backend_kind_parses_snake_case() {
        assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert_eq!(BackendKind::Sqlite.as_ref(), "sqlite");
        assert!("postgres".parse::<BackendKind>().is_err());
    }
}
