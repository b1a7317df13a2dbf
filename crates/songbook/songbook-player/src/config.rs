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


use songbook_common_telemetry::LoggingOptions;
use songbook_store::StoreConfig;

#[derive(Debug, Clone, Default, bon::Builder)]
pub struct AppConfig {
    /// Key-value store configuration
    #[builder(default, getter)]
    pub store:   StoreConfig,
    /// Logging configuration
    #[builder(default, getter)]
    pub logging: LoggingOptions,
}

impl AppConfig {
    /// Configuration rooted at the platform data directory: the database at
    /// `songbook_paths::database_file()` and log files under
    /// `songbook_paths::logs_dir()`.
    pub fn with_default_paths() -> Self {
        let store = StoreConfig {
            db_path: songbook_paths::database_file().clone(),
            ..StoreConfig::default()
        };
        let logging = LoggingOptions::builder()
            .dir(songbook_paths::logs_dir().to_string_lossy().into_owned())
            .build();
        Self { store, logging }
    }
}
