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

//! Raw key-value substrates.
//!
//! A backend stores one serialized value per string key and only supports
//! whole-value reads and writes. Opening is the job of each backend's
//! constructor; [`KvBackend::close`] ends its lifecycle.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::err::Result;

/// Whole-value key-value storage.
#[async_trait]
pub trait KvBackend: Send + Sync + 'static {
    /// Read the raw value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Release the underlying resources.
    async fn close(&self) -> Result<()>;
}

/// In-memory backend, used for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self { Self::default() }

    /// Seed the backend with raw values.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().insert(key.to_owned(), value);
        Ok(())
    }

    async fn close(&self) -> Result<()> { Ok(()) }
}
