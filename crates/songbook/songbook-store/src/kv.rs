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

//! Typed key-value store with a single owner.
//!
//! ```text
//! ┌──────────────┐   mpsc (FIFO)   ┌──────────────┐   get/set   ┌──────────────┐
//! │   KvStore    │ ──── jobs ────► │  owner task  │ ──────────► │  KvBackend   │
//! │  (clones)    │ ◄── oneshot ─── │              │             │ (SQLite/mem) │
//! └──────────────┘                 └──────────────┘             └──────────────┘
//! ```
//!
//! Every operation, including the read-modify-write of [`KvStore::update`],
//! runs as one job on the owner task, so callers sharing a store never
//! interleave between a read and its write. Two stores opened over the same
//! database file are not coordinated with each other.

use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};
use serde::{Serialize, de::DeserializeOwned};
use snafu::ResultExt;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::{
    backend::{KvBackend, MemoryBackend},
    config::{BackendKind, StoreConfig},
    db::DBStore,
    err::*,
};

type Job = Box<dyn FnOnce(Arc<dyn KvBackend>) -> BoxFuture<'static, ()> + Send>;

enum Command {
    Run(Job),
    Close(oneshot::Sender<Result<()>>),
}

/// Outcome of an [`KvStore::update`] closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<R> {
    /// Persist the mutated value and return `R`.
    Write(R),
    /// Leave storage untouched and return `R`.
    Skip(R),
}

/// Cloneable handle to a key-value store.
///
/// All values are serialized to JSON before storage.
#[derive(Clone)]
pub struct KvStore {
    tx: mpsc::UnboundedSender<Command>,
}

impl KvStore {
    /// Take ownership of `backend` and start serving requests.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(backend: impl KvBackend) -> Self {
        let backend: Arc<dyn KvBackend> = Arc::new(backend);
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_owner(backend, rx));
        Self { tx }
    }

    /// Open the backend selected by `config`.
    pub async fn open_with(config: &StoreConfig) -> Result<Self> {
        match config.backend {
            BackendKind::Sqlite => Ok(Self::open(DBStore::new(config).await?)),
            BackendKind::Memory => Ok(Self::in_memory()),
        }
    }

    /// Open an empty in-memory store.
    pub fn in_memory() -> Self { Self::open(MemoryBackend::new()) }

    /// Get a value by key
    ///
    /// Returns `None` if the key does not exist
    #[tracing::instrument(level = "trace", skip(self), err)]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let owned = key.to_owned();
        let raw = self
            .submit(move |backend| async move { backend.get(&owned).await }.boxed())
            .await?;

        raw.map(|json| serde_json::from_str(&json).context(CodecSnafu { key }))
            .transpose()
    }

    /// Set a key-value pair, replacing any previous value
    #[tracing::instrument(level = "trace", skip(self, value), err)]
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).context(CodecSnafu { key })?;
        let owned = key.to_owned();

        self.submit(move |backend| async move { backend.set(&owned, json).await }.boxed())
            .await
    }

    /// Read, mutate and conditionally write back the value under `key` as a
    /// single step.
    ///
    /// An absent key is presented to `f` as `T::default()`.
    #[tracing::instrument(level = "trace", skip(self, f), err)]
    pub async fn update<T, R, F>(&self, key: &str, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default + Send + 'static,
        R: Send + 'static,
        F: FnOnce(&mut T) -> Mutation<R> + Send + 'static,
    {
        let key = key.to_owned();

        self.submit(move |backend| {
            async move {
                let mut value: T = match backend.get(&key).await? {
                    Some(json) => {
                        serde_json::from_str(&json).context(CodecSnafu { key: key.as_str() })?
                    }
                    None => T::default(),
                };

                match f(&mut value) {
                    Mutation::Skip(outcome) => Ok(outcome),
                    Mutation::Write(outcome) => {
                        let json = serde_json::to_string(&value)
                            .context(CodecSnafu { key: key.as_str() })?;
                        backend.set(&key, json).await?;
                        Ok(outcome)
                    }
                }
            }
            .boxed()
        })
        .await
    }

    /// Close the backend once every previously issued operation has run.
    ///
    /// Later operations fail with [`Error::Closed`]; closing twice is a
    /// no-op.
    pub async fn close(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(Command::Close(reply_tx)).is_err() {
            return Ok(());
        }
        reply_rx.await.unwrap_or(Ok(()))
    }

    pub fn is_closed(&self) -> bool { self.tx.is_closed() }

    async fn submit<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(Arc<dyn KvBackend>) -> BoxFuture<'static, Result<R>> + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move |backend| {
            async move {
                let _ = reply_tx.send(f(backend).await);
            }
            .boxed()
        });

        self.tx
            .send(Command::Run(job))
            .map_err(|_| ClosedSnafu.build())?;
        reply_rx.await.map_err(|_| ClosedSnafu.build())?
    }
}

async fn run_owner(backend: Arc<dyn KvBackend>, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Run(job) => job(Arc::clone(&backend)).await,
            Command::Close(reply) => {
                rx.close();
                let _ = reply.send(backend.close().await);
                break;
            }
        }
    }
    debug!("key-value store owner stopped");
}
