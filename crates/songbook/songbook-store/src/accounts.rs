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

//! Append-only registry of local accounts, persisted under [`USERS_KEY`].
//!
//! Passwords are stored and compared as plain strings.

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu, ensure};
use tracing::info;

use crate::{
    err::Error,
    kv::{KvStore, Mutation},
};

/// Storage key holding the ordered account sequence.
pub const USERS_KEY: &str = "users";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
}

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum AccountError {
    #[snafu(display("Username and password must not be empty"))]
    EmptyCredentials {
        #[snafu(implicit)]
        loc: snafu::Location,
    },

    #[snafu(display("Username {username} is already registered"))]
    DuplicateUsername {
        username: String,
        #[snafu(implicit)]
        loc:      snafu::Location,
    },

    #[snafu(display("Account storage unavailable"))]
    StorageUnavailable {
        source: Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },
}

#[derive(Clone)]
pub struct AccountStore {
    kv: KvStore,
}

impl AccountStore {
    pub const fn new(kv: KvStore) -> Self { Self { kv } }

    /// Register a new account.
    ///
    /// Empty credentials are rejected before storage is touched; an existing
    /// username leaves the stored sequence unchanged.
    #[tracing::instrument(level = "trace", skip(self, password), err)]
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AccountError> {
        ensure!(
            !username.is_empty() && !password.is_empty(),
            EmptyCredentialsSnafu
        );

        let account = Account {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        let appended = self
            .kv
            .update(USERS_KEY, move |accounts: &mut Vec<Account>| {
                if accounts.iter().any(|a| a.username == account.username) {
                    Mutation::Skip(false)
                } else {
                    accounts.push(account);
                    Mutation::Write(true)
                }
            })
            .await
            .context(StorageUnavailableSnafu)?;

        ensure!(appended, DuplicateUsernameSnafu { username });

        info!(username, "Registered account");
        Ok(())
    }

    /// Check credentials; a mismatch is `Ok(false)`, not an error.
    #[tracing::instrument(level = "trace", skip(self, password), err)]
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, AccountError> {
        let accounts: Vec<Account> = self
            .kv
            .get(USERS_KEY)
            .await
            .context(StorageUnavailableSnafu)?
            .unwrap_or_default();

        Ok(accounts
            .iter()
            .any(|a| a.username == username && a.password == password))
    }
}
