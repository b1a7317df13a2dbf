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

use jiff::Timestamp;
use parking_lot::RwLock;
use songbook_store::{AccountError, AccountStore};
use tracing::info;
use uuid::Uuid;

use crate::app_state::AppState;

/// The user currently logged in to this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub id:           Uuid,
    pub username:     String,
    pub logged_in_at: Timestamp,
}

pub struct AccountService {
    store:   AccountStore,
    session: RwLock<Option<LoginSession>>,
}

impl AccountService {
    pub fn new(store: AccountStore) -> Self {
        Self {
            store,
            session: RwLock::new(None),
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), AccountError> {
        self.store.register(username, password).await
    }

    /// Check credentials and, on a match, replace the current session with a
    /// fresh one. A mismatch leaves any existing session untouched.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<LoginSession>, AccountError> {
        if !self.store.login(username, password).await? {
            return Ok(None);
        }

        let session = LoginSession {
            id:           Uuid::new_v4(),
            username:     username.to_owned(),
            logged_in_at: Timestamp::now(),
        };
        *self.session.write() = Some(session.clone());
        info!(username, session_id = %session.id, "Logged in");
        Ok(Some(session))
    }

    pub fn logout(&self) -> Option<LoginSession> {
        let ended = self.session.write().take();
        if let Some(session) = &ended {
            info!(username = %session.username, session_id = %session.id, "Logged out");
        }
        ended
    }

    pub fn current_session(&self) -> Option<LoginSession> { self.session.read().clone() }
}

pub trait AccountServiceExt {
    fn accounts(&self) -> &Arc<AccountService>;
}

impl AccountServiceExt for AppState {
    fn accounts(&self) -> &Arc<AccountService> { self.account_service() }
}
