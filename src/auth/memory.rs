//! In-memory [`AuthGateway`] for tests and the demo binary.
//!
//! Enforces the two policies a real provider would reject registration for
//! (duplicate email, short password) and tracks how often credential creation
//! was attempted, so tests can assert that invalid forms never reach the
//! provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::auth::{AuthError, AuthGateway, UserId};

/// Passwords shorter than this are rejected as weak.
const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user_id: UserId,
    display_name: Option<String>,
}

#[derive(Default)]
struct Inner {
    /// Keyed by email.
    accounts: HashMap<String, Account>,
    current: Option<UserId>,
    next_user: u64,
    credential_calls: usize,
    fail_credential: Option<AuthError>,
    fail_display_name: Option<AuthError>,
}

/// In-memory identity provider. Clone handles through [`Arc`].
pub struct MemoryAuth {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(Inner::default())) }
    }

    /// Signs an arbitrary identity in, bypassing credential checks. For tests
    /// that start beyond the registration screen.
    pub fn sign_in_as(&self, user: impl Into<UserId>) {
        self.inner.lock().unwrap().current = Some(user.into());
    }

    pub fn sign_out(&self) {
        self.inner.lock().unwrap().current = None;
    }

    /// How many times [`AuthGateway::create_credential`] was called,
    /// including rejected attempts.
    pub fn credential_calls(&self) -> usize {
        self.inner.lock().unwrap().credential_calls
    }

    /// Makes the next credential creation fail with `error`.
    pub fn fail_next_credential(&self, error: AuthError) {
        self.inner.lock().unwrap().fail_credential = Some(error);
    }

    /// Makes the next display-name update fail with `error`.
    pub fn fail_next_display_name(&self, error: AuthError) {
        self.inner.lock().unwrap().fail_display_name = Some(error);
    }

    pub fn display_name_of(&self, user: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .accounts
            .values()
            .find(|account| account.user_id == user)
            .and_then(|account| account.display_name.clone())
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthGateway for MemoryAuth {
    fn current_user(&self) -> Option<UserId> {
        self.inner.lock().unwrap().current.clone()
    }

    async fn create_credential(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let mut inner = self.inner.lock().unwrap();
        inner.credential_calls += 1;

        if let Some(error) = inner.fail_credential.take() {
            return Err(error);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(format!(
                "need at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if inner.accounts.contains_key(email) {
            return Err(AuthError::EmailInUse(email.to_string()));
        }

        inner.next_user += 1;
        let user_id = format!("user_{}", inner.next_user);
        inner
            .accounts
            .insert(email.to_string(), Account { user_id: user_id.clone(), display_name: None });
        inner.current = Some(user_id.clone());
        debug!(%user_id, "credential created, user signed in");
        Ok(user_id)
    }

    async fn set_display_name(&self, user: &str, name: &str) -> Result<(), AuthError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_display_name.take() {
            return Err(error);
        }
        let account = inner
            .accounts
            .values_mut()
            .find(|account| account.user_id == user)
            .ok_or_else(|| AuthError::UnknownUser(user.to_string()))?;
        account.display_name = Some(name.to_string());
        Ok(())
    }
}
