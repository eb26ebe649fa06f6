//! Session store.
//!
//! Holds the current identity and bearer token and is the only code allowed
//! to touch the persisted token.

use crate::gateway::{AuthGateway, AuthResult};
use crate::request::HttpClient;
use crate::{Identity, Plan, Role};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::rc::Rc;

// =========================================================
// Session
// =========================================================

/// Current authentication state.
///
/// `user` and `token` only exist together, so a half-filled session cannot
/// be represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { user: Identity, token: String },
}

impl Session {
    pub fn authenticated(user: Identity, token: String) -> Self {
        Session::Authenticated { user, token }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Anonymous => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    pub fn plan(&self) -> Option<Plan> {
        self.user().and_then(|u| u.plan())
    }
}

// =========================================================
// Persistence
// =========================================================

/// Key/value string persistence surviving reloads (LocalStorage in the browser).
pub trait TokenStorage {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns `false` if the write did not happen.
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

// =========================================================
// Store
// =========================================================

#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
    key: String,
    session: Session,
}

impl<S: TokenStorage> SessionStore<S> {
    /// Starts empty; call [`SessionStore::restore`] to pick up a persisted token.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            session: Session::Anonymous,
        }
    }

    /// Read-only snapshot for views.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn persisted_token(&self) -> Option<String> {
        self.storage.get(&self.key).filter(|t| !t.is_empty())
    }

    /// Re-validates a persisted token. Any failure clears it and leaves the
    /// session empty.
    pub async fn restore<C: HttpClient>(&mut self, gateway: &AuthGateway<C>) -> Session {
        let Some(token) = self.persisted_token() else {
            self.session = Session::Anonymous;
            return Session::Anonymous;
        };

        match gateway.validate(&token).await {
            AuthResult::Success { identity, token } => {
                log::info!("session restored for {}", identity.email);
                self.session = Session::authenticated(identity, token);
            }
            AuthResult::Failure(failure) => {
                log::info!("persisted token discarded: {}", failure.kind.as_str());
                self.clear();
            }
        }
        self.session.clone()
    }

    /// Persists the token and replaces the in-memory session.
    pub fn set(&mut self, identity: Identity, token: String) {
        if !self.storage.set(&self.key, &token) {
            log::warn!("token could not be persisted, session will not survive a reload");
        }
        self.session = Session::authenticated(identity, token);
    }

    pub fn clear(&mut self) {
        self.storage.delete(&self.key);
        self.session = Session::Anonymous;
    }
}

// =========================================================
// Test utility: MemoryStorage
// =========================================================

/// Shared in-memory storage; clones see the same map.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStorage {
    data: Rc<RefCell<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.data.borrow_mut().insert(key.into(), value.into());
        storage
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }
}

#[cfg(test)]
impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.value(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.data.borrow_mut().insert(key.into(), value.into());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.data.borrow_mut().remove(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MockHttpClient;
    use serde_json::json;

    const KEY: &str = "access_token";
    const ME: &str = "http://api.test/api/auth/me";

    fn identity(role: Role) -> Identity {
        Identity {
            id: None,
            name: "Ana".into(),
            email: "ana@techsolve.com".into(),
            role,
            company: None,
        }
    }

    fn gateway(client: &Rc<MockHttpClient>) -> AuthGateway<Rc<MockHttpClient>> {
        AuthGateway::new(client.clone(), "http://api.test")
    }

    #[test]
    fn test_user_and_token_set_together() {
        let sessions = [
            Session::Anonymous,
            Session::authenticated(identity(Role::Client), "t".into()),
        ];
        for s in &sessions {
            assert_eq!(s.user().is_some(), s.token().is_some());
            assert_eq!(s.is_authenticated(), s.token().is_some());
        }
    }

    #[test]
    fn test_set_and_clear() {
        let storage = MemoryStorage::new();
        let mut store = SessionStore::new(storage.clone(), KEY);

        store.set(identity(Role::Agency), "abc".into());
        assert_eq!(storage.value(KEY).as_deref(), Some("abc"));
        assert_eq!(store.session().role(), Some(Role::Agency));
        assert_eq!(store.session().token(), Some("abc"));

        store.clear();
        assert_eq!(storage.value(KEY), None);
        assert_eq!(store.session(), &Session::Anonymous);
    }

    #[tokio::test]
    async fn test_restore_without_token_skips_network() {
        let client = Rc::new(MockHttpClient::new());
        let mut store = SessionStore::new(MemoryStorage::new(), KEY);

        let session = store.restore(&gateway(&client)).await;

        assert_eq!(session, Session::Anonymous);
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_restore_valid_token() {
        let client = Rc::new(MockHttpClient::new());
        client.mock_response(
            ME,
            200,
            json!({ "user": { "name": "Ana", "email": "ana@techsolve.com", "role": "client" } }),
        );
        let storage = MemoryStorage::with(KEY, "good");
        let mut store = SessionStore::new(storage.clone(), KEY);

        let session = store.restore(&gateway(&client)).await;

        assert_eq!(session.token(), Some("good"));
        assert_eq!(session.role(), Some(Role::Client));
        assert_eq!(store.session(), &session);
        assert_eq!(storage.value(KEY).as_deref(), Some("good"));

        let reqs = client.requests.borrow();
        assert_eq!(reqs[0].2.get("Authorization").unwrap(), "Bearer good");
    }

    #[tokio::test]
    async fn test_restore_garbage_token_clears_storage() {
        let client = Rc::new(MockHttpClient::new());
        client.mock_response(ME, 401, json!({ "msg": "Token has expired" }));
        let storage = MemoryStorage::with(KEY, "garbage");
        let mut store = SessionStore::new(storage.clone(), KEY);

        let session = store.restore(&gateway(&client)).await;

        assert_eq!(session, Session::Anonymous);
        assert_eq!(storage.value(KEY), None);
    }

    #[tokio::test]
    async fn test_restore_network_failure_clears_storage() {
        let client = Rc::new(MockHttpClient::new());
        client.mock_transport_error(ME, "offline");
        let storage = MemoryStorage::with(KEY, "maybe-good");
        let mut store = SessionStore::new(storage.clone(), KEY);

        assert_eq!(store.restore(&gateway(&client)).await, Session::Anonymous);
        assert_eq!(storage.value(KEY), None);
    }

    #[tokio::test]
    async fn test_restore_ok_status_without_user_clears_storage() {
        let client = Rc::new(MockHttpClient::new());
        client.mock_response(ME, 200, json!({}));
        let storage = MemoryStorage::with(KEY, "t");
        let mut store = SessionStore::new(storage.clone(), KEY);

        assert_eq!(store.restore(&gateway(&client)).await, Session::Anonymous);
        assert_eq!(storage.value(KEY), None);
    }
}
