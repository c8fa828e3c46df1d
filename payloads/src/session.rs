//! Explicit authentication session shared between the API client and the
//! application shell.
//!
//! Constructed once at app start and passed by reference to whatever needs
//! it; there is no module-level singleton. The shell registers a logout
//! observer instead of listening on a global event bus.

use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, RwLock};

type LogoutObserver = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct SessionInner {
    token: Option<SecretString>,
    on_logout: Option<LogoutObserver>,
}

/// Holder of the bearer token plus the logout observer.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone, Default)]
pub struct AuthSession {
    inner: Arc<RwLock<SessionInner>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.inner.write().unwrap().token =
            Some(SecretString::from(token.into()));
    }

    pub fn clear_token(&self) {
        self.inner.write().unwrap().token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap().token.is_some()
    }

    /// The raw token for an `Authorization: Bearer` header, if logged in.
    pub fn bearer_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .token
            .as_ref()
            .map(|token| token.expose_secret().to_string())
    }

    /// Register the observer invoked when the server rejects the session.
    /// A later registration replaces the previous one.
    pub fn on_logout(&self, observer: impl Fn() + Send + Sync + 'static) {
        self.inner.write().unwrap().on_logout = Some(Arc::new(observer));
    }

    /// Drop the token and notify the observer. Called by the client on any
    /// 401 response; also usable directly for an explicit logout action.
    pub fn force_logout(&self) {
        let observer = {
            let mut inner = self.inner.write().unwrap();
            inner.token = None;
            inner.on_logout.clone()
        };
        // Invoke outside the lock so the observer may use the session.
        if let Some(observer) = observer {
            observer();
        }
    }
}
