//! Server-side storefront sessions.
//!
//! The browser only holds an opaque id in the `storefront_sid` cookie; cart,
//! favorites and the chosen currency live in [`SessionStore`]. Nothing here is
//! persisted to the database.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::{currency::Currency, error::AppError, state::AppState};

pub mod cart;

pub use cart::{Cart, CartError, Favorites};

pub const SESSION_COOKIE: &str = "storefront_sid";

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub cart: Cart,
    pub favorites: Favorites,
    pub currency: Currency,
    /// Orders checked out from this session, newest last.
    pub placed_orders: Vec<Uuid>,
}

#[derive(Debug)]
struct Entry {
    data: SessionData,
    last_seen: DateTime<Utc>,
}

impl Entry {
    fn fresh() -> Self {
        Self {
            data: SessionData::default(),
            last_seen: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<DashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            idle_timeout,
        }
    }

    /// Starts a new empty session and hands back its handle.
    pub fn open(&self) -> Session {
        self.purge_expired();
        let id = Uuid::new_v4();
        self.entries.insert(id, Entry::fresh());
        Session {
            id,
            store: self.clone(),
        }
    }

    /// Handle for an existing session id.
    pub fn session(&self, id: Uuid) -> Session {
        Session {
            id,
            store: self.clone(),
        }
    }

    /// Marks the session as used. Returns false for unknown or expired ids.
    pub fn touch(&self, id: Uuid) -> bool {
        let now = Utc::now();
        if let Some(mut entry) = self.entries.get_mut(&id) {
            if now - entry.last_seen <= self.idle_timeout {
                entry.last_seen = now;
                return true;
            }
        }
        self.entries
            .remove_if(&id, |_, entry| now - entry.last_seen > self.idle_timeout);
        false
    }

    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.entries
            .retain(|_, entry| now - entry.last_seen <= self.idle_timeout);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn snapshot(&self, id: Uuid) -> SessionData {
        self.entries
            .get(&id)
            .map(|entry| entry.data.clone())
            .unwrap_or_default()
    }

    fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionData) -> R) -> R {
        let mut entry = self.entries.entry(id).or_insert_with(Entry::fresh);
        entry.last_seen = Utc::now();
        f(&mut entry.data)
    }
}

#[derive(Debug, Clone, Copy)]
struct SessionId(Uuid);

/// Per-request handle on the caller's session.
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    store: SessionStore,
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> SessionData {
        self.store.snapshot(self.id)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut SessionData) -> R) -> R {
        self.store.update(self.id, f)
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let SessionId(id) = parts.extensions.get::<SessionId>().copied().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("session layer is not installed on this route"))
        })?;
        Ok(state.sessions.session(id))
    }
}

/// Resolves the session cookie, starting a new session when it is missing or
/// stale, and sets the cookie on the response for new sessions.
pub async fn session_layer(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .filter(|id| state.sessions.touch(*id));

    let (session_id, fresh) = match existing {
        Some(id) => (id, false),
        None => (state.sessions.open().id(), true),
    };
    request.extensions_mut().insert(SessionId(session_id));

    let response = next.run(request).await;
    if !fresh {
        return response;
    }

    tracing::debug!(%session_id, "session started");
    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), response).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_are_visible_through_other_handles() {
        let store = SessionStore::new(Duration::minutes(5));
        let session = store.open();
        let product = Uuid::new_v4();

        session.update(|data| data.cart.add(product, 2, 10)).unwrap();

        let again = store.session(session.id());
        assert_eq!(again.snapshot().cart.quantity(product), 2);
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new(Duration::minutes(5));
        let first = store.open();
        let second = store.open();

        first.update(|data| data.favorites.toggle(Uuid::new_v4()));

        assert_eq!(first.snapshot().favorites.len(), 1);
        assert!(second.snapshot().favorites.is_empty());
    }

    #[test]
    fn expired_sessions_are_not_resumed() {
        let store = SessionStore::new(Duration::zero() - Duration::seconds(1));
        let session = store.open();

        assert!(!store.touch(session.id()));
        assert!(store.is_empty());
        assert!(!store.touch(Uuid::new_v4()));
    }
}
