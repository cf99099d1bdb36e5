use crate::core::state::AppState;
use crate::utils::time::{current_timestamp, is_expired};
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use axum::response::Redirect;
use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: u32,
    /// Unix timestamp of login
    pub created_at: i64,
}

/// Server-side login sessions keyed by an opaque random token
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl_seconds: i64,
}

impl SessionStore {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl_seconds,
        }
    }

    /// Start a session and return its token
    pub fn create(&self, user_id: u32, current_time: i64) -> String {
        let bytes: [u8; 32] = rand::rng().random();
        let token = hex::encode(bytes);

        self.sessions.insert(
            token.clone(),
            Session {
                user_id,
                created_at: current_time,
            },
        );

        token
    }

    /// Resolve a token to its user, dropping it if it has expired
    pub fn resolve(&self, token: &str, current_time: i64) -> Option<u32> {
        let (user_id, created_at) = self
            .sessions
            .get(token)
            .map(|entry| (entry.user_id, entry.created_at))?;

        if is_expired(created_at, self.ttl_seconds, current_time) {
            self.sessions.remove(token);
            debug!(user_id = user_id, "Session expired");
            return None;
        }

        Some(user_id)
    }

    /// Returns true if the token was live
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub fn cleanup_expired(&self, current_time: i64) -> usize {
        let before = self.sessions.len();
        let ttl = self.ttl_seconds;
        self.sessions
            .retain(|_, session| !is_expired(session.created_at, ttl, current_time));
        before.saturating_sub(self.sessions.len())
    }

    /// Sessions that have not yet expired, swept or not
    pub fn live_count(&self, current_time: i64) -> usize {
        self.sessions
            .iter()
            .filter(|entry| !is_expired(entry.created_at, self.ttl_seconds, current_time))
            .count()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Read the session token out of the request's Cookie headers
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value that installs a session token
pub fn session_cookie(cookie_name: &str, token: &str, ttl_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        cookie_name, token, ttl_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that clears the session cookie
pub fn clear_session_cookie(cookie_name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", cookie_name)
}

/// The logged-in user, resolved from the session cookie
///
/// Handlers that take this extractor redirect anonymous requests to `/login`.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: u32,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers, &state.config.session.cookie_name)
            .ok_or_else(|| Redirect::to("/login"))?;

        state
            .sessions
            .resolve(&token, current_timestamp())
            .map(|user_id| CurrentUser { user_id })
            .ok_or_else(|| Redirect::to("/login"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_create_and_resolve() {
        let sessions = SessionStore::new(3600);
        let token = sessions.create(7, 1000);

        assert_eq!(token.len(), 64);
        assert_eq!(sessions.resolve(&token, 1500), Some(7));
        assert_eq!(sessions.resolve("unknown", 1500), None);
    }

    #[test]
    fn test_tokens_are_unique() {
        let sessions = SessionStore::new(3600);
        let first = sessions.create(1, 1000);
        let second = sessions.create(1, 1000);

        assert_ne!(first, second);
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_expired_session_is_dropped() {
        let sessions = SessionStore::new(100);
        let token = sessions.create(7, 1000);

        assert_eq!(sessions.resolve(&token, 1100), Some(7));
        assert_eq!(sessions.resolve(&token, 1101), None);
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_revoke() {
        let sessions = SessionStore::new(3600);
        let token = sessions.create(7, 1000);

        assert!(sessions.revoke(&token));
        assert!(!sessions.revoke(&token));
        assert_eq!(sessions.resolve(&token, 1000), None);
    }

    #[test]
    fn test_cleanup_expired() {
        let sessions = SessionStore::new(100);
        sessions.create(1, 1000);
        sessions.create(2, 1050);
        let live = sessions.create(3, 1150);

        assert_eq!(sessions.cleanup_expired(1160), 2);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions.resolve(&live, 1160), Some(3));
    }

    #[test]
    fn test_live_count_ignores_unswept_expired() {
        let sessions = SessionStore::new(100);
        sessions.create(1, 1000);
        sessions.create(2, 1150);

        assert_eq!(sessions.live_count(1160), 1);
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_id=abc123; other=1"),
        );

        assert_eq!(session_token(&headers, "session_id"), Some("abc123".to_string()));
        assert_eq!(session_token(&headers, "missing"), None);
    }

    #[test]
    fn test_session_token_absent_or_empty() {
        let headers = HeaderMap::new();
        assert_eq!(session_token(&headers, "session_id"), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_id="));
        assert_eq!(session_token(&headers, "session_id"), None);
    }

    #[test]
    fn test_cookie_strings() {
        assert_eq!(
            session_cookie("sid", "tok", 60, false),
            "sid=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
        assert!(session_cookie("sid", "tok", 60, true).ends_with("; Secure"));
        assert_eq!(
            clear_session_cookie("sid"),
            "sid=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }
}
