// Application state (AppState)

use crate::core::config::Config;
use crate::metrics::collector::Metrics;
use crate::security::{rate_limiter::RateLimiter, sessions::SessionStore};
use crate::stores::store::Store;
use std::sync::Arc;

/// Shared application state
///
/// Contains all shared components that are accessed by request handlers.
/// All fields are wrapped in Arc for efficient cloning across threads.
#[derive(Clone)]
pub struct AppState {
    /// Users, timetable and attendance tables
    pub store: Arc<Store>,

    /// Live login sessions
    pub sessions: Arc<SessionStore>,

    /// Per-username login throttle
    pub login_limiter: Arc<RateLimiter>,

    /// Metrics collector for tracking statistics
    pub metrics: Arc<Metrics>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        let config = Arc::new(config);

        Self {
            store: Arc::new(store),
            sessions: Arc::new(SessionStore::new(config.session.ttl_seconds)),
            login_limiter: Arc::new(RateLimiter::new(
                config.security.max_login_attempts_per_minute,
            )),
            metrics: Arc::new(Metrics::new()),
            config,
        }
    }
}
