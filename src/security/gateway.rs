use crate::core::error::AppError;
use crate::models::user::User;
use crate::security::password::{hash_password, verify_password};
use crate::security::rate_limiter::RateLimiter;
use crate::stores::store::Store;
use crate::validation::forms::{Credentials, Registration};
use std::sync::Arc;
use tracing::{info, warn};

/// Create an account, storing only the salted hash of the password
///
/// Hashing is CPU heavy; call this from a blocking task.
pub fn register(store: &Store, registration: Registration) -> Result<Arc<User>, AppError> {
    if store.user_by_name(&registration.username).is_some() {
        warn!(username = %registration.username, "Registration rejected: username taken");
        return Err(AppError::UsernameTaken);
    }

    let password_hash = hash_password(&registration.password)?;

    // the store re-checks under its lock; the early return above only skips hashing
    let user = store
        .insert_user(&registration.username, password_hash)
        .map_err(|e| {
            warn!(username = %registration.username, error = %e, "Registration rejected");
            AppError::from(e)
        })?;

    info!(user_id = user.id, username = %user.username, "User registered");

    Ok(user)
}

/// Check a username/password pair and return the user id
///
/// Attempts are throttled per username before any hash is checked.
pub fn verify(
    store: &Store,
    limiter: &RateLimiter,
    credentials: &Credentials,
    current_time: i64,
) -> Result<u32, AppError> {
    if !limiter.check_and_increment(&credentials.username, current_time) {
        warn!(username = %credentials.username, "Login throttled");
        return Err(AppError::RateLimited);
    }

    let user = match store.user_by_name(&credentials.username) {
        Some(user) => user,
        None => {
            warn!(username = %credentials.username, "Login failed: unknown username");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(&credentials.password, &user.password_hash) {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = user.id, "User authenticated");

    Ok(user.id)
}
