pub mod gateway;
pub mod password;
pub mod rate_limiter;
pub mod sessions;
