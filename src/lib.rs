pub mod core;
pub mod models;
pub mod stores;
pub mod security;
pub mod tracking;
pub mod views;
pub mod wal;
pub mod metrics;
pub mod validation;
pub mod utils;
pub mod handlers;
