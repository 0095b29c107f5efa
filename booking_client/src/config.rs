//! Central configuration for the booking_client crate

use std::sync::LazyLock;

/// Base URL of the booking backend API
///
/// All endpoint paths are resolved against this.
/// Default: "http://localhost:8000/api"
pub static BOOKING_API_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("BOOKING_API_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000/api".to_string())
});
