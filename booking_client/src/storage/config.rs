use std::sync::LazyLock;

/// Path of the cookie-jar file, the preferred credential backend.
pub static AUTH_COOKIE_FILE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("AUTH_COOKIE_FILE").unwrap_or_else(|_| ".booking_auth_cookies".to_string())
});

/// Path of the durable JSON key-value file, the fallback credential backend
/// and the home of the anonymous inquiry token set.
pub static AUTH_STATE_FILE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("AUTH_STATE_FILE").unwrap_or_else(|_| ".booking_auth_state.json".to_string())
});

/// Lifetime of cookie-jar entries in seconds. Default 7 days.
pub static AUTH_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("AUTH_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(604800)
});
