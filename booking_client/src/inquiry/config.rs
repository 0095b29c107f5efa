use std::sync::LazyLock;

/// Delay before the post-login anonymous-inquiry association runs, so the
/// login call itself returns promptly. Seconds, default 2.
pub(crate) static INQUIRY_BRIDGE_DELAY_SECS: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("INQUIRY_BRIDGE_DELAY_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(2)
});
