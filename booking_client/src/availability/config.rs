use std::sync::LazyLock;

/// Minimum lead time between today and a bookable departure date, in days.
/// Default 10.
pub(crate) static MIN_BOOKING_LEAD_DAYS: LazyLock<i64> = LazyLock::new(|| {
    std::env::var("MIN_BOOKING_LEAD_DAYS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10)
});
