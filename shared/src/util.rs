/// Current UTC timestamp as an RFC 3339 string
///
/// Used for `Order.created_at` so persisted records stay human-readable.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Generate a prefixed resource id, e.g. `order-550e8400-...`
///
/// Timestamp-based ids collide when two resources are created in the same
/// millisecond (one checkout creates several orders at once), so ids are
/// uuid v4 instead.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// Round a currency amount to 2 decimal places
///
/// All persisted totals go through this so that `price * quantity` sums
/// compare cleanly regardless of f64 representation noise.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
