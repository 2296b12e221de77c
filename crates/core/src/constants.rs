/// Fraction of the quarterly allocation below which a spend triggers the
/// reallocation warning.
pub const REALLOCATION_THRESHOLD: &str = "0.2";

/// Maximum compare-and-swap attempts for a single mutation before giving up
/// with `ContentionExceeded`.
pub const MAX_SWAP_ATTEMPTS: u32 = 3;

/// Notification channel to raise when the annual allocation is depleted.
pub const FUNDING_CHANNEL: &str = "funding";

/// Notification channel to raise when the balance drops below the
/// reallocation threshold.
pub const REALLOCATION_CHANNEL: &str = "reallocation";
