//! Test data factories.
//!
//! Use the closure parameter to override specific fields as needed.

use crate::domain::entities::waitlist_entry::WaitlistEntry;

/// Referral code the in-memory store assigns to the entry at `position`.
pub fn test_referral_code(position: i64) -> String {
    format!("ref{position:05}")
}

/// Create a waitlist entry at `position` with sensible defaults.
pub fn create_test_entry(
    position: i64,
    overrides: impl FnOnce(&mut WaitlistEntry),
) -> WaitlistEntry {
    let mut entry = WaitlistEntry {
        email: format!("user{position}@example.com"),
        referred_by: None,
        current_position: position,
        referral_code: test_referral_code(position),
        referral_count: 0,
    };
    overrides(&mut entry);
    entry
}
