use serde::Serialize;

/// A single email's registration on the waitlist.
///
/// `current_position`, `referral_code` and `referral_count` are owned by the
/// store (sequence, defaults and triggers); the API only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub email: String,
    pub referred_by: Option<String>,
    pub current_position: i64,
    pub referral_code: String,
    pub referral_count: i64,
}

/// Leaderboard projection. Field names are part of the public JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub email: String,
    pub referral_count: i64,
    pub current_position: i64,
}
