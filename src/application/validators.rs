/// Minimal email shape check: non-empty after trimming and contains '@'.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.contains('@')
}

/// Resolves the leaderboard `limit` query value.
///
/// Only the leading integer is read, so `"5abc"` is 5 and `"3.7"` is 3.
/// Missing, digitless and non-positive values fall back to `default`;
/// anything above `max` is clamped.
pub fn resolve_limit(raw: Option<&str>, default: i64, max: i64) -> i64 {
    let requested = raw
        .and_then(leading_integer)
        .filter(|limit| *limit > 0)
        .unwrap_or(default);

    requested.min(max)
}

/// Optional sign followed by at least one digit, after leading whitespace.
/// Out-of-range values saturate.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, unsigned) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
