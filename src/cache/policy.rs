//! Expiration Policy
//!
//! The single expiry rule shared by reads, existence checks, sweeps and
//! statistics. An entry is still alive at the exact expiration instant.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Returns true once `now` is strictly past `expires_at`.
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(expires_at, Some(expires) if now > expires)
}

/// Computes `now + ttl`, or `None` when the result is not representable.
pub fn expiration_after(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    let ttl = chrono::Duration::from_std(ttl).ok()?;
    now.checked_add_signed(ttl)
}

/// Remaining lifetime, clamped to zero. `None` means the entry never expires.
pub fn remaining(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<Duration> {
    expires_at.map(|expires| (expires - now).to_std().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_never_expires() {
        assert!(!is_expired(None, instant()));
        assert!(!is_expired(None, instant() + chrono::Duration::days(365 * 1000)));
    }

    #[test]
    fn test_alive_at_boundary() {
        let expires = instant();
        assert!(!is_expired(Some(expires), expires));
        assert!(!is_expired(Some(expires), expires - chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_expired_one_nanosecond_later() {
        let expires = instant();
        assert!(is_expired(Some(expires), expires + chrono::Duration::nanoseconds(1)));
    }

    #[test]
    fn test_expiration_after() {
        let now = instant();
        let expires = expiration_after(now, Duration::from_secs(90)).unwrap();
        assert_eq!(expires - now, chrono::Duration::seconds(90));
    }

    #[test]
    fn test_expiration_after_overflow() {
        assert!(expiration_after(instant(), Duration::MAX).is_none());
    }

    #[test]
    fn test_remaining() {
        let now = instant();
        let expires = now + chrono::Duration::milliseconds(1500);

        assert_eq!(remaining(Some(expires), now), Some(Duration::from_millis(1500)));
        assert_eq!(
            remaining(Some(expires), expires + chrono::Duration::seconds(5)),
            Some(Duration::ZERO)
        );
        assert_eq!(remaining(None, now), None);
    }
}
