//! Password Reset Token Entity
//!
//! Random, server-stored, single-use. `used` flips from false to true at
//! most once; rows are swept in bulk once they are older than the retention
//! window regardless of state.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use uuid::Uuid;

use crate::error::ResetError;

#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl PasswordResetToken {
    pub fn new(user_id: UserId, token: String, now: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token,
            expires_at: now + ttl,
            used: false,
            created_at: now,
            used_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Used wins over expired: a consumed token reports `ALREADY_USED`
    /// for the rest of its life.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), ResetError> {
        if self.used {
            return Err(ResetError::TokenAlreadyUsed);
        }
        if self.is_expired(now) {
            return Err(ResetError::TokenExpired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn token_at(now: DateTime<Utc>) -> PasswordResetToken {
        PasswordResetToken::new(
            UserId::new("u-1"),
            "t".to_string(),
            now,
            chrono::Duration::hours(1),
        )
    }

    #[test]
    fn test_expiry_is_one_ttl_after_creation() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let token = token_at(now);
        assert_eq!(token.expires_at - token.created_at, chrono::Duration::hours(1));
        assert!(!token.used);
        assert!(token.used_at.is_none());
    }

    #[test]
    fn test_redeemable_window() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let token = token_at(now);

        assert!(token.check_redeemable(now + chrono::Duration::minutes(60)).is_ok());
        assert!(matches!(
            token.check_redeemable(now + chrono::Duration::minutes(61)),
            Err(ResetError::TokenExpired)
        ));
    }

    #[test]
    fn test_used_reported_before_expired() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut token = token_at(now);
        token.used = true;

        assert!(matches!(
            token.check_redeemable(now + chrono::Duration::hours(2)),
            Err(ResetError::TokenAlreadyUsed)
        ));
    }
}
