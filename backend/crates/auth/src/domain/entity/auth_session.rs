//! Auth Session Entity
//!
//! A signed-in session. The browser holds `{session_id}.{signature}`;
//! the row says whose session it is and until when.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: Uuid,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
