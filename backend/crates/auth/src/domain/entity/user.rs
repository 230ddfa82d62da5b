//! User Entity
//!
//! The slice of an account the reset flow needs. Password hashes are written
//! through the repository and never loaded into this entity.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::email::Email;

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    /// Soft-deleted accounts cannot reset their password
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
