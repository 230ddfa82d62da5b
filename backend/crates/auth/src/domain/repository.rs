//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession, password_reset_token::PasswordResetToken, user::User,
};
use crate::domain::value_object::email::Email;
use crate::error::ResetResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Case-insensitive lookup among non-deleted users
    async fn find_active_by_email(&self, email: &Email) -> ResetResult<Option<User>>;

    /// Replace the stored hash; `false` if no active user matched
    async fn update_password_hash(
        &self,
        user_id: &UserId,
        hash: &HashedPassword,
    ) -> ResetResult<bool>;
}

/// Password reset token repository trait
#[trait_variant::make(ResetTokenRepository: Send)]
pub trait LocalResetTokenRepository {
    async fn insert(&self, token: &PasswordResetToken) -> ResetResult<()>;

    async fn find_by_token(&self, token: &str) -> ResetResult<Option<PasswordResetToken>>;

    /// Conditional `used = false -> true` on a token not yet expired at
    /// `used_at`; the return value is the CAS result
    async fn mark_used(&self, token: &str, used_at: DateTime<Utc>) -> ResetResult<bool>;

    /// Mark every unused token of the user as used; returns how many
    async fn mark_all_used(&self, user_id: &UserId, used_at: DateTime<Utc>) -> ResetResult<u64>;

    /// Delete rows created before `cutoff`, used or not
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> ResetResult<u64>;

    /// Whether a token was created for the email's account since `since`
    async fn exists_for_email_since(
        &self,
        email: &Email,
        since: DateTime<Utc>,
    ) -> ResetResult<bool>;
}

/// Auth session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Session of a non-deleted user; expiry is checked by the caller
    async fn find_session(&self, session_id: Uuid) -> ResetResult<Option<AuthSession>>;
}
