//! Reset Notifier
//!
//! Delivery of the reset token (mail, SMS, ...) is a collaborator. The
//! default notifier records that a token was issued without the token.

use crate::application::token_store::IssuedResetToken;
use crate::domain::entity::user::User;
use crate::error::ResetResult;

#[trait_variant::make(ResetNotifier: Send)]
pub trait LocalResetNotifier {
    async fn send_reset(&self, user: &User, issued: &IssuedResetToken) -> ResetResult<()>;
}

/// Logs the user id and expiry only
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingResetNotifier;

impl ResetNotifier for TracingResetNotifier {
    async fn send_reset(&self, user: &User, issued: &IssuedResetToken) -> ResetResult<()> {
        tracing::info!(
            user_id = %user.user_id,
            expires_at = %issued.expires_at,
            "Password reset ready for delivery"
        );
        Ok(())
    }
}
