//! Authenticated principal
//!
//! Authentication lives upstream of the feature routers. Whatever layer
//! establishes identity inserts an [`AuthenticatedUser`] into the request
//! extensions; handlers that need a principal read it from there.

use crate::id::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
