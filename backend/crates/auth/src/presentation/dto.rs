//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// POST /api/password-reset/request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResetRequest {
    pub email: String,
}

/// POST /api/password-reset/confirm
///
/// No `Debug`: the body carries a live token and a clear-text password.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResetRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResetResponse {
    pub success: bool,
}
