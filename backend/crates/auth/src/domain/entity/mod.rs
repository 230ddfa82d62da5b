//! Entity Module

pub mod auth_session;
pub mod password_reset_token;
pub mod user;
