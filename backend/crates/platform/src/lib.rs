//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64url, constant-time compare)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Client metadata extraction for audit rows
//! - Session credential extraction (cookie, bearer)
//! - Startup configuration primitives

pub mod client;
pub mod config;
pub mod credentials;
pub mod crypto;
pub mod password;
