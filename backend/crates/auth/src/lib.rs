//! Auth Backend Module - Password Reset and Session Principal
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Reset token store, request/confirm use cases, sweeper
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Security Model
//! - Reset tokens are 32 random bytes (base64url), stored server-side, valid 1 hour
//! - One-time use enforced by a conditional update (`used = FALSE -> TRUE`)
//! - Requests never reveal whether an account exists
//! - New passwords pass the NFKC policy and are hashed with Argon2id (+ optional pepper)
//! - Throttle checks fail open; consumption fails closed
//! - Session tokens (`{session_id}.{hmac}`) resolve to an `AuthenticatedUser`
//!   for the routes wrapped by `with_session_principal`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{ResetConfig, SessionConfig};
pub use application::{ResetTokenStore, SessionResolver, TracingResetNotifier, spawn_reset_sweeper};
pub use error::{ResetError, ResetResult};
pub use infra::postgres::{PgResetRepository, PgSessionRepository};
pub use presentation::router::{
    password_reset_router, password_reset_router_generic, with_session_principal,
};
