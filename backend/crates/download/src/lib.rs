//! Download Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Token codec, entities, revocation denylist, repository traits
//! - `application/` - Use cases (grant, redeem, revoke, entitlement status)
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Security Model
//! - Download links are stateless HMAC-SHA256 capabilities; nothing is stored at issue time
//! - Signatures are compared in constant time
//! - The quota check and the log append are one serialized ledger operation
//! - Ledger faults deny (fail closed)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::DownloadConfig;
pub use domain::services::{TokenCodec, TokenRejection};
pub use error::{DenialReason, DownloadError, DownloadResult};
pub use infra::postgres::PgDownloadRepository;
pub use presentation::router::{download_router, download_router_generic};
