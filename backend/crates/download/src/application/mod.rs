//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod config;
pub mod entitlement;
pub mod entitlement_status;
pub mod grant_link;
pub mod redeem_download;
pub mod revoke_link;

pub use entitlement::EntitlementChecker;
pub use entitlement_status::EntitlementStatusUseCase;
pub use grant_link::GrantDownloadLinkUseCase;
pub use redeem_download::{RedeemDownloadInput, RedeemDownloadUseCase};
pub use revoke_link::RevokeDownloadLinkUseCase;
