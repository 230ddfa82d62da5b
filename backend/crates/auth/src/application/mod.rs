//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod confirm_reset;
pub mod notifier;
pub mod request_reset;
pub mod session;
pub mod sweeper;
pub mod token_store;

// Re-exports
pub use config::{ResetConfig, SessionConfig};
pub use confirm_reset::{ConfirmResetInput, ConfirmResetUseCase};
pub use notifier::{ResetNotifier, TracingResetNotifier};
pub use request_reset::RequestResetUseCase;
pub use session::SessionResolver;
pub use sweeper::spawn_reset_sweeper;
pub use token_store::{IssuedResetToken, ResetTokenStore};
