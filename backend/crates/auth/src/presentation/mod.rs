//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::ResetAppState;
pub use middleware::resolve_principal;
pub use router::{password_reset_router, password_reset_router_generic, with_session_principal};
