//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (DownloadCapability, Entitlement, DownloadLogEntry, FileRef)
//! - Domain services (token codec)
//! - Revocation denylist
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod revocation;
pub mod services;
