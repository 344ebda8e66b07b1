//! Domain entities managed by the RBAC console.

#![forbid(unsafe_code)]

mod audit;
mod security;
mod user;

pub use audit::AuditLogEntry;
pub use security::{Permission, Role};
pub use user::User;
