//! Role-based access control.
//!
//! # Responsibility
//! - Hold the single role -> capability lookup table.
//! - Carry the authenticated caller as an explicit `Session` value.
//!
//! # Invariants
//! - Permission checks, projection and mutation validation all consult
//!   `policy_for`; no other module branches on role for access.

pub mod capability;
pub mod session;

pub use capability::{policy_for, Capability, RolePolicy, RowScope};
pub use session::{AccessDenied, Session};
