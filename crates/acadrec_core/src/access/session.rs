//! Authenticated caller context.

use crate::access::capability::{policy_for, Capability, RolePolicy};
use crate::model::record::{Record, Role};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The caller's role lacks a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    pub role: Role,
    pub capability: Capability,
}

impl Display for AccessDenied {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "permission denied: role {} cannot {}",
            self.role.as_str(),
            self.capability
        )
    }
}

impl Error for AccessDenied {}

/// Snapshot of the authenticated user, passed to every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: Record,
}

impl Session {
    pub fn new(user: Record) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &Record {
        &self.user
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn role(&self) -> &Role {
        &self.user.role
    }

    pub fn policy(&self) -> &'static RolePolicy {
        policy_for(&self.user.role)
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.policy().allows(capability)
    }

    /// Fails with `AccessDenied` unless the caller holds `capability`.
    pub fn require(&self, capability: Capability) -> Result<(), AccessDenied> {
        if self.can(capability) {
            return Ok(());
        }
        Err(AccessDenied {
            role: self.user.role.clone(),
            capability,
        })
    }

    /// Replaces the snapshot after the caller's own row changed on disk.
    pub fn refresh(&mut self, user: Record) {
        if user.id == self.user.id {
            self.user = user;
        }
    }
}
