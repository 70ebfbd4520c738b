//! Capability-based permission gating.
//!
//! T060: Implement CapabilitySet and Requirement predicate
//!
//! The UI layer binds these predicates to widgets; the core only answers
//! whether a capability set satisfies a requirement.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The roles and permission codes granted to a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// Granted role names
    roles: HashSet<String>,
    /// Granted permission codes
    permissions: HashSet<String>,
}

impl CapabilitySet {
    /// Create an empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from role and permission iterators.
    pub fn from_grants<R, P>(roles: R, permissions: P) -> Self
    where
        R: IntoIterator<Item = String>,
        P: IntoIterator<Item = String>,
    {
        Self {
            roles: roles.into_iter().collect(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Grant a role.
    pub fn grant_role(&mut self, role: impl Into<String>) {
        self.roles.insert(role.into());
    }

    /// Grant a permission code.
    pub fn grant_permission(&mut self, permission: impl Into<String>) {
        self.permissions.insert(permission.into());
    }

    /// Whether the role is granted.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Whether the permission code is granted.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Whether nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty()
    }
}

/// A predicate over capability sets.
///
/// Route tables and widgets declare requirements as data; `allows`
/// evaluates them. An empty `AnyOf` denies, an empty `AllOf` permits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// The session holds the role
    Role(String),
    /// The session holds the permission code
    Permission(String),
    /// At least one sub-requirement is satisfied
    AnyOf(Vec<Requirement>),
    /// Every sub-requirement is satisfied
    AllOf(Vec<Requirement>),
}

impl Requirement {
    /// Require a role.
    pub fn role(name: impl Into<String>) -> Self {
        Requirement::Role(name.into())
    }

    /// Require a permission code.
    pub fn permission(code: impl Into<String>) -> Self {
        Requirement::Permission(code.into())
    }

    /// Require any of the given requirements.
    pub fn any_of(requirements: Vec<Requirement>) -> Self {
        Requirement::AnyOf(requirements)
    }

    /// Require all of the given requirements.
    pub fn all_of(requirements: Vec<Requirement>) -> Self {
        Requirement::AllOf(requirements)
    }

    /// Whether the capability set satisfies this requirement.
    pub fn allows(&self, capabilities: &CapabilitySet) -> bool {
        match self {
            Requirement::Role(name) => capabilities.has_role(name),
            Requirement::Permission(code) => capabilities.has_permission(code),
            Requirement::AnyOf(requirements) => {
                requirements.iter().any(|r| r.allows(capabilities))
            }
            Requirement::AllOf(requirements) => {
                requirements.iter().all(|r| r.allows(capabilities))
            }
        }
    }
}
