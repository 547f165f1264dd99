//! Caller identification and access control

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Capability level granted to a bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "instructor")]
    Instructor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Instructor => f.write_str("instructor"),
        }
    }
}

/// Resource classes guarded by the access guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// Administration of account requests
    AccountRequest,
    /// Joining with a registration key
    Registration,
}

/// Identity of whoever issued a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated { role: Role },
}

impl Caller {
    pub fn admin() -> Self {
        Caller::Authenticated { role: Role::Admin }
    }

    pub fn instructor() -> Self {
        Caller::Authenticated {
            role: Role::Instructor,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::Authenticated { .. })
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated { role } => Some(*role),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caller::Anonymous => f.write_str("anonymous"),
            Caller::Authenticated { role } => write!(f, "{}", role),
        }
    }
}

/// Decides who may run which action
pub trait AccessGuard: Send + Sync {
    /// Resolve the caller from an `Authorization` header value
    fn identify(&self, authorization: Option<&str>) -> Caller;

    fn authorize(&self, caller: &Caller, resource: ResourceClass) -> bool;
}

/// Access guard backed by a static token table
pub struct TokenAccessGuard {
    tokens: HashMap<String, Role>,
}

impl TokenAccessGuard {
    pub fn new(tokens: HashMap<String, Role>) -> Self {
        Self { tokens }
    }
}

impl AccessGuard for TokenAccessGuard {
    fn identify(&self, authorization: Option<&str>) -> Caller {
        let token = authorization
            .and_then(|value| value.trim().strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        match token.and_then(|token| self.tokens.get(token)) {
            Some(role) => Caller::Authenticated { role: *role },
            None => Caller::Anonymous,
        }
    }

    fn authorize(&self, caller: &Caller, resource: ResourceClass) -> bool {
        match (resource, caller.role()) {
            (ResourceClass::AccountRequest, Some(Role::Admin)) => true,
            (ResourceClass::AccountRequest, _) => false,
            (ResourceClass::Registration, role) => role.is_some(),
        }
    }
}
