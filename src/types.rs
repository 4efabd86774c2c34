/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user can hold. Stored as text on the user's information record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("admin") => Ok(Role::Admin),
            s if s.eq_ignore_ascii_case("user") => Ok(Role::User),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Cache slot names, one per entity type
pub mod cache_keys {
    pub const USERS: &str = "Users";
    pub const CLIENTS: &str = "Clients";
    pub const PROJECTS: &str = "Projects";
    pub const STATUSES: &str = "Statuses";
}
