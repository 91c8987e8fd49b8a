//! Role and hierarchy level model

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Role names assigned to users in `user_roles`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    DistrictAdmin,
    Admin,
    Pastor,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::DistrictAdmin => "district_admin",
            Role::Admin => "admin",
            Role::Pastor => "pastor",
            Role::Member => "member",
        }
    }

    /// Roles that carry some event management capability
    pub fn is_manager(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::DistrictAdmin | Role::Admin | Role::Pastor)
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
        match s.trim().to_lowercase().as_str() {
            "super_admin" => Ok(Role::SuperAdmin),
            "district_admin" => Ok(Role::DistrictAdmin),
            "admin" => Ok(Role::Admin),
            "pastor" => Ok(Role::Pastor),
            "member" => Ok(Role::Member),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Set of roles held by one actor
pub type RoleSet = HashSet<Role>;

/// Tier of the district/branch hierarchy an actor or event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
pub enum HierarchyLevel {
    National,
    District,
    Branch,
}

impl HierarchyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyLevel::National => "NATIONAL",
            HierarchyLevel::District => "DISTRICT",
            HierarchyLevel::Branch => "BRANCH",
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HierarchyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NATIONAL" => Ok(HierarchyLevel::National),
            "DISTRICT" => Ok(HierarchyLevel::District),
            "BRANCH" => Ok(HierarchyLevel::Branch),
            other => Err(format!("unknown hierarchy level: {}", other)),
        }
    }
}
