use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::db::admin;

/// JWT claims for both citizen and admin tokens
///
/// Citizens carry `email`, admins carry `username` and `role`. The `is_admin`
/// flag decides which route family the token is good for; admin authorization
/// is re-checked against the database on every request regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user or admin id, as a string)
    pub sub: String,

    /// Citizen email, present on citizen tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Admin username, present on admin tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Whether this token was minted for the admin route family
    pub is_admin: bool,

    /// Admin role at mint time; informational only, never authoritative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Parse the subject back into the numeric database id.
    pub fn subject_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// Admin roles, ordered from most to least privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRole {
    SuperAdmin,
    DataEntry,
    Viewer,
}

impl AdminRole {
    pub const ALL: [AdminRole; 3] = [AdminRole::SuperAdmin, AdminRole::DataEntry, AdminRole::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::DataEntry => "data_entry",
            AdminRole::Viewer => "viewer",
        }
    }
}

impl FromStr for AdminRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(AdminRole::SuperAdmin),
            "data_entry" => Ok(AdminRole::DataEntry),
            "viewer" => Ok(AdminRole::Viewer),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated admin: verified claims plus the admin row loaded fresh
/// from the database for this request
///
/// Constructed only by `AuthGateway::authenticate_admin`, so holding one is
/// proof that the row existed and was active when the request started. Role
/// checks read `admin.role`, not the token claim, so a stale token cannot
/// keep privileges its row has lost.
#[derive(Debug, Clone)]
pub struct AdminActor {
    pub claims: Claims,
    pub admin: admin::Model,
}

impl AdminActor {
    pub fn admin_id(&self) -> i32 {
        self.admin.id
    }

    /// Role from the stored row, parsed; rows only ever hold known roles.
    pub fn role(&self) -> Option<AdminRole> {
        self.admin.role.parse().ok()
    }
}
