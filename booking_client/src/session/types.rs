use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::session::errors::SessionError;

/// Privilege level of an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(SessionError::UnknownRole(other.to_string())),
        }
    }
}

/// Account record as the backend reports it from the identity endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// In-memory snapshot of the current authenticated identity.
///
/// `user`, `token` and `role` are always replaced together; `loading == true`
/// means an auth operation is in flight and authorization decisions must
/// wait. A fresh session starts in the loading state until the initializer
/// has hydrated it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub role: Option<Role>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl Session {
    /// The pre-hydration state at process start.
    pub(crate) fn initial() -> Self {
        Self {
            user: None,
            token: None,
            role: None,
            is_authenticated: false,
            loading: true,
        }
    }

    /// The settled unauthenticated state.
    pub fn empty() -> Self {
        Self {
            loading: false,
            ..Self::initial()
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}
