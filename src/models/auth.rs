use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /oauth`.
///
/// `role` stays a raw string at the wire level; emptiness is checked before
/// it is parsed into a [`UserRole`], so an empty value and an unknown value
/// produce their distinct error messages.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Authorization code produced by the GitHub OAuth redirect.
    #[serde(default)]
    pub code: String,
    /// `student` or `mentor`.
    #[serde(rename = "type", default)]
    pub role: String,
}

/// The caller-declared account type, selecting which registration table to
/// check. The set is closed: anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Mentor,
}

impl UserRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "student" => Some(Self::Student),
            "mentor" => Some(Self::Mentor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Mentor => "mentor",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity returned by the OAuth collaborator. Read-only to the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthUserInfo {
    pub username: String,
    pub name: String,
    pub email: String,
}

/// Success body of `POST /oauth`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub name: String,
    pub email: String,
    /// Echoes the request's `type` verbatim, never derived from storage.
    #[serde(rename = "type")]
    pub role: UserRole,
    #[serde(rename = "isNewUser")]
    pub is_new_user: bool,
    pub jwt: String,
}
