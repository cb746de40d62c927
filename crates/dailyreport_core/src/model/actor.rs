//! Role and acting-identity types supplied by the identity collaborator.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use super::employee::EmployeeCode;

/// Authorization role of an employee account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Manages employee accounts and sees every report.
    Admin,
    /// Regular employee; sees only own reports.
    General,
}

impl Role {
    /// Stable storage/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::General => "GENERAL",
        }
    }

    /// Parses the storage representation. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(Self::Admin),
            "GENERAL" => Some(Self::General),
            _ => None,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated employee on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub code: EmployeeCode,
    pub role: Role,
}

impl Actor {
    pub fn new(code: impl Into<EmployeeCode>, role: Role) -> Self {
        Self {
            code: code.into(),
            role,
        }
    }
}
