//! Employee domain model.
//!
//! # Responsibility
//! - Define the stored employee account record.
//! - Define the input shape used to create or update an account.
//!
//! # Invariants
//! - `code` is the primary key and never changes after creation.
//! - `password_hash` only ever holds encoder output, never a raw password.
//! - `is_deleted` is the source of truth for tombstone state.

use serde::{Deserialize, Serialize};

use super::actor::Role;
use super::EpochMillis;
use crate::password::PasswordEncoder;

/// Employee number. Unique across active and deleted accounts.
pub type EmployeeCode = String;

/// Stored employee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub code: EmployeeCode,
    pub name: String,
    pub role: Role,
    /// Irreversible hash in the encoder's own format.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_deleted: bool,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
}

impl Employee {
    /// Returns whether this account should be considered active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Checks a raw password against the stored hash.
    pub fn verify_password(&self, raw_password: &str, encoder: &impl PasswordEncoder) -> bool {
        encoder.matches(raw_password, &self.password_hash)
    }

    /// Marks this account as softly deleted at `now`.
    pub fn soft_delete(&mut self, now: EpochMillis) {
        self.is_deleted = true;
        self.updated_at = now;
    }
}

/// Account data submitted by an administrator.
///
/// `password` is raw input. On update an empty value means "keep the
/// stored hash".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmployeeDraft {
    pub code: EmployeeCode,
    pub name: String,
    pub role: Role,
    pub password: String,
}

impl EmployeeDraft {
    pub fn new(
        code: impl Into<EmployeeCode>,
        name: impl Into<String>,
        role: Role,
        password: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            role,
            password: password.into(),
        }
    }

    /// Whether the caller left the password field blank.
    pub fn keeps_password(&self) -> bool {
        self.password.is_empty()
    }
}
