//! Lifecycle service errors and the outcome taxonomy shown to callers.
//!
//! # Invariants
//! - Business-rule rejections are detected before any write.
//! - [`ErrorKind::of`] maps only business outcomes; storage faults and
//!   missing records map to `None`.

use crate::model::employee::EmployeeCode;
use crate::model::report::ReportId;
use crate::password::{PasswordEncodeError, PasswordShapeError};
use crate::repo::RepoError;
use chrono::NaiveDate;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from employee/report lifecycle operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Owner already has a report (active or deleted) on this date.
    DateConflict {
        employee_code: EmployeeCode,
        report_date: NaiveDate,
    },
    /// Employee code already taken, including storage-level races.
    Duplicate(EmployeeCode),
    /// Raw password rejected by the shape rules.
    Password(PasswordShapeError),
    /// Actor tried to delete their own account.
    SelfDeleteForbidden(EmployeeCode),
    EmployeeNotFound(EmployeeCode),
    ReportNotFound(ReportId),
    /// Employee row is deleted but some owned reports could not be.
    /// Retry with `resume_cascade`.
    CascadeIncomplete {
        employee_code: EmployeeCode,
        failed: Vec<(ReportId, ServiceError)>,
    },
    PasswordEncoding(PasswordEncodeError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DateConflict {
                employee_code,
                report_date,
            } => write!(
                f,
                "employee {employee_code} already has a report dated {report_date}"
            ),
            Self::Duplicate(code) => write!(f, "employee code already exists: {code}"),
            Self::Password(err) => write!(f, "{err}"),
            Self::SelfDeleteForbidden(code) => {
                write!(f, "employee {code} cannot delete their own account")
            }
            Self::EmployeeNotFound(code) => write!(f, "employee not found: {code}"),
            Self::ReportNotFound(id) => write!(f, "report not found: {id}"),
            Self::CascadeIncomplete {
                employee_code,
                failed,
            } => write!(
                f,
                "employee {employee_code} deleted but {} owned report(s) were not",
                failed.len()
            ),
            Self::PasswordEncoding(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Password(err) => Some(err),
            Self::PasswordEncoding(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PasswordShapeError> for ServiceError {
    fn from(value: PasswordShapeError) -> Self {
        Self::Password(value)
    }
}

impl From<PasswordEncodeError> for ServiceError {
    fn from(value: PasswordEncodeError) -> Self {
        Self::PasswordEncoding(value)
    }
}

/// Outcome of a lifecycle operation, as surfaced to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Success,
    DateConflict,
    Duplicate,
    NotAlphanumeric,
    OutOfLengthRange,
    SelfDeleteForbidden,
}

impl ErrorKind {
    /// Stable code for message lookup.
    pub fn code(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::DateConflict => "DATE_CONFLICT",
            Self::Duplicate => "DUPLICATE",
            Self::NotAlphanumeric => "NOT_ALPHANUMERIC",
            Self::OutOfLengthRange => "OUT_OF_LENGTH_RANGE",
            Self::SelfDeleteForbidden => "SELF_DELETE_FORBIDDEN",
        }
    }

    /// Classifies an operation result. `None` means a fault, not a
    /// business outcome.
    pub fn of<T>(result: &ServiceResult<T>) -> Option<Self> {
        match result {
            Ok(_) => Some(Self::Success),
            Err(err) => err.kind(),
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl ServiceError {
    /// Business outcome kind, if this error is one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::DateConflict { .. } => Some(ErrorKind::DateConflict),
            Self::Duplicate(_) => Some(ErrorKind::Duplicate),
            Self::Password(PasswordShapeError::NotAlphanumeric) => {
                Some(ErrorKind::NotAlphanumeric)
            }
            Self::Password(PasswordShapeError::OutOfLengthRange { .. }) => {
                Some(ErrorKind::OutOfLengthRange)
            }
            Self::SelfDeleteForbidden(_) => Some(ErrorKind::SelfDeleteForbidden),
            Self::EmployeeNotFound(_)
            | Self::ReportNotFound(_)
            | Self::CascadeIncomplete { .. }
            | Self::PasswordEncoding(_)
            | Self::Repo(_) => None,
        }
    }
}
