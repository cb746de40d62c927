//! Daily report domain model.
//!
//! # Invariants
//! - At most one report exists per `(employee_code, report_date)`, deleted
//!   rows included.
//! - `report_date` carries no time component.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::employee::EmployeeCode;
use super::EpochMillis;

/// Stable report identifier, generated by the core on creation.
pub type ReportId = Uuid;

/// Stored daily report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    /// Owning employee. Many reports per employee, one per date.
    pub employee_code: EmployeeCode,
    pub report_date: NaiveDate,
    pub title: String,
    pub content: String,
    pub is_deleted: bool,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
}

impl Report {
    /// Returns whether this report should be considered active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Marks this report as softly deleted at `now`.
    pub fn soft_delete(&mut self, now: EpochMillis) {
        self.is_deleted = true;
        self.updated_at = now;
    }
}

/// Report fields submitted for creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportDraft {
    pub employee_code: EmployeeCode,
    pub report_date: NaiveDate,
    pub title: String,
    pub content: String,
}

impl ReportDraft {
    pub fn new(
        employee_code: impl Into<EmployeeCode>,
        report_date: NaiveDate,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            employee_code: employee_code.into(),
            report_date,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Full replacement of an existing report's editable fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportUpdate {
    pub id: ReportId,
    pub employee_code: EmployeeCode,
    pub report_date: NaiveDate,
    pub title: String,
    pub content: String,
}

impl From<&Report> for ReportUpdate {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            employee_code: report.employee_code.clone(),
            report_date: report.report_date,
            title: report.title.clone(),
            content: report.content.clone(),
        }
    }
}
