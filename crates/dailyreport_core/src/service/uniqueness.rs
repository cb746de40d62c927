//! One-report-per-employee-per-date check.
//!
//! # Invariants
//! - Soft-deleted reports still hold their date.
//! - On update the report being edited never conflicts with itself.
//! - Read-only; callers write only after this passes.

use super::error::{ServiceError, ServiceResult};
use crate::model::report::ReportId;
use crate::repo::report_repo::ReportRepository;
use chrono::NaiveDate;

/// Fails with `DateConflict` when `employee_code` already holds a report on
/// `report_date`, ignoring `exclude_id`.
pub fn ensure_date_available<R: ReportRepository + ?Sized>(
    repo: &R,
    employee_code: &str,
    report_date: NaiveDate,
    exclude_id: Option<ReportId>,
) -> ServiceResult<()> {
    let holders = repo.report_ids_on_date(employee_code, report_date)?;
    if holders.iter().any(|id| Some(*id) != exclude_id) {
        return Err(ServiceError::DateConflict {
            employee_code: employee_code.to_string(),
            report_date,
        });
    }
    Ok(())
}
