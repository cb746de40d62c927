//! Employee-to-report soft-delete cascade.
//!
//! # Invariants
//! - Each report is deleted in its own write; the batch is not atomic.
//! - A full run sends every owned report through the report delete path,
//!   refreshing `updated_at` of reports that were already deleted.
//! - A retry run only touches reports still active, so timestamps written
//!   by an earlier partial run survive.

use super::error::{ServiceError, ServiceResult};
use super::report_service::ReportService;
use crate::clock::Clock;
use crate::model::employee::EmployeeCode;
use crate::model::report::ReportId;
use crate::repo::report_repo::ReportRepository;
use log::{error, info};

/// Which owned reports a cascade run sends through the delete path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeMode {
    /// Every owned report, deleted or not.
    All,
    /// Only reports that are still active.
    ActiveOnly,
}

/// What one cascade run did.
#[derive(Debug, Default)]
pub struct CascadeOutcome {
    pub employee_code: EmployeeCode,
    /// Reports soft-deleted by this run.
    pub deleted: Vec<ReportId>,
    /// Reports skipped because an earlier run already deleted them.
    pub already_deleted: Vec<ReportId>,
    /// Reports this run failed to delete.
    pub failed: Vec<(ReportId, ServiceError)>,
}

impl CascadeOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turns a run with failures into `CascadeIncomplete`.
    pub fn into_result(self) -> ServiceResult<Self> {
        if self.is_complete() {
            return Ok(self);
        }
        Err(ServiceError::CascadeIncomplete {
            employee_code: self.employee_code,
            failed: self.failed,
        })
    }
}

/// Soft-deletes the reports owned by `employee_code` selected by `mode`,
/// one by one.
///
/// Failing to list the owner's reports aborts the run; a failure on one
/// report is recorded and the run continues with the next.
pub fn cascade_delete_reports<R: ReportRepository, C: Clock>(
    reports: &ReportService<R, C>,
    employee_code: &str,
    mode: CascadeMode,
) -> ServiceResult<CascadeOutcome> {
    let owned = reports.reports_by_owner(employee_code)?;
    let mut outcome = CascadeOutcome {
        employee_code: employee_code.to_string(),
        ..CascadeOutcome::default()
    };

    for report in owned {
        if mode == CascadeMode::ActiveOnly && report.is_deleted {
            outcome.already_deleted.push(report.id);
            continue;
        }
        match reports.soft_delete_report(report.id) {
            Ok(_) => outcome.deleted.push(report.id),
            Err(err) => {
                error!(
                    "event=report_cascade module=service status=error employee_code={} report_id={} error={}",
                    employee_code, report.id, err
                );
                outcome.failed.push((report.id, err));
            }
        }
    }

    info!(
        "event=report_cascade module=service status={} employee_code={} mode={:?} deleted={} already_deleted={} failed={}",
        if outcome.is_complete() { "ok" } else { "partial" },
        employee_code,
        mode,
        outcome.deleted.len(),
        outcome.already_deleted.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}
