//! Report lifecycle service.
//!
//! # Responsibility
//! - Create, update and soft-delete reports with audit timestamps.
//! - Run the date uniqueness check before every report write.
//! - Serve role-scoped and plain report reads.
//!
//! # Invariants
//! - A rejected operation performs no write.
//! - `created_at` is stamped once on create and carried forward after.
//! - Create and update always leave `is_deleted = false`.

use super::error::{ServiceError, ServiceResult};
use super::uniqueness::ensure_date_available;
use super::visibility;
use crate::clock::Clock;
use crate::model::actor::Actor;
use crate::model::report::{Report, ReportDraft, ReportId, ReportUpdate};
use crate::repo::report_repo::ReportRepository;
use crate::repo::RepoError;
use log::{info, warn};
use uuid::Uuid;

/// Use-case service for daily reports.
pub struct ReportService<R: ReportRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: ReportRepository, C: Clock> ReportService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Time source shared with services that coordinate with this one.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Creates a report authored on behalf of `actor`.
    ///
    /// # Errors
    /// - `DateConflict` when the owner already holds a report on that date,
    ///   deleted or not, or when a concurrent insert wins the race.
    pub fn create_report(&self, draft: &ReportDraft, actor: &Actor) -> ServiceResult<Report> {
        if let Err(err) =
            ensure_date_available(&self.repo, &draft.employee_code, draft.report_date, None)
        {
            log_rejected("report_create", &err);
            return Err(err);
        }

        let now = self.clock.now_millis();
        let report = Report {
            id: Uuid::new_v4(),
            employee_code: draft.employee_code.clone(),
            report_date: draft.report_date,
            title: draft.title.clone(),
            content: draft.content.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert_report(&report)
            .map_err(|err| date_conflict_on_unique(err, &report))?;

        info!(
            "event=report_create module=service status=ok report_id={} actor={}",
            report.id, actor.code
        );
        Ok(report)
    }

    /// Replaces the editable fields of an existing report.
    ///
    /// # Errors
    /// - `DateConflict` when another report of the owner holds the new date.
    /// - `ReportNotFound` when `update.id` does not exist.
    pub fn update_report(&self, update: &ReportUpdate) -> ServiceResult<Report> {
        if let Err(err) = ensure_date_available(
            &self.repo,
            &update.employee_code,
            update.report_date,
            Some(update.id),
        ) {
            log_rejected("report_update", &err);
            return Err(err);
        }

        let stored = self.require_report(update.id)?;
        let report = Report {
            id: update.id,
            employee_code: update.employee_code.clone(),
            report_date: update.report_date,
            title: update.title.clone(),
            content: update.content.clone(),
            is_deleted: false,
            created_at: stored.created_at,
            updated_at: self.clock.now_millis(),
        };

        self.repo
            .update_report(&report)
            .map_err(|err| date_conflict_on_unique(err, &report))?;

        info!(
            "event=report_update module=service status=ok report_id={}",
            report.id
        );
        Ok(report)
    }

    /// Soft-deletes one report. Repeating it keeps the flag set and
    /// refreshes `updated_at`.
    pub fn soft_delete_report(&self, id: ReportId) -> ServiceResult<Report> {
        let mut report = self.require_report(id)?;
        report.soft_delete(self.clock.now_millis());
        self.repo.update_report(&report)?;

        info!("event=report_delete module=service status=ok report_id={id}");
        Ok(report)
    }

    /// Gets one report, deleted or not.
    pub fn get_report(&self, id: ReportId) -> ServiceResult<Option<Report>> {
        Ok(self.repo.get_report(id)?)
    }

    /// Lists every stored report in store order.
    pub fn list_reports(&self) -> ServiceResult<Vec<Report>> {
        Ok(self.repo.list_reports()?)
    }

    /// Lists every report owned by `employee_code`, deleted ones included.
    pub fn reports_by_owner(&self, employee_code: &str) -> ServiceResult<Vec<Report>> {
        Ok(self.repo.list_reports_by_owner(employee_code)?)
    }

    /// Reports visible to `actor` according to their role.
    pub fn visible_reports(&self, actor: &Actor) -> ServiceResult<Vec<Report>> {
        visibility::visible_reports(&self.repo, actor)
    }

    fn require_report(&self, id: ReportId) -> ServiceResult<Report> {
        self.repo
            .get_report(id)?
            .ok_or(ServiceError::ReportNotFound(id))
    }
}

fn date_conflict_on_unique(err: RepoError, report: &Report) -> ServiceError {
    match err {
        RepoError::UniqueViolation(detail) => {
            warn!(
                "event=report_write module=service status=rejected error_code=DATE_CONFLICT source=storage detail={detail}"
            );
            ServiceError::DateConflict {
                employee_code: report.employee_code.clone(),
                report_date: report.report_date,
            }
        }
        RepoError::NotFound { .. } => ServiceError::ReportNotFound(report.id),
        other => ServiceError::Repo(other),
    }
}

pub(crate) fn log_rejected(event: &str, err: &ServiceError) {
    match err.kind() {
        Some(kind) => warn!("event={event} module=service status=rejected error_code={kind}"),
        None => warn!("event={event} module=service status=error error={err}"),
    }
}
