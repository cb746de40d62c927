//! Employee lifecycle service.
//!
//! # Responsibility
//! - Create and update accounts with password shape checks and hashing.
//! - Soft-delete accounts and cascade the delete to owned reports.
//!
//! # Invariants
//! - An actor can never delete their own account.
//! - An empty password on update keeps the stored hash byte-for-byte.
//! - `created_at` is carried forward; `updated_at` is refreshed on every write.
//! - Rejected operations perform no write.

use super::cascade::{cascade_delete_reports, CascadeMode, CascadeOutcome};
use super::error::{ServiceError, ServiceResult};
use super::guard::ensure_not_self;
use super::report_service::{log_rejected, ReportService};
use crate::clock::Clock;
use crate::model::actor::Actor;
use crate::model::employee::{Employee, EmployeeDraft};
use crate::password::{check_password_shape, PasswordEncoder};
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::report_repo::ReportRepository;
use crate::repo::RepoError;
use log::{info, warn};

/// Use-case service for employee accounts.
///
/// Owns the report service so account deletion can cascade through the
/// same report lifecycle path as a direct report delete.
pub struct EmployeeService<E, R, H, C>
where
    E: EmployeeRepository,
    R: ReportRepository,
    H: PasswordEncoder,
    C: Clock,
{
    repo: E,
    reports: ReportService<R, C>,
    encoder: H,
}

impl<E, R, H, C> EmployeeService<E, R, H, C>
where
    E: EmployeeRepository,
    R: ReportRepository,
    H: PasswordEncoder,
    C: Clock,
{
    pub fn new(repo: E, reports: ReportService<R, C>, encoder: H) -> Self {
        Self {
            repo,
            reports,
            encoder,
        }
    }

    /// Report service used for cascades.
    pub fn reports(&self) -> &ReportService<R, C> {
        &self.reports
    }

    /// Registers a new account.
    ///
    /// # Errors
    /// - `Password` when the raw password fails the shape rules.
    /// - `Duplicate` when the code exists (deleted accounts included), or a
    ///   concurrent insert takes it first.
    pub fn create_employee(&self, draft: &EmployeeDraft) -> ServiceResult<Employee> {
        let result = self.try_create(draft);
        match &result {
            Ok(employee) => info!(
                "event=employee_create module=service status=ok employee_code={} role={}",
                employee.code, employee.role
            ),
            Err(err) => log_rejected("employee_create", err),
        }
        result
    }

    fn try_create(&self, draft: &EmployeeDraft) -> ServiceResult<Employee> {
        check_password_shape(&draft.password)?;

        if self.repo.get_employee(&draft.code)?.is_some() {
            return Err(ServiceError::Duplicate(draft.code.clone()));
        }

        let password_hash = self.encoder.encode(&draft.password)?;
        let now = self.reports.clock().now_millis();
        let employee = Employee {
            code: draft.code.clone(),
            name: draft.name.clone(),
            role: draft.role,
            password_hash,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert_employee(&employee)
            .map_err(|err| match err {
                RepoError::UniqueViolation(_) => ServiceError::Duplicate(employee.code.clone()),
                other => ServiceError::Repo(other),
            })?;
        Ok(employee)
    }

    /// Replaces name, role and optionally the password of an account.
    ///
    /// Also clears the delete flag, so updating a deleted account revives it.
    ///
    /// # Errors
    /// - `EmployeeNotFound` when `draft.code` does not exist.
    /// - `Password` when a non-empty password fails the shape rules.
    pub fn update_employee(&self, draft: &EmployeeDraft) -> ServiceResult<Employee> {
        let result = self.try_update(draft);
        match &result {
            Ok(employee) => info!(
                "event=employee_update module=service status=ok employee_code={} password_changed={}",
                employee.code,
                !draft.keeps_password()
            ),
            Err(err) => log_rejected("employee_update", err),
        }
        result
    }

    fn try_update(&self, draft: &EmployeeDraft) -> ServiceResult<Employee> {
        let stored = self.require_employee(&draft.code)?;

        let password_hash = if draft.keeps_password() {
            stored.password_hash
        } else {
            check_password_shape(&draft.password)?;
            self.encoder.encode(&draft.password)?
        };

        let employee = Employee {
            code: stored.code,
            name: draft.name.clone(),
            role: draft.role,
            password_hash,
            is_deleted: false,
            created_at: stored.created_at,
            updated_at: self.reports.clock().now_millis(),
        };

        self.repo
            .update_employee(&employee)
            .map_err(|err| not_found_as_employee(err, &employee.code))?;
        Ok(employee)
    }

    /// Soft-deletes `code` on behalf of `actor`, then every report it owns,
    /// including reports deleted earlier.
    ///
    /// # Errors
    /// - `SelfDeleteForbidden` when `code == actor.code`; nothing is read or written.
    /// - `EmployeeNotFound` when `code` does not exist.
    /// - `CascadeIncomplete` when the account was deleted but some reports
    ///   were not; call [`Self::resume_cascade`] to finish.
    pub fn soft_delete_employee(&self, code: &str, actor: &Actor) -> ServiceResult<CascadeOutcome> {
        if let Err(err) = ensure_not_self(code, actor) {
            log_rejected("employee_delete", &err);
            return Err(err);
        }

        let mut employee = self.require_employee(code)?;
        employee.soft_delete(self.reports.clock().now_millis());
        self.repo
            .update_employee(&employee)
            .map_err(|err| not_found_as_employee(err, code))?;

        info!(
            "event=employee_delete module=service status=ok employee_code={} actor={}",
            code, actor.code
        );

        cascade_delete_reports(&self.reports, code, CascadeMode::All)?.into_result()
    }

    /// Re-runs the report cascade for an already deleted account.
    ///
    /// Reports deleted by an earlier run are left untouched. An active
    /// account is skipped without changes.
    pub fn resume_cascade(&self, code: &str) -> ServiceResult<CascadeOutcome> {
        let employee = self.require_employee(code)?;
        if employee.is_active() {
            warn!(
                "event=report_cascade module=service status=skipped employee_code={code} reason=employee_active"
            );
            return Ok(CascadeOutcome {
                employee_code: employee.code,
                ..CascadeOutcome::default()
            });
        }

        cascade_delete_reports(&self.reports, code, CascadeMode::ActiveOnly)?.into_result()
    }

    /// Gets one account, deleted or not.
    pub fn get_employee(&self, code: &str) -> ServiceResult<Option<Employee>> {
        Ok(self.repo.get_employee(code)?)
    }

    /// Lists every account in store order.
    pub fn list_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.repo.list_employees()?)
    }

    fn require_employee(&self, code: &str) -> ServiceResult<Employee> {
        self.repo
            .get_employee(code)?
            .ok_or_else(|| ServiceError::EmployeeNotFound(code.to_string()))
    }
}

fn not_found_as_employee(err: RepoError, code: &str) -> ServiceError {
    match err {
        RepoError::NotFound { .. } => ServiceError::EmployeeNotFound(code.to_string()),
        other => ServiceError::Repo(other),
    }
}
