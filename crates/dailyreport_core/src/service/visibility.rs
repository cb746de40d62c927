//! Role-scoped report listing.

use super::error::ServiceResult;
use crate::model::actor::{Actor, Role};
use crate::model::report::Report;
use crate::repo::report_repo::ReportRepository;

/// Reports `actor` may see, in store order.
///
/// Administrators see every stored report; everyone else sees only the
/// reports they own. Soft-deleted rows are not filtered here.
pub fn visible_reports<R: ReportRepository + ?Sized>(
    repo: &R,
    actor: &Actor,
) -> ServiceResult<Vec<Report>> {
    let reports = match actor.role {
        Role::Admin => repo.list_reports()?,
        Role::General => repo.list_reports_by_owner(&actor.code)?,
    };
    Ok(reports)
}
