//! Report repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist reports and serve id/owner/date lookups.
//! - Back the one-report-per-date check with the `(employee_code,
//!   report_date)` index instead of a full scan.
//!
//! # Invariants
//! - Lookups include soft-deleted rows unless stated otherwise.
//! - List order is insertion order.
//! - `report_date` is stored as `YYYY-MM-DD` text.

use super::{bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult};
use crate::model::report::{Report, ReportId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

const REPORT_SELECT_SQL: &str = "SELECT
    id,
    employee_code,
    report_date,
    title,
    content,
    is_deleted,
    created_at,
    updated_at
FROM reports";

/// Repository interface for daily reports.
pub trait ReportRepository {
    /// Inserts a new row. A taken `(employee_code, report_date)` pair fails
    /// with `UniqueViolation`.
    fn insert_report(&self, report: &Report) -> RepoResult<()>;
    /// Overwrites every mutable column of an existing row.
    fn update_report(&self, report: &Report) -> RepoResult<()>;
    fn get_report(&self, id: ReportId) -> RepoResult<Option<Report>>;
    fn list_reports(&self) -> RepoResult<Vec<Report>>;
    fn list_reports_by_owner(&self, employee_code: &str) -> RepoResult<Vec<Report>>;
    /// Ids of every report, deleted or not, held by `employee_code` on `report_date`.
    fn report_ids_on_date(
        &self,
        employee_code: &str,
        report_date: NaiveDate,
    ) -> RepoResult<Vec<ReportId>>;
}

/// SQLite-backed report repository.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "reports")?;
        Ok(Self { conn })
    }

    fn query_reports(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Report>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut reports = Vec::new();
        while let Some(row) = rows.next()? {
            reports.push(parse_report_row(row)?);
        }
        Ok(reports)
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn insert_report(&self, report: &Report) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO reports (
                id,
                employee_code,
                report_date,
                title,
                content,
                is_deleted,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                report.id.to_string(),
                report.employee_code.as_str(),
                format_report_date(report.report_date),
                report.title.as_str(),
                report.content.as_str(),
                bool_to_int(report.is_deleted),
                report.created_at,
                report.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update_report(&self, report: &Report) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE reports
             SET
                employee_code = ?1,
                report_date = ?2,
                title = ?3,
                content = ?4,
                is_deleted = ?5,
                updated_at = ?6
             WHERE id = ?7;",
            params![
                report.employee_code.as_str(),
                format_report_date(report.report_date),
                report.title.as_str(),
                report.content.as_str(),
                bool_to_int(report.is_deleted),
                report.updated_at,
                report.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "report",
                key: report.id.to_string(),
            });
        }
        Ok(())
    }

    fn get_report(&self, id: ReportId) -> RepoResult<Option<Report>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REPORT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_report_row(row)?));
        }
        Ok(None)
    }

    fn list_reports(&self) -> RepoResult<Vec<Report>> {
        self.query_reports(&format!("{REPORT_SELECT_SQL} ORDER BY rowid ASC;"), [])
    }

    fn list_reports_by_owner(&self, employee_code: &str) -> RepoResult<Vec<Report>> {
        self.query_reports(
            &format!("{REPORT_SELECT_SQL} WHERE employee_code = ?1 ORDER BY rowid ASC;"),
            [employee_code],
        )
    }

    fn report_ids_on_date(
        &self,
        employee_code: &str,
        report_date: NaiveDate,
    ) -> RepoResult<Vec<ReportId>> {
        let mut stmt = self.conn.prepare(
            "SELECT id
             FROM reports
             WHERE employee_code = ?1
               AND report_date = ?2
             ORDER BY rowid ASC;",
        )?;
        let ids = stmt
            .query_map(
                params![employee_code, format_report_date(report_date)],
                |row| row.get::<_, String>(0),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        ids.iter().map(|id| parse_report_id(id)).collect()
    }
}

fn parse_report_row(row: &Row<'_>) -> RepoResult<Report> {
    let id_text: String = row.get("id")?;
    let date_text: String = row.get("report_date")?;
    let report_date = NaiveDate::parse_from_str(&date_text, REPORT_DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in reports.report_date"
        ))
    })?;

    Ok(Report {
        id: parse_report_id(&id_text)?,
        employee_code: row.get("employee_code")?,
        report_date,
        title: row.get("title")?,
        content: row.get("content")?,
        is_deleted: int_to_bool(row.get("is_deleted")?, "reports.is_deleted")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_report_id(value: &str) -> RepoResult<ReportId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in reports.id")))
}

fn format_report_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}
