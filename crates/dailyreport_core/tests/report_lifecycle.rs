use chrono::NaiveDate;
use dailyreport_core::db::open_db_in_memory;
use dailyreport_core::{
    Actor, Clock, Employee, EmployeeRepository, EpochMillis, ErrorKind, RepoResult, Report,
    ReportDraft, ReportId, ReportRepository, ReportService, ReportUpdate, Role, ServiceError,
    SqliteEmployeeRepository, SqliteReportRepository,
};
use rusqlite::Connection;
use std::cell::Cell;
use uuid::Uuid;

struct ManualClock(Cell<EpochMillis>);

impl ManualClock {
    fn at(now: EpochMillis) -> Self {
        Self(Cell::new(now))
    }

    fn set(&self, now: EpochMillis) {
        self.0.set(now);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> EpochMillis {
        self.0.get()
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn seed_employees(conn: &Connection, codes: &[&str]) {
    let repo = SqliteEmployeeRepository::try_new(conn).unwrap();
    for code in codes {
        repo.insert_employee(&Employee {
            code: code.to_string(),
            name: format!("employee {code}"),
            role: Role::General,
            password_hash: "seeded".to_string(),
            is_deleted: false,
            created_at: 0,
            updated_at: 0,
        })
        .unwrap();
    }
}

fn service<'a>(
    conn: &'a Connection,
    clock: &'a ManualClock,
) -> ReportService<SqliteReportRepository<'a>, &'a ManualClock> {
    ReportService::new(SqliteReportRepository::try_new(conn).unwrap(), clock)
}

fn draft(owner: &str, date: NaiveDate, title: &str) -> ReportDraft {
    ReportDraft::new(owner, date, title, format!("{title} body"))
}

fn actor(code: &str) -> Actor {
    Actor::new(code, Role::General)
}

#[test]
fn create_stamps_timestamps_and_clears_delete_flag() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    let created = reports
        .create_report(&draft("E1", day(1), "Monday"), &actor("E1"))
        .unwrap();

    assert!(!created.is_deleted);
    assert_eq!(created.created_at, 1_000);
    assert_eq!(created.updated_at, 1_000);
    assert_eq!(reports.get_report(created.id).unwrap(), Some(created));
}

#[test]
fn create_on_taken_date_is_date_conflict_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    reports
        .create_report(&draft("E1", day(1), "first"), &actor("E1"))
        .unwrap();
    let before = reports.list_reports().unwrap();

    let result = reports.create_report(&draft("E1", day(1), "second"), &actor("E1"));
    assert_eq!(ErrorKind::of(&result), Some(ErrorKind::DateConflict));
    assert_eq!(reports.list_reports().unwrap(), before);
}

#[test]
fn same_date_for_different_employees_is_allowed() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1", "E2"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    reports
        .create_report(&draft("E1", day(1), "mine"), &actor("E1"))
        .unwrap();
    reports
        .create_report(&draft("E2", day(1), "theirs"), &actor("E2"))
        .unwrap();
    assert_eq!(reports.list_reports().unwrap().len(), 2);
}

#[test]
fn soft_deleted_report_still_blocks_its_date() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    let created = reports
        .create_report(&draft("E1", day(1), "gone"), &actor("E1"))
        .unwrap();
    reports.soft_delete_report(created.id).unwrap();

    let err = reports
        .create_report(&draft("E1", day(1), "again"), &actor("E1"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::DateConflict { ref employee_code, report_date }
            if employee_code == "E1" && report_date == day(1)
    ));
}

#[test]
fn update_keeping_own_date_succeeds() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    let created = reports
        .create_report(&draft("E1", day(1), "draft"), &actor("E1"))
        .unwrap();

    clock.set(2_000);
    let mut update = ReportUpdate::from(&created);
    update.title = "final".to_string();
    let updated = reports.update_report(&update).unwrap();

    assert_eq!(updated.title, "final");
    assert_eq!(updated.report_date, day(1));
    assert_eq!(updated.created_at, 1_000);
    assert_eq!(updated.updated_at, 2_000);
    assert_eq!(reports.get_report(created.id).unwrap(), Some(updated));
}

#[test]
fn update_to_date_held_by_another_report_is_date_conflict() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    reports
        .create_report(&draft("E1", day(1), "monday"), &actor("E1"))
        .unwrap();
    let tuesday = reports
        .create_report(&draft("E1", day(2), "tuesday"), &actor("E1"))
        .unwrap();

    clock.set(2_000);
    let mut update = ReportUpdate::from(&tuesday);
    update.report_date = day(1);
    let result = reports.update_report(&update);

    assert_eq!(ErrorKind::of(&result), Some(ErrorKind::DateConflict));
    let stored = reports.get_report(tuesday.id).unwrap().unwrap();
    assert_eq!(stored, tuesday);
}

#[test]
fn update_to_free_date_moves_the_report() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    let created = reports
        .create_report(&draft("E1", day(1), "monday"), &actor("E1"))
        .unwrap();
    let mut update = ReportUpdate::from(&created);
    update.report_date = day(5);
    reports.update_report(&update).unwrap();

    // Old date is free again, new date is taken.
    reports
        .create_report(&draft("E1", day(1), "new monday"), &actor("E1"))
        .unwrap();
    let result = reports.create_report(&draft("E1", day(5), "clash"), &actor("E1"));
    assert_eq!(ErrorKind::of(&result), Some(ErrorKind::DateConflict));
}

#[test]
fn update_revives_a_soft_deleted_report() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    let created = reports
        .create_report(&draft("E1", day(1), "oops"), &actor("E1"))
        .unwrap();
    reports.soft_delete_report(created.id).unwrap();

    let updated = reports.update_report(&ReportUpdate::from(&created)).unwrap();
    assert!(!updated.is_deleted);
}

#[test]
fn update_of_unknown_report_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    let update = ReportUpdate {
        id: Uuid::new_v4(),
        employee_code: "E1".to_string(),
        report_date: day(1),
        title: "t".to_string(),
        content: "c".to_string(),
    };
    let result = reports.update_report(&update);
    assert!(matches!(result, Err(ServiceError::ReportNotFound(id)) if id == update.id));
    assert_eq!(ErrorKind::of(&result), None);
}

#[test]
fn soft_delete_sets_flag_and_refreshes_updated_at_only() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    let created = reports
        .create_report(&draft("E1", day(1), "x"), &actor("E1"))
        .unwrap();
    clock.set(3_000);
    let deleted = reports.soft_delete_report(created.id).unwrap();

    assert!(deleted.is_deleted);
    assert_eq!(deleted.created_at, 1_000);
    assert_eq!(deleted.updated_at, 3_000);
    assert_eq!(deleted.title, created.title);

    // Rows are never removed.
    let stored = reports.get_report(created.id).unwrap().unwrap();
    assert!(stored.is_deleted);
}

#[test]
fn soft_delete_twice_keeps_flag_and_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    let created = reports
        .create_report(&draft("E1", day(1), "x"), &actor("E1"))
        .unwrap();
    clock.set(2_000);
    reports.soft_delete_report(created.id).unwrap();
    clock.set(3_000);
    let again = reports.soft_delete_report(created.id).unwrap();

    assert!(again.is_deleted);
    assert_eq!(again.created_at, 1_000);
    assert_eq!(again.updated_at, 3_000);
    assert_eq!(reports.get_report(created.id).unwrap(), Some(again));
}

#[test]
fn soft_delete_of_unknown_report_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    let id = Uuid::new_v4();
    let err = reports.soft_delete_report(id).unwrap_err();
    assert!(matches!(err, ServiceError::ReportNotFound(missing) if missing == id));
}

/// Hides existing reports from the date lookup, as a concurrent writer
/// that commits between check and insert would.
struct RacingReportRepository<'conn>(SqliteReportRepository<'conn>);

impl ReportRepository for RacingReportRepository<'_> {
    fn insert_report(&self, report: &Report) -> RepoResult<()> {
        self.0.insert_report(report)
    }

    fn update_report(&self, report: &Report) -> RepoResult<()> {
        self.0.update_report(report)
    }

    fn get_report(&self, id: ReportId) -> RepoResult<Option<Report>> {
        self.0.get_report(id)
    }

    fn list_reports(&self) -> RepoResult<Vec<Report>> {
        self.0.list_reports()
    }

    fn list_reports_by_owner(&self, employee_code: &str) -> RepoResult<Vec<Report>> {
        self.0.list_reports_by_owner(employee_code)
    }

    fn report_ids_on_date(&self, _: &str, _: NaiveDate) -> RepoResult<Vec<ReportId>> {
        Ok(Vec::new())
    }
}

#[test]
fn storage_level_race_on_create_maps_to_date_conflict() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1"]);
    let clock = ManualClock::at(1_000);
    service(&conn, &clock)
        .create_report(&draft("E1", day(1), "winner"), &actor("E1"))
        .unwrap();

    let racing = ReportService::new(
        RacingReportRepository(SqliteReportRepository::try_new(&conn).unwrap()),
        &clock,
    );
    let result = racing.create_report(&draft("E1", day(1), "loser"), &actor("E1"));

    assert_eq!(ErrorKind::of(&result), Some(ErrorKind::DateConflict));
    assert_eq!(racing.list_reports().unwrap().len(), 1);
}

#[test]
fn no_two_active_reports_share_owner_and_date() {
    let conn = open_db_in_memory().unwrap();
    seed_employees(&conn, &["E1", "E2"]);
    let clock = ManualClock::at(1_000);
    let reports = service(&conn, &clock);

    // Mixed sequence of creates, updates and deletes; some are rejected.
    let mut created = Vec::new();
    for (owner, d) in [("E1", 1), ("E1", 2), ("E2", 1), ("E1", 1), ("E2", 2), ("E2", 1)] {
        if let Ok(report) = reports.create_report(&draft(owner, day(d), "r"), &actor(owner)) {
            created.push(report);
        }
    }
    assert_eq!(created.len(), 4);

    for report in &created {
        let mut update = ReportUpdate::from(report);
        update.report_date = day(1);
        let _ = reports.update_report(&update);
    }
    let _ = reports.soft_delete_report(created[0].id);
    for d in 1..=3 {
        let _ = reports.create_report(&draft("E1", day(d), "late"), &actor("E1"));
    }

    let active: Vec<_> = reports
        .list_reports()
        .unwrap()
        .into_iter()
        .filter(Report::is_active)
        .collect();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            assert!(
                a.employee_code != b.employee_code || a.report_date != b.report_date,
                "duplicate active report for {} on {}",
                a.employee_code,
                a.report_date
            );
        }
    }
}
