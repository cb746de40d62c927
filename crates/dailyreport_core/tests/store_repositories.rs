use chrono::NaiveDate;
use dailyreport_core::db::migrations::latest_version;
use dailyreport_core::db::open_db_in_memory;
use dailyreport_core::{
    Employee, EmployeeRepository, RepoError, Report, ReportRepository, Role,
    SqliteEmployeeRepository, SqliteReportRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn employee(code: &str, role: Role) -> Employee {
    Employee {
        code: code.to_string(),
        name: format!("name of {code}"),
        role,
        password_hash: format!("hash-{code}"),
        is_deleted: false,
        created_at: 1_000,
        updated_at: 1_000,
    }
}

fn report(owner: &str, date: NaiveDate) -> Report {
    Report {
        id: Uuid::new_v4(),
        employee_code: owner.to_string(),
        report_date: date,
        title: "title".to_string(),
        content: "content".to_string(),
        is_deleted: false,
        created_at: 2_000,
        updated_at: 2_000,
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[test]
fn employee_roundtrip_preserves_every_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let admin = employee("A1", Role::Admin);
    repo.insert_employee(&admin).unwrap();

    let loaded = repo.get_employee("A1").unwrap().unwrap();
    assert_eq!(loaded, admin);
    assert!(repo.get_employee("missing").unwrap().is_none());
}

#[test]
fn employee_duplicate_code_is_unique_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    repo.insert_employee(&employee("E1", Role::General)).unwrap();
    let err = repo
        .insert_employee(&employee("E1", Role::Admin))
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation(_)));
}

#[test]
fn employee_update_never_writes_created_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let mut stored = employee("E1", Role::General);
    repo.insert_employee(&stored).unwrap();

    stored.name = "renamed".to_string();
    stored.created_at = 9_999;
    stored.updated_at = 5_000;
    repo.update_employee(&stored).unwrap();

    let loaded = repo.get_employee("E1").unwrap().unwrap();
    assert_eq!(loaded.name, "renamed");
    assert_eq!(loaded.created_at, 1_000);
    assert_eq!(loaded.updated_at, 5_000);
}

#[test]
fn employee_update_of_missing_row_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let err = repo
        .update_employee(&employee("ghost", Role::General))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "employee", .. }));
}

#[test]
fn employees_list_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    for code in ["Z9", "A1", "M5"] {
        repo.insert_employee(&employee(code, Role::General)).unwrap();
    }
    let codes: Vec<_> = repo
        .list_employees()
        .unwrap()
        .into_iter()
        .map(|e| e.code)
        .collect();
    assert_eq!(codes, vec!["Z9", "A1", "M5"]);
}

#[test]
fn report_roundtrip_and_owner_listing() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
    employees.insert_employee(&employee("E1", Role::General)).unwrap();
    employees.insert_employee(&employee("E2", Role::General)).unwrap();
    let repo = SqliteReportRepository::try_new(&conn).unwrap();

    let first = report("E1", day(1));
    let other = report("E2", day(1));
    let second = report("E1", day(2));
    for r in [&first, &other, &second] {
        repo.insert_report(r).unwrap();
    }

    assert_eq!(repo.get_report(first.id).unwrap().unwrap(), first);
    assert!(repo.get_report(Uuid::new_v4()).unwrap().is_none());

    let owned: Vec<_> = repo
        .list_reports_by_owner("E1")
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(owned, vec![first.id, second.id]);

    let all: Vec<_> = repo.list_reports().unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(all, vec![first.id, other.id, second.id]);
}

#[test]
fn report_date_lookup_includes_deleted_rows() {
    let conn = open_db_in_memory().unwrap();
    SqliteEmployeeRepository::try_new(&conn)
        .unwrap()
        .insert_employee(&employee("E1", Role::General))
        .unwrap();
    let repo = SqliteReportRepository::try_new(&conn).unwrap();

    let mut deleted = report("E1", day(3));
    deleted.is_deleted = true;
    repo.insert_report(&deleted).unwrap();

    assert_eq!(repo.report_ids_on_date("E1", day(3)).unwrap(), vec![deleted.id]);
    assert!(repo.report_ids_on_date("E1", day(4)).unwrap().is_empty());
    assert!(repo.report_ids_on_date("E2", day(3)).unwrap().is_empty());
}

#[test]
fn report_same_owner_and_date_is_unique_violation() {
    let conn = open_db_in_memory().unwrap();
    SqliteEmployeeRepository::try_new(&conn)
        .unwrap()
        .insert_employee(&employee("E1", Role::General))
        .unwrap();
    let repo = SqliteReportRepository::try_new(&conn).unwrap();

    repo.insert_report(&report("E1", day(1))).unwrap();
    let err = repo.insert_report(&report("E1", day(1))).unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation(_)));
}

#[test]
fn report_for_unknown_owner_is_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReportRepository::try_new(&conn).unwrap();

    let err = repo.insert_report(&report("nobody", day(1))).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteReportRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_employees_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteEmployeeRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("employees"))
    ));
}
