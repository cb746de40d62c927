//! Employee repository contract and SQLite implementation.
//!
//! # Invariants
//! - `get_employee` returns deleted rows too; callers decide visibility.
//! - Listing order is insertion order.

use super::{bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult};
use crate::model::actor::Role;
use crate::model::employee::Employee;
use rusqlite::{params, Connection, OptionalExtension, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    code,
    name,
    role,
    password_hash,
    is_deleted,
    created_at,
    updated_at
FROM employees";

/// Repository interface for employee accounts.
pub trait EmployeeRepository {
    /// Inserts a new row. A taken `code` fails with `UniqueViolation`.
    fn insert_employee(&self, employee: &Employee) -> RepoResult<()>;
    /// Overwrites every mutable column of an existing row.
    fn update_employee(&self, employee: &Employee) -> RepoResult<()>;
    fn get_employee(&self, code: &str) -> RepoResult<Option<Employee>>;
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "employees")?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert_employee(&self, employee: &Employee) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO employees (
                code,
                name,
                role,
                password_hash,
                is_deleted,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                employee.code.as_str(),
                employee.name.as_str(),
                employee.role.as_str(),
                employee.password_hash.as_str(),
                bool_to_int(employee.is_deleted),
                employee.created_at,
                employee.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE employees
             SET
                name = ?1,
                role = ?2,
                password_hash = ?3,
                is_deleted = ?4,
                updated_at = ?5
             WHERE code = ?6;",
            params![
                employee.name.as_str(),
                employee.role.as_str(),
                employee.password_hash.as_str(),
                bool_to_int(employee.is_deleted),
                employee.updated_at,
                employee.code.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "employee",
                key: employee.code.clone(),
            });
        }
        Ok(())
    }

    fn get_employee(&self, code: &str) -> RepoResult<Option<Employee>> {
        self.conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE code = ?1;"),
                [code],
                read_raw_employee,
            )
            .optional()?
            .map(RawEmployee::into_employee)
            .transpose()
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(read_raw_employee(row)?.into_employee()?);
        }
        Ok(employees)
    }
}

struct RawEmployee {
    code: String,
    name: String,
    role: String,
    password_hash: String,
    is_deleted: i64,
    created_at: i64,
    updated_at: i64,
}

fn read_raw_employee(row: &Row<'_>) -> rusqlite::Result<RawEmployee> {
    Ok(RawEmployee {
        code: row.get("code")?,
        name: row.get("name")?,
        role: row.get("role")?,
        password_hash: row.get("password_hash")?,
        is_deleted: row.get("is_deleted")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl RawEmployee {
    fn into_employee(self) -> RepoResult<Employee> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid role `{}` in employees.role", self.role))
        })?;
        Ok(Employee {
            code: self.code,
            name: self.name,
            role,
            password_hash: self.password_hash,
            is_deleted: int_to_bool(self.is_deleted, "employees.is_deleted")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
