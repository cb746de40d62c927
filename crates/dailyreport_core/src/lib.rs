//! Consistency and lifecycle engine for employee daily reports.
//! This crate is the single source of truth for business invariants:
//! one report per employee per date, soft-delete cascades, and
//! role-scoped report visibility.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod password;
pub mod repo;
pub mod service;

pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::actor::{Actor, Role};
pub use model::employee::{Employee, EmployeeCode, EmployeeDraft};
pub use model::report::{Report, ReportDraft, ReportId, ReportUpdate};
pub use model::EpochMillis;
pub use password::{
    check_password_shape, Argon2PasswordEncoder, PasswordEncodeError, PasswordEncoder,
    PasswordShapeError,
};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::report_repo::{ReportRepository, SqliteReportRepository};
pub use repo::{RepoError, RepoResult};
pub use service::cascade::{CascadeMode, CascadeOutcome};
pub use service::employee_service::EmployeeService;
pub use service::error::{ErrorKind, ServiceError, ServiceResult};
pub use service::report_service::ReportService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
