//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `dailyreport_core` linkage.
//! - Bootstrap a throwaway in-memory store to prove migrations apply.

use dailyreport_core::db::migrations::schema_version;
use dailyreport_core::CoreConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("dailyreport_core ping={}", dailyreport_core::ping());
    println!("dailyreport_core version={}", dailyreport_core::core_version());

    let version = CoreConfig::default()
        .open_store()
        .map_err(|err| err.to_string())
        .and_then(|conn| schema_version(&conn).map_err(|err| err.to_string()));
    match version {
        Ok(version) => {
            println!("dailyreport_core schema_version={version}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("dailyreport_core store_open_failed error={err}");
            ExitCode::FAILURE
        }
    }
}
