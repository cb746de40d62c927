//! Domain model for employees and their daily reports.
//!
//! # Responsibility
//! - Define the canonical records shared by repositories and services.
//! - Keep soft-delete and audit-timestamp state on the records themselves.
//!
//! # Invariants
//! - Deletion is represented by the `is_deleted` tombstone, never by row removal.
//! - `created_at` is written once and carried forward on every update.

pub mod actor;
pub mod employee;
pub mod report;

/// Unix epoch milliseconds, the unit of every audit timestamp.
pub type EpochMillis = i64;
