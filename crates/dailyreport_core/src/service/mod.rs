//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the employee/report lifecycle.
//! - Keep presentation and identity collaborators decoupled from storage.
//!
//! # Invariants
//! - Report writes pass the date uniqueness check first.
//! - Employee deletion runs the self-protection guard before anything else.

pub mod cascade;
pub mod employee_service;
pub mod error;
pub mod guard;
pub mod report_service;
pub mod uniqueness;
pub mod visibility;
