//! Canonical domain records for the investor operations core.
//!
//! # Responsibility
//! - Define the record shapes shared by repositories and services.
//! - Keep status/type vocabularies closed (one enum per field).
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - Enum ↔ database string mappings are total in both directions for
//!   every value this crate writes.

pub mod distribution;
pub mod investment;
pub mod investor;
pub mod notification;
pub mod project;
pub mod template;
