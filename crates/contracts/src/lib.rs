//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures.
//! All business crates can only depend on this crate, reverse dependencies
//! are prohibited.
//!
//! ## Time Model
//! - Delivery windows are hour-of-day only, on a 0-23 scale
//! - 12-hour tokens (`"1PM"`, `"12AM"`) appear at the edges: CLI flags and
//!   the `delivery` field of incoming records

mod record;
mod report;

pub use record::*;
pub use report::*;
