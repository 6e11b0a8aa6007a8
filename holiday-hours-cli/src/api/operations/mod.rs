//! Holiday sub-setting operations
//!
//! This module provides the mutating operations the reconciliation engine
//! issues against an extension's holiday hours.

pub mod operation;

pub use operation::{HolidayOperation, OperationCounts};
