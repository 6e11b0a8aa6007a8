//! Zoom Phone API module
//!
//! Authentication, the REST client, wire models, the holiday operations the
//! reconciler issues and the pacing policy applied between them.

pub mod auth;
pub mod client;
pub mod constants;
pub mod models;
pub mod operations;
pub mod resilience;

pub use auth::{ClientCredentialsAuth, StaticToken, TokenProvider};
pub use client::PhoneClient;
pub use models::{PhoneEntity, RemoteHoliday, Site};
pub use operations::{HolidayOperation, OperationCounts};
pub use resilience::{Pacer, PacingConfig};
