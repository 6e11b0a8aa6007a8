//! Request pacing
//!
//! The Zoom Phone API is rate limited per account. Instead of retrying, every
//! mutating call is followed by a fixed pause so a full run stays well below
//! the limit.

pub mod config;
pub mod pacer;

pub use config::PacingConfig;
pub use pacer::Pacer;
