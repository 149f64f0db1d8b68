//! Observer implementations for exporting displayed metrics.
//!
//! - [`json`] - Serialize metrics to JSON format
//! - [`table`] - Pretty-print metrics as tables using the `tabled` crate
//!
//! Both accept any iterator of [`Observable`](crate::counters::Observable)
//! references, such as [`Dashboard::panels`](crate::dashboard::Dashboard::panels).
//!
//! # Feature Flags
//!
//! - `table` - Enables the [`table`] module
//! - `full` - Enables all observer modules

mod error;

pub use error::{ObserverError, Result};

pub mod json;

#[cfg(feature = "table")]
pub mod table;
