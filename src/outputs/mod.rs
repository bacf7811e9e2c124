//! Output writers.
//!
//! - [`json`]: writes the [`OutputDocument`](crate::models::OutputDocument) consumed by the dashboard

pub mod json;
