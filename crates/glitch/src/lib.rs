#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Enriched error values
//!
//! This crate wraps lower-level failures (database driver errors, HTTP
//! problem descriptions, anything implementing `std::error::Error`) into a
//! [`DataError`] carrying a machine-readable code, a call-site message, a
//! transience flag, structured fields and an optional chain of earlier
//! enriched errors.

pub mod data;
pub mod problem;
pub mod report;

pub use data::{BoxError, Causes, DataError};
pub use problem::HttpProblem;
pub use report::Report;

/// Code used when no real code could be derived from the source error.
pub const UNKNOWN_CODE: &str = "UNKNOWN";
