//! Trackline - roster autofill for a workforce-training program.
//!
//! The roster is a header-indexed grid of student records. Update passes fill
//! blank cells from external address lookups, create and fill assessment
//! documents, and link scanned student files found in a document cache. Cells
//! a human already filled are never overwritten.

pub mod address;
pub mod api;
pub mod assessment;
pub mod cacher;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sheet;
pub mod student;
pub mod writers;

pub use error::{AppError, Result};
