//! Row-level business rules over the roster grid.
//!
//! Each writer is one predicate-gated pass: it reads whole rows, fills only
//! the cells its rule owns, and leaves everything a human entered alone.

pub mod address;
pub mod assessment;
pub mod files;

pub use address::{AddressFields, update_address_fields};
pub use assessment::{AssessmentStore, FolderStore, update_assessments};
pub use files::update_sheet_file_data;
