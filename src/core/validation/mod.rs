//! Client-side validation
//!
//! Input is normalised by [`filters`], checked by the closures in
//! [`validators`], and bulk employee entry is validated as a whole by
//! [`bulk::BulkEntry`]. Single-record forms use `validator` derive rules on
//! the model types instead.

pub mod bulk;
pub mod filters;
pub mod validators;

pub use bulk::{BulkEntry, BulkField, BulkReport, BulkRow};
