//! Record trait shared by every listed entity

use chrono::NaiveDate;
use std::borrow::Cow;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Base trait for anything shown in a filterable, paginated table.
///
/// A record exposes:
/// - id: unique and immutable for the record's lifetime
/// - search fields: the text a free-text query is matched against
/// - status: the value used for facet filtering
/// - date: an optional calendar day used for date-range filtering
pub trait Record: Clone + Send + Sync + 'static {
    /// Identifier type, as sent by the API
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Discrete status used for the facet filter
    type Status: Copy + Eq + Debug + Send + Sync + 'static;

    /// Singular resource name (e.g., "employee", "shift")
    fn resource_name() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Self::Id;

    /// Text fields matched by the free-text query
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Current status of the record
    fn status(&self) -> Self::Status;

    /// Calendar day the record is scheduled on, if any
    fn date(&self) -> Option<NaiveDate> {
        None
    }
}
