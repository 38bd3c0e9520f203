//! Filter predicate evaluation for record lists
//!
//! A [`FilterCriteria`] combines a free-text query, a status facet and an
//! optional date range. [`filter_records`] keeps the records that satisfy all
//! three, in their original order.
//!
//! The query is trimmed before matching: a whitespace-only query behaves like
//! an empty one. Matching is a case-insensitive substring test against each of
//! the record's search fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::record::Record;

/// Status facet: either every status or one specific value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facet<S> {
    #[default]
    All,
    Only(S),
}

impl<S: PartialEq> Facet<S> {
    /// Check whether a status passes this facet
    pub fn admits(&self, status: &S) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(wanted) => wanted == status,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }
}

impl<S: FromStr> FromStr for Facet<S> {
    type Err = S::Err;

    /// Parse the value of a status `<select>`: `all` or a status name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Facet::All)
        } else {
            s.parse().map(Facet::Only)
        }
    }
}

impl<S: fmt::Display> fmt::Display for Facet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => write!(f, "all"),
            Facet::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Inclusive calendar range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Build a range only when both ends are known
    pub fn from_bounds(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<Self> {
        match (from, to) {
            (Some(from), Some(to)) => Some(Self { from, to }),
            _ => None,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Criteria applied to a record list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria<S> {
    pub query: String,
    pub facet: Facet<S>,
    pub date_range: Option<DateRange>,
}

impl<S> Default for FilterCriteria<S> {
    fn default() -> Self {
        Self {
            query: String::new(),
            facet: Facet::All,
            date_range: None,
        }
    }
}

impl<S: Copy + PartialEq> FilterCriteria<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_facet(mut self, facet: Facet<S>) -> Self {
        self.facet = facet;
        self
    }

    pub fn with_date_range(mut self, range: Option<DateRange>) -> Self {
        self.date_range = range;
        self
    }

    /// Lowercased, trimmed query, or `None` when it matches everything
    pub fn needle(&self) -> Option<String> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// True when no criterion narrows the list
    pub fn is_unfiltered(&self) -> bool {
        self.needle().is_none() && self.facet.is_all() && self.date_range.is_none()
    }

    /// Evaluate the predicate for one record
    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: Record<Status = S>,
    {
        self.matches_with_needle(record, self.needle().as_deref())
    }

    fn matches_with_needle<R>(&self, record: &R, needle: Option<&str>) -> bool
    where
        R: Record<Status = S>,
    {
        let text_ok = match needle {
            None => true,
            Some(needle) => record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle)),
        };

        let date_ok = match (self.date_range, record.date()) {
            (Some(range), Some(date)) => range.contains(date),
            _ => true,
        };

        text_ok && self.facet.admits(&record.status()) && date_ok
    }
}

/// Return the records matching `criteria`, preserving input order
pub fn filter_records<'a, R>(records: &'a [R], criteria: &FilterCriteria<R::Status>) -> Vec<&'a R>
where
    R: Record,
{
    let needle = criteria.needle();
    records
        .iter()
        .filter(|record| criteria.matches_with_needle(*record, needle.as_deref()))
        .collect()
}
