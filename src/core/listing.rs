//! Listing controller: filtered, paginated view over a fetched record list
//!
//! One controller backs each table (employees, shifts). It owns the fetched
//! records, the filter criteria and the current page, and enforces two rules:
//!
//! - any change to the criteria moves the table back to page 1
//! - a fetch response only lands if no newer fetch was started after it

use chrono::NaiveDate;
use tracing::debug;

use crate::core::filter::{DateRange, Facet, FilterCriteria, filter_records};
use crate::core::pagination::{DEFAULT_PAGE_SIZE, PaginationMeta, paginate};
use crate::core::pluralize::Pluralizer;
use crate::core::record::Record;

/// Handle for one in-flight list fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "pass the ticket back to complete_fetch or fail_fetch"]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Why a table shows no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing has been created yet
    NoRecords,
    /// Records exist but the criteria exclude all of them
    NoMatches,
}

impl EmptyState {
    /// Hint shown under "No employees found"
    pub fn hint(&self, singular: &str) -> String {
        match self {
            EmptyState::NoRecords => format!("Get started by adding your first {}", singular),
            EmptyState::NoMatches => "Try adjusting your search or filters".to_string(),
        }
    }
}

/// Filter, search and paginate state for one table
#[derive(Debug, Clone)]
pub struct ListingController<R: Record> {
    records: Vec<R>,
    criteria: FilterCriteria<R::Status>,
    page: usize,
    page_size: usize,
    generation: u64,
    loading: bool,
    stale: bool,
}

impl<R: Record> Default for ListingController<R> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<R: Record> ListingController<R> {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            page: 1,
            page_size: page_size.max(1),
            generation: 0,
            loading: false,
            stale: false,
        }
    }

    pub fn with_records(mut self, records: Vec<R>) -> Self {
        self.records = records;
        self
    }

    // === Fetch lifecycle ===

    /// Mark a fetch as started and return its ticket.
    ///
    /// Starting a new fetch supersedes every ticket issued before it.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch result.
    ///
    /// Returns `false` and leaves the list untouched when the ticket has been
    /// superseded by a later `begin_fetch`.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, records: Vec<R>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                resource = R::resource_name(),
                stale = ticket.generation,
                current = self.generation,
                "Discarding superseded list response"
            );
            return false;
        }
        self.records = records;
        self.loading = false;
        self.stale = false;
        self.clamp_page();
        true
    }

    /// Record that a fetch failed; the previous records stay visible
    /// but are marked stale until the next successful fetch
    pub fn fail_fetch(&mut self, ticket: FetchTicket) {
        if ticket.generation == self.generation {
            self.loading = false;
            self.stale = true;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the last fetch failed and the rows may lag behind the server
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    // === Criteria ===

    pub fn criteria(&self) -> &FilterCriteria<R::Status> {
        &self.criteria
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.criteria.query != query {
            self.criteria.query = query;
            self.page = 1;
        }
    }

    pub fn set_facet(&mut self, facet: Facet<R::Status>) {
        if self.criteria.facet != facet {
            self.criteria.facet = facet;
            self.page = 1;
        }
    }

    /// Set the date bounds; the range applies only once both are present
    pub fn set_date_bounds(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.set_date_range(DateRange::from_bounds(from, to));
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        if self.criteria.date_range != range {
            self.criteria.date_range = range;
            self.page = 1;
        }
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria<R::Status>) {
        if self.criteria != criteria {
            self.criteria = criteria;
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    // === Paging ===

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Jump to a page, clamped to the pages that exist
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let total_pages = self.meta_for(self.match_count()).total_pages;
        self.page = self.page.clamp(1, total_pages.max(1));
    }

    // === Derived views ===

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn find(&self, id: R::Id) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Replace a record in place, keeping its position
    ///
    /// Returns `false` if no record with that id is loaded.
    pub fn replace_record(&mut self, record: R) -> bool {
        let id = record.id();
        match self.records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => {
                *slot = record;
                self.clamp_page();
                true
            }
            None => false,
        }
    }

    pub fn filtered(&self) -> Vec<&R> {
        filter_records(&self.records, &self.criteria)
    }

    pub fn match_count(&self) -> usize {
        self.filtered().len()
    }

    /// Rows on the current page
    pub fn current_page(&self) -> Vec<&R> {
        let filtered = self.filtered();
        paginate(&filtered, self.page, self.page_size).to_vec()
    }

    pub fn meta(&self) -> PaginationMeta {
        self.meta_for(self.match_count())
    }

    fn meta_for(&self, total: usize) -> PaginationMeta {
        PaginationMeta::new(self.page, self.page_size, total)
    }

    /// `None` when the current page has rows
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.current_page().is_empty() {
            None
        } else if self.records.is_empty() || self.criteria.is_unfiltered() {
            Some(EmptyState::NoRecords)
        } else {
            Some(EmptyState::NoMatches)
        }
    }

    /// "3 employees"
    pub fn count_label(&self) -> String {
        Pluralizer::count_label(self.match_count(), R::resource_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Open {
        Yes,
        No,
    }

    #[derive(Debug, Clone)]
    struct Row {
        id: u32,
        name: String,
        open: Open,
    }

    impl Record for Row {
        type Id = u32;
        type Status = Open;

        fn resource_name() -> &'static str {
            "row"
        }

        fn id(&self) -> u32 {
            self.id
        }

        fn search_fields(&self) -> Vec<Cow<'_, str>> {
            vec![Cow::Borrowed(&self.name)]
        }

        fn status(&self) -> Open {
            self.open
        }
    }

    fn rows(n: u32) -> Vec<Row> {
        (1..=n)
            .map(|id| Row {
                id,
                name: if id % 2 == 0 { format!("even-{}", id) } else { format!("odd-{}", id) },
                open: if id % 3 == 0 { Open::No } else { Open::Yes },
            })
            .collect()
    }

    fn controller(n: u32) -> ListingController<Row> {
        ListingController::new(8).with_records(rows(n))
    }

    #[test]
    fn test_current_page_slices_filtered_list() {
        let mut listing = controller(20);
        assert_eq!(listing.current_page().len(), 8);
        listing.go_to_page(3);
        let ids: Vec<u32> = listing.current_page().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![17, 18, 19, 20]);
        assert_eq!(listing.meta().total_pages, 3);
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut listing = controller(20);
        listing.go_to_page(3);
        listing.set_query("even");
        assert_eq!(listing.page(), 1);
        assert_eq!(listing.match_count(), 10);
        assert!(!listing.current_page().is_empty());
    }

    #[test]
    fn test_facet_change_resets_page() {
        let mut listing = controller(20);
        listing.go_to_page(2);
        listing.set_facet(Facet::Only(Open::No));
        assert_eq!(listing.page(), 1);
        assert_eq!(listing.match_count(), 6);
    }

    #[test]
    fn test_setting_same_criteria_keeps_page() {
        let mut listing = controller(20);
        listing.go_to_page(2);
        listing.set_query("");
        listing.set_facet(Facet::All);
        assert_eq!(listing.page(), 2);
    }

    #[test]
    fn test_go_to_page_is_clamped() {
        let mut listing = controller(10);
        listing.go_to_page(9);
        assert_eq!(listing.page(), 2);
        listing.go_to_page(0);
        assert_eq!(listing.page(), 1);
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut listing: ListingController<Row> = ListingController::new(8);
        let first = listing.begin_fetch();
        let second = listing.begin_fetch();

        assert!(listing.complete_fetch(second, rows(3)));
        assert!(!listing.complete_fetch(first, rows(12)));
        assert_eq!(listing.records().len(), 3);
        assert!(!listing.is_loading());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_records() {
        let mut listing = controller(5);
        let ticket = listing.begin_fetch();
        assert!(listing.is_loading());
        listing.fail_fetch(ticket);
        assert!(!listing.is_loading());
        assert_eq!(listing.records().len(), 5);
    }

    #[test]
    fn test_refetch_clamps_page_when_list_shrinks() {
        let mut listing = controller(20);
        listing.go_to_page(3);
        let ticket = listing.begin_fetch();
        listing.complete_fetch(ticket, rows(9));
        assert_eq!(listing.page(), 2);
        assert_eq!(listing.current_page().len(), 1);
    }

    #[test]
    fn test_empty_states() {
        let listing: ListingController<Row> = ListingController::new(8);
        assert_eq!(listing.empty_state(), Some(EmptyState::NoRecords));

        let mut listing = controller(4);
        assert_eq!(listing.empty_state(), None);
        listing.set_query("nothing-matches");
        assert_eq!(listing.empty_state(), Some(EmptyState::NoMatches));
        assert_eq!(
            EmptyState::NoMatches.hint("row"),
            "Try adjusting your search or filters"
        );
    }

    #[test]
    fn test_replace_record_keeps_position() {
        let mut listing = controller(3);
        let mut updated = listing.find(2).cloned().expect("row 2 loaded");
        updated.open = Open::No;
        assert!(listing.replace_record(updated));
        assert_eq!(listing.records()[1].open, Open::No);
        assert!(!listing.replace_record(Row {
            id: 99,
            name: "ghost".to_string(),
            open: Open::Yes
        }));
    }

    #[test]
    fn test_replace_record_clamps_page_when_matches_shrink() {
        let mut listing = controller(13);
        listing.set_facet(Facet::Only(Open::Yes));
        listing.go_to_page(2);
        assert_eq!(listing.page(), 2);
        assert_eq!(listing.current_page().len(), 1);

        let mut closed = listing.find(13).cloned().expect("row 13 loaded");
        closed.open = Open::No;
        assert!(listing.replace_record(closed));

        assert_eq!(listing.page(), 1);
        assert_eq!(listing.meta().total_pages, 1);
        assert_eq!(listing.current_page().len(), 8);
        assert_eq!(listing.empty_state(), None);
    }

    #[test]
    fn test_failed_fetch_marks_rows_stale() {
        let mut listing = controller(3);
        assert!(!listing.is_stale());

        let ticket = listing.begin_fetch();
        listing.fail_fetch(ticket);
        assert!(listing.is_stale());
        assert_eq!(listing.records().len(), 3);

        let ticket = listing.begin_fetch();
        assert!(listing.complete_fetch(ticket, rows(4)));
        assert!(!listing.is_stale());
    }

    #[test]
    fn test_count_label() {
        let mut listing = controller(3);
        assert_eq!(listing.count_label(), "3 rows");
        listing.set_query("even");
        assert_eq!(listing.count_label(), "1 row");
    }
}
