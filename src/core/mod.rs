//! Core module containing the listing primitives shared by every view

pub mod error;
pub mod filter;
pub mod listing;
pub mod pagination;
pub mod pluralize;
pub mod record;
pub mod selection;
pub mod session;
pub mod validation;

pub use error::{
    ApiError, ClientError, ClientResult, ConfigError, FieldValidationError, TransportError,
    ValidationError,
};
pub use filter::{DateRange, Facet, FilterCriteria, filter_records};
pub use listing::{EmptyState, FetchTicket, ListingController};
pub use pagination::{DEFAULT_PAGE_SIZE, PaginationMeta, paginate};
pub use pluralize::Pluralizer;
pub use record::Record;
pub use selection::SelectionSet;
pub use session::{AuthState, FileTokenStore, MemoryTokenStore, Session, SessionError, TokenStore};
