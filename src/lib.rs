//! # shiftdesk
//!
//! Client-side core of a shift-scheduling admin dashboard.
//!
//! ## Features
//!
//! - **Listing Controller**: search, status facet and date range filtering
//!   with 1-based pagination that resets whenever the criteria change
//! - **Selection**: insertion-ordered selection sets for the assign dialog
//! - **Bulk Entry**: per-row validation plus cross-row duplicate email checks
//!   before anything reaches the network
//! - **Typed API client**: `reqwest` implementation of the scheduling API and
//!   an in-memory stand-in with the same rules
//! - **Session**: bearer token kept in a persistent or per-process store
//! - **Views**: one controller per page or modal, guarded against duplicate
//!   submissions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shiftdesk::prelude::*;
//!
//! let config = ClientConfig::from_yaml_file("shiftdesk.yaml")?.with_env_overrides()?;
//! telemetry::init_tracing(&config);
//!
//! let session = Arc::new(Session::restore(
//!     Arc::new(FileTokenStore::new("token")),
//!     Arc::new(MemoryTokenStore::new()),
//! )?);
//! let api = Arc::new(HttpApiClient::new(config.clone(), session)?);
//!
//! let mut employees = EmployeesView::new(api, config.listing.page_size);
//! employees.refresh().await?;
//! employees.set_query("nurse");
//! for row in employees.listing().current_page() {
//!     println!("{} <{}>", row.full_name, row.email);
//! }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod telemetry;
pub mod views;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ApiError, ClientError, ClientResult, ConfigError, ValidationError},
        filter::{DateRange, Facet, FilterCriteria, filter_records},
        listing::{EmptyState, FetchTicket, ListingController},
        pagination::{PaginationMeta, paginate},
        pluralize::Pluralizer,
        record::Record,
        selection::SelectionSet,
        session::{AuthState, FileTokenStore, MemoryTokenStore, Session, TokenStore},
        validation::{BulkEntry, BulkField},
    };

    // === Models ===
    pub use crate::models::{
        Assignment, Credentials, Employee, EmployeeId, EmployeeStatus, EmployeeUpdate, Shift,
        ShiftAction, ShiftDraft, ShiftId, ShiftStatus,
    };

    // === Client ===
    pub use crate::client::{
        AuthApi, ExportedDocument, HttpApiClient, InMemoryApi, SchedulingApi,
    };

    // === Views ===
    pub use crate::views::{
        AssignDialog, AssignmentsView, AuthFlow, DashboardSummary, DashboardView, EmployeesView,
        InFlight, ShiftsView,
    };

    // === Config ===
    pub use crate::config::ClientConfig;
    pub use crate::routes::Route;
    pub use crate::telemetry;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use std::sync::Arc;
}
