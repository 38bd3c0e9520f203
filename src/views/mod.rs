//! Page and modal controllers
//!
//! Each view owns the state one screen needs and drives the API through the
//! [`crate::client`] traits. Rendering is left to the embedding UI.

pub mod assign;
pub mod assignments;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod in_flight;
pub mod shifts;

pub use assign::AssignDialog;
pub use assignments::AssignmentsView;
pub use auth::AuthFlow;
pub use dashboard::{DashboardSummary, DashboardView};
pub use employees::EmployeesView;
pub use in_flight::{InFlight, InFlightGuard};
pub use shifts::ShiftsView;
