//! Wire types exchanged with the scheduling API

pub mod assignment;
pub mod auth;
pub mod employee;
pub mod shift;

pub use assignment::{AssignRequest, Assignment};
pub use auth::{AuthToken, Credentials, PasswordResetRequest, Registration};
pub use employee::{
    BulkCreateResponse, BulkOutcome, Employee, EmployeeId, EmployeeStatus, EmployeeUpdate,
    NewEmployee,
};
pub use shift::{
    CreateShiftRequest, Shift, ShiftAction, ShiftDraft, ShiftId, ShiftStatus, UpdateShiftRequest,
};
