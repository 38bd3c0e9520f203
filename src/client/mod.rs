//! Access to the external scheduling API
//!
//! Views only talk to the API through [`SchedulingApi`] and [`AuthApi`].
//! [`HttpApiClient`] is the real implementation; [`InMemoryApi`] mirrors the
//! server rules in memory for tests and offline demos.

pub mod http;
pub mod in_memory;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::core::error::ClientResult;
use crate::core::filter::DateRange;
use crate::models::{
    Assignment, AuthToken, BulkCreateResponse, CreateShiftRequest, Credentials, Employee,
    EmployeeId, EmployeeUpdate, NewEmployee, PasswordResetRequest, Registration, Shift, ShiftId,
    UpdateShiftRequest,
};

pub use http::HttpApiClient;
pub use in_memory::InMemoryApi;

/// Scheduling operations offered by the API
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    /// `GET /employees`
    async fn list_employees(&self) -> ClientResult<Vec<Employee>>;

    /// `POST /employees/bulk`
    ///
    /// Emails the server already knows come back in `rejected_emails`; the
    /// remaining rows are created.
    async fn bulk_create_employees(
        &self,
        employees: &[NewEmployee],
    ) -> ClientResult<BulkCreateResponse>;

    /// `PUT /employees/{id}`
    async fn update_employee(&self, id: EmployeeId, update: &EmployeeUpdate) -> ClientResult<()>;

    /// `GET /shifts`
    async fn list_shifts(&self) -> ClientResult<Vec<Shift>>;

    /// `POST /shifts`, one shift per generated day
    async fn create_shifts(&self, request: &CreateShiftRequest) -> ClientResult<()>;

    /// `PUT /shifts/{id}`
    async fn update_shift(&self, id: ShiftId, request: &UpdateShiftRequest) -> ClientResult<()>;

    /// `DELETE /shifts/{id}`
    async fn delete_shift(&self, id: ShiftId) -> ClientResult<()>;

    /// `PATCH /shifts/{id}/confirm`
    async fn confirm_shift(&self, id: ShiftId) -> ClientResult<()>;

    /// `POST /shifts/{id}/assign`
    async fn assign_employees(&self, id: ShiftId, employee_ids: &[EmployeeId])
    -> ClientResult<()>;

    /// `GET /shifts/{id}/assignments`
    async fn list_assignments(&self, id: ShiftId) -> ClientResult<Vec<Assignment>>;

    /// `GET /shifts/export/{id}`
    async fn export_shift(&self, id: ShiftId) -> ClientResult<ExportedDocument>;

    /// `GET /shifts/export?from=&to=`
    async fn export_range(&self, range: DateRange) -> ClientResult<ExportedDocument>;

    /// `POST /shifts/{id}/notify`
    async fn notify_shift(&self, id: ShiftId) -> ClientResult<()>;
}

/// Account operations under `/auth`
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthToken>;

    async fn register(&self, registration: &Registration) -> ClientResult<()>;

    async fn request_password_reset(&self, request: &PasswordResetRequest) -> ClientResult<()>;
}

/// A generated PDF handed back by one of the export endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    pub fn for_shift(id: ShiftId, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("Shift_{}.pdf", id),
            bytes,
        }
    }

    pub fn for_range(range: DateRange, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("Shifts_{}_to_{}.pdf", range.from, range.to),
            bytes,
        }
    }

    /// Write the document into `dir` under its download name
    pub fn save_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_export_file_names() {
        assert_eq!(ExportedDocument::for_shift(12, vec![]).file_name, "Shift_12.pdf");

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        assert_eq!(
            ExportedDocument::for_range(range, vec![]).file_name,
            "Shifts_2024-03-01_to_2024-03-31.pdf"
        );
    }

    #[test]
    fn test_save_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let doc = ExportedDocument::for_shift(5, b"%PDF-1.4".to_vec());
        let path = doc.save_to(dir.path()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.4");
    }
}
