//! In-memory implementation of the API traits for testing and development

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

use super::{AuthApi, ExportedDocument, SchedulingApi};
use crate::core::error::{ApiError, ClientError, ClientResult};
use crate::core::filter::DateRange;
use crate::core::validation::filters::email_key;
use crate::models::{
    Assignment, AuthToken, BulkCreateResponse, CreateShiftRequest, Credentials, Employee,
    EmployeeId, EmployeeUpdate, NewEmployee, PasswordResetRequest, Registration, Shift, ShiftId,
    UpdateShiftRequest,
};

#[derive(Debug, Default)]
struct State {
    employees: Vec<Employee>,
    shifts: Vec<Shift>,
    /// email key -> (full name, password)
    accounts: HashMap<String, (String, String)>,
    reset_requests: Vec<String>,
}

impl State {
    fn next_employee_id(&self) -> EmployeeId {
        self.employees.iter().map(|e| e.id).max().unwrap_or(0) + 1
    }

    fn next_shift_id(&self) -> ShiftId {
        self.shifts.iter().map(|s| s.id).max().unwrap_or(0) + 1
    }

    fn shift_mut(&mut self, operation: &str, id: ShiftId) -> ClientResult<&mut Shift> {
        self.shifts
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| rejected(operation, 404, "Shift not found"))
    }
}

/// Scheduling API held in memory
///
/// Applies the same business rules as the server and records every call so
/// tests can assert on network traffic. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    state: Arc<RwLock<State>>,
    calls: Arc<RwLock<Vec<String>>>,
    failures: Arc<RwLock<HashMap<String, (u16, String)>>>,
}

fn rejected(operation: &str, status: u16, message: impl Into<String>) -> ClientError {
    ApiError::Rejected {
        operation: operation.to_string(),
        status,
        message: message.into(),
    }
    .into()
}

fn lock_error(e: impl Display) -> ClientError {
    ClientError::Internal(format!("Failed to acquire lock: {}", e))
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed employees, keeping their ids
    pub fn with_employees(self, employees: Vec<Employee>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.employees = employees;
        }
        self
    }

    /// Seed shifts, keeping their ids and assignments
    pub fn with_shifts(self, shifts: Vec<Shift>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.shifts = shifts;
        }
        self
    }

    /// Register an account accepted by `login`
    pub fn with_account(self, email: &str, password: &str) -> Self {
        if let Ok(mut state) = self.state.write() {
            state
                .accounts
                .insert(email_key(email), (String::new(), password.to_string()));
        }
        self
    }

    /// Make the next call to `operation` fail with the given status
    pub fn fail_next(&self, operation: &str, status: u16, message: &str) {
        if let Ok(mut failures) = self.failures.write() {
            failures.insert(operation.to_string(), (status, message.to_string()));
        }
    }

    /// Names of the trait methods called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls
            .read()
            .map(|c| c.iter().filter(|name| *name == operation).count())
            .unwrap_or(0)
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.state
            .read()
            .map(|s| s.employees.clone())
            .unwrap_or_default()
    }

    pub fn shifts(&self) -> Vec<Shift> {
        self.state
            .read()
            .map(|s| s.shifts.clone())
            .unwrap_or_default()
    }

    pub fn password_reset_requests(&self) -> Vec<String> {
        self.state
            .read()
            .map(|s| s.reset_requests.clone())
            .unwrap_or_default()
    }

    fn enter(&self, operation: &str) -> ClientResult<()> {
        debug!(operation, "in-memory api call");
        self.calls.write().map_err(lock_error)?.push(operation.to_string());

        let failure = self.failures.write().map_err(lock_error)?.remove(operation);
        match failure {
            Some((status, message)) => Err(rejected(operation, status, message)),
            None => Ok(()),
        }
    }

    fn read(&self) -> ClientResult<RwLockReadGuard<'_, State>> {
        self.state.read().map_err(lock_error)
    }

    fn write(&self) -> ClientResult<RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(lock_error)
    }
}

#[async_trait]
impl SchedulingApi for InMemoryApi {
    async fn list_employees(&self) -> ClientResult<Vec<Employee>> {
        self.enter("list_employees")?;
        Ok(self.read()?.employees.clone())
    }

    async fn bulk_create_employees(
        &self,
        employees: &[NewEmployee],
    ) -> ClientResult<BulkCreateResponse> {
        self.enter("bulk_create_employees")?;
        let mut state = self.write()?;

        let mut rejected_emails = Vec::new();
        for new in employees {
            let key = email_key(&new.email);
            if state.employees.iter().any(|e| email_key(&e.email) == key) {
                rejected_emails.push(new.email.clone());
                continue;
            }

            let id = state.next_employee_id();
            let notes = new.availability_notes.trim();
            state.employees.push(Employee {
                id,
                full_name: new.full_name.clone(),
                email: new.email.clone(),
                phone: new.phone.clone(),
                role: new.role.clone(),
                max_weekly_hours: new.max_weekly_hours,
                is_active: true,
                availability_notes: (!notes.is_empty()).then(|| notes.to_string()),
            });
        }

        Ok(BulkCreateResponse { rejected_emails })
    }

    async fn update_employee(&self, id: EmployeeId, update: &EmployeeUpdate) -> ClientResult<()> {
        let operation = "update_employee";
        self.enter(operation)?;
        let mut state = self.write()?;

        let key = email_key(&update.email);
        if state
            .employees
            .iter()
            .any(|e| e.id != id && email_key(&e.email) == key)
        {
            return Err(rejected(operation, 409, "Email already in use"));
        }

        let employee = state
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| rejected(operation, 404, "Employee not found"))?;

        employee.full_name = update.full_name.clone();
        employee.email = update.email.clone();
        employee.phone = update.phone.clone();
        employee.role = update.role.clone();
        employee.max_weekly_hours = update.max_weekly_hours;
        employee.is_active = update.is_active;
        Ok(())
    }

    async fn list_shifts(&self) -> ClientResult<Vec<Shift>> {
        self.enter("list_shifts")?;
        Ok(self.read()?.shifts.clone())
    }

    async fn create_shifts(&self, request: &CreateShiftRequest) -> ClientResult<()> {
        let operation = "create_shifts";
        self.enter(operation)?;

        let dates = request.dates();
        if dates.is_empty() {
            return Err(rejected(operation, 400, "No working days in the selected period"));
        }

        let mut state = self.write()?;
        for shift_date in dates {
            let id = state.next_shift_id();
            state.shifts.push(Shift {
                id,
                shift_date,
                start_time: request.start_time.clone(),
                end_time: request.end_time.clone(),
                shift_type: request.shift_type.clone(),
                is_confirmed: false,
                is_informed: false,
                assignments: Vec::new(),
            });
        }
        Ok(())
    }

    async fn update_shift(&self, id: ShiftId, request: &UpdateShiftRequest) -> ClientResult<()> {
        let operation = "update_shift";
        self.enter(operation)?;
        let mut state = self.write()?;

        let shift = state.shift_mut(operation, id)?;
        if shift.is_confirmed {
            return Err(rejected(operation, 400, "Confirmed shifts cannot be edited"));
        }
        shift.shift_date = request.shift_date;
        shift.start_time = request.start_time.clone();
        shift.end_time = request.end_time.clone();
        shift.shift_type = request.shift_type.clone();
        Ok(())
    }

    async fn delete_shift(&self, id: ShiftId) -> ClientResult<()> {
        let operation = "delete_shift";
        self.enter(operation)?;
        let mut state = self.write()?;

        if state.shift_mut(operation, id)?.is_confirmed {
            return Err(rejected(operation, 400, "Confirmed shifts cannot be deleted"));
        }
        state.shifts.retain(|s| s.id != id);
        Ok(())
    }

    async fn confirm_shift(&self, id: ShiftId) -> ClientResult<()> {
        let operation = "confirm_shift";
        self.enter(operation)?;
        let mut state = self.write()?;

        let shift = state.shift_mut(operation, id)?;
        if shift.is_confirmed {
            return Err(rejected(operation, 400, "Shift is already confirmed"));
        }
        if shift.assignments.is_empty() {
            return Err(rejected(
                operation,
                400,
                "Cannot confirm a shift without assigned employees",
            ));
        }
        shift.is_confirmed = true;
        Ok(())
    }

    async fn assign_employees(
        &self,
        id: ShiftId,
        employee_ids: &[EmployeeId],
    ) -> ClientResult<()> {
        let operation = "assign_employees";
        self.enter(operation)?;
        let mut state = self.write()?;

        let mut picked = Vec::with_capacity(employee_ids.len());
        for employee_id in employee_ids {
            let employee = state
                .employees
                .iter()
                .find(|e| e.id == *employee_id && e.is_active)
                .ok_or_else(|| {
                    rejected(
                        operation,
                        400,
                        format!("Employee {} cannot be assigned", employee_id),
                    )
                })?;
            picked.push(Assignment::from(employee));
        }

        let shift = state.shift_mut(operation, id)?;
        if shift.is_confirmed {
            return Err(rejected(operation, 400, "Confirmed shifts cannot be changed"));
        }
        for assignment in picked {
            if !shift
                .assignments
                .iter()
                .any(|a| a.employee_id == assignment.employee_id)
            {
                shift.assignments.push(assignment);
            }
        }
        Ok(())
    }

    async fn list_assignments(&self, id: ShiftId) -> ClientResult<Vec<Assignment>> {
        let operation = "list_assignments";
        self.enter(operation)?;
        let mut state = self.write()?;
        Ok(state.shift_mut(operation, id)?.assignments.clone())
    }

    async fn export_shift(&self, id: ShiftId) -> ClientResult<ExportedDocument> {
        let operation = "export_shift";
        self.enter(operation)?;
        let mut state = self.write()?;

        let shift = state.shift_mut(operation, id)?;
        if !shift.is_confirmed {
            return Err(rejected(operation, 400, "Only confirmed shifts can be exported"));
        }
        let body = format!("%PDF-1.4\n% shift {} on {}\n", shift.id, shift.shift_date);
        Ok(ExportedDocument::for_shift(id, body.into_bytes()))
    }

    async fn export_range(&self, range: DateRange) -> ClientResult<ExportedDocument> {
        let operation = "export_range";
        self.enter(operation)?;
        if range.from > range.to {
            return Err(rejected(operation, 400, "Invalid date range"));
        }

        let state = self.read()?;
        let count = state
            .shifts
            .iter()
            .filter(|s| s.is_confirmed && range.contains(s.shift_date))
            .count();
        let body = format!("%PDF-1.4\n% {} shifts\n", count);
        Ok(ExportedDocument::for_range(range, body.into_bytes()))
    }

    async fn notify_shift(&self, id: ShiftId) -> ClientResult<()> {
        let operation = "notify_shift";
        self.enter(operation)?;
        let mut state = self.write()?;

        let shift = state.shift_mut(operation, id)?;
        if !shift.is_confirmed {
            return Err(rejected(operation, 400, "Only confirmed shifts can be notified"));
        }
        shift.is_informed = true;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for InMemoryApi {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthToken> {
        let operation = "login";
        self.enter(operation)?;
        let state = self.read()?;

        match state.accounts.get(&email_key(&credentials.email)) {
            Some((_, password)) if *password == credentials.password => Ok(AuthToken {
                token: format!("token-{}", Uuid::new_v4()),
            }),
            _ => Err(ApiError::Unauthorized {
                operation: operation.to_string(),
            }
            .into()),
        }
    }

    async fn register(&self, registration: &Registration) -> ClientResult<()> {
        let operation = "register";
        self.enter(operation)?;
        let mut state = self.write()?;

        let key = email_key(&registration.email);
        if state.accounts.contains_key(&key) {
            return Err(rejected(operation, 409, "Email already registered"));
        }
        state.accounts.insert(
            key,
            (registration.full_name.clone(), registration.password.clone()),
        );
        Ok(())
    }

    async fn request_password_reset(&self, request: &PasswordResetRequest) -> ClientResult<()> {
        self.enter("request_password_reset")?;
        self.write()?.reset_requests.push(request.email.clone());
        Ok(())
    }
}
