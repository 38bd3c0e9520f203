//! Modal for staffing a draft shift

use futures::future::try_join;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use super::in_flight::InFlight;
use crate::client::SchedulingApi;
use crate::core::error::{ClientResult, ValidationError};
use crate::core::pluralize::Pluralizer;
use crate::core::selection::SelectionSet;
use crate::models::{Employee, EmployeeId, ShiftId};

pub const NO_AVAILABLE_TITLE: &str = "No Available Employees";
pub const NO_AVAILABLE_MESSAGE: &str =
    "All active employees are already assigned to this shift or there are no active employees.";

/// Selection state of the assign modal
///
/// Only employees in the eligible pool (active and not yet on the shift) can
/// be selected.
pub struct AssignDialog {
    api: Arc<dyn SchedulingApi>,
    shift_id: Option<ShiftId>,
    employees: Vec<Employee>,
    assigned: HashSet<EmployeeId>,
    selection: SelectionSet<EmployeeId>,
    loading: bool,
    in_flight: InFlight,
}

impl AssignDialog {
    pub fn new(api: Arc<dyn SchedulingApi>) -> Self {
        Self {
            api,
            shift_id: None,
            employees: Vec::new(),
            assigned: HashSet::new(),
            selection: SelectionSet::new(),
            loading: false,
            in_flight: InFlight::new(),
        }
    }

    pub fn with_in_flight(mut self, in_flight: InFlight) -> Self {
        self.in_flight = in_flight;
        self
    }

    /// Open for `shift_id`, loading employees and current assignments together
    pub async fn open(&mut self, shift_id: ShiftId) -> ClientResult<()> {
        self.reset();
        self.shift_id = Some(shift_id);
        self.loading = true;

        let loaded = try_join(
            self.api.list_employees(),
            self.api.list_assignments(shift_id),
        )
        .await;
        self.loading = false;

        let (employees, assignments) = match loaded {
            Ok(pair) => pair,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };
        self.assigned = assignments.iter().map(|a| a.employee_id).collect();
        self.employees = employees;
        debug!(
            shift_id,
            employees = self.employees.len(),
            assigned = self.assigned.len(),
            "Assign dialog loaded"
        );
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.shift_id.is_some()
    }

    pub fn shift_id(&self) -> Option<ShiftId> {
        self.shift_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_eligible(&self, employee: &Employee) -> bool {
        employee.is_active && !self.assigned.contains(&employee.id)
    }

    /// Employees that can still be placed on the shift
    pub fn pool(&self) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|e| self.is_eligible(e))
            .collect()
    }

    /// "3 available"
    pub fn available_label(&self) -> String {
        format!("{} available", self.pool().len())
    }

    /// Title and message shown instead of the list when the pool is empty
    pub fn zero_state(&self) -> Option<(&'static str, &'static str)> {
        (self.is_open() && !self.loading && self.pool().is_empty())
            .then_some((NO_AVAILABLE_TITLE, NO_AVAILABLE_MESSAGE))
    }

    /// Toggle an employee; ids outside the pool are ignored
    ///
    /// Returns whether the employee is selected afterwards.
    pub fn toggle(&mut self, id: EmployeeId) -> bool {
        let eligible = self
            .employees
            .iter()
            .any(|e| e.id == id && self.is_eligible(e));
        if !eligible {
            return false;
        }
        self.selection.toggle(id)
    }

    pub fn selection(&self) -> &SelectionSet<EmployeeId> {
        &self.selection
    }

    /// "2 employees selected"
    pub fn selection_summary(&self) -> String {
        self.selection.summary("employee")
    }

    pub fn can_assign(&self) -> bool {
        self.is_open()
            && !self.loading
            && !self.in_flight.is_active()
            && !self.selection.is_empty()
            && !self.pool().is_empty()
    }

    /// Assign the selected employees and close the dialog
    ///
    /// Returns how many employees were sent.
    pub async fn submit(&mut self) -> ClientResult<usize> {
        let shift_id = self.shift_id.ok_or_else(|| ValidationError::ActionUnavailable {
            action: "assign".to_string(),
            reason: "no shift is selected".to_string(),
        })?;
        if self.selection.is_empty() {
            return Err(ValidationError::ActionUnavailable {
                action: "assign".to_string(),
                reason: "select at least one employee".to_string(),
            }
            .into());
        }

        let _guard = self.in_flight.begin("assign employees")?;
        let ids = self.selection.to_vec();
        self.api.assign_employees(shift_id, &ids).await?;

        info!(
            shift_id,
            count = ids.len(),
            "{} assigned",
            Pluralizer::count_label(ids.len(), "employee")
        );
        self.close();
        Ok(ids.len())
    }

    /// Close or cancel; drops the selection
    pub fn close(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.shift_id = None;
        self.employees.clear();
        self.assigned.clear();
        self.selection.clear();
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryApi;
    use crate::models::Shift;
    use chrono::NaiveDate;

    fn employee(id: EmployeeId, active: bool) -> Employee {
        Employee {
            id,
            full_name: format!("Employee {}", id),
            email: format!("e{}@example.com", id),
            phone: "555".to_string(),
            role: "Clerk".to_string(),
            max_weekly_hours: 40,
            is_active: active,
            availability_notes: None,
        }
    }

    fn shift(id: ShiftId) -> Shift {
        Shift {
            id,
            shift_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            shift_type: "Morning".to_string(),
            is_confirmed: false,
            is_informed: false,
            assignments: vec![],
        }
    }

    #[tokio::test]
    async fn test_pool_excludes_inactive_and_assigned() {
        let api = Arc::new(
            InMemoryApi::new()
                .with_employees(vec![employee(1, true), employee(2, false), employee(3, true)])
                .with_shifts(vec![shift(5)]),
        );
        api.assign_employees(5, &[1]).await.unwrap();

        let mut dialog = AssignDialog::new(api.clone());
        dialog.open(5).await.unwrap();

        let pool: Vec<EmployeeId> = dialog.pool().iter().map(|e| e.id).collect();
        assert_eq!(pool, vec![3]);
        assert!(!dialog.toggle(2));
        assert!(!dialog.toggle(1));
        assert!(!dialog.can_assign());

        assert!(dialog.toggle(3));
        assert_eq!(dialog.selection_summary(), "1 employee selected");
        assert!(dialog.can_assign());
    }

    #[tokio::test]
    async fn test_failed_load_closes_without_zero_state() {
        let api = Arc::new(
            InMemoryApi::new()
                .with_employees(vec![employee(1, true)])
                .with_shifts(vec![shift(5)]),
        );
        api.fail_next("list_assignments", 500, "boom");

        let mut dialog = AssignDialog::new(api.clone());
        assert!(dialog.open(5).await.is_err());
        assert!(!dialog.is_open());
        assert!(!dialog.is_loading());
        assert_eq!(dialog.zero_state(), None);
        assert!(!dialog.can_assign());
    }

    #[tokio::test]
    async fn test_submit_clears_selection_and_closes() {
        let api = Arc::new(
            InMemoryApi::new()
                .with_employees(vec![employee(1, true), employee(2, true)])
                .with_shifts(vec![shift(5)]),
        );
        let mut dialog = AssignDialog::new(api.clone());
        dialog.open(5).await.unwrap();
        dialog.toggle(2);
        dialog.toggle(1);

        assert_eq!(dialog.submit().await.unwrap(), 2);
        assert!(!dialog.is_open());
        assert!(dialog.selection().is_empty());

        let assigned: Vec<EmployeeId> = api.shifts()[0]
            .assignments
            .iter()
            .map(|a| a.employee_id)
            .collect();
        assert_eq!(assigned, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_selection() {
        let api = Arc::new(
            InMemoryApi::new()
                .with_employees(vec![employee(1, true)])
                .with_shifts(vec![shift(5)]),
        );
        let mut dialog = AssignDialog::new(api.clone());
        dialog.open(5).await.unwrap();
        dialog.toggle(1);

        api.fail_next("assign_employees", 500, "Failed to assign employees");
        assert!(dialog.submit().await.is_err());
        assert!(dialog.is_open());
        assert_eq!(dialog.selection().count(), 1);
    }

    #[tokio::test]
    async fn test_cancel_drops_selection() {
        let api = Arc::new(
            InMemoryApi::new()
                .with_employees(vec![employee(1, true)])
                .with_shifts(vec![shift(5)]),
        );
        let mut dialog = AssignDialog::new(api);
        dialog.open(5).await.unwrap();
        dialog.toggle(1);
        dialog.close();
        assert!(dialog.selection().is_empty());
        assert!(dialog.zero_state().is_none());
    }
}
