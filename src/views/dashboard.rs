//! Summary cards of the dashboard landing page

use chrono::{Local, NaiveDate};
use futures::future::try_join;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::client::SchedulingApi;
use crate::core::error::ClientResult;
use crate::models::{Employee, EmployeeId, Shift};

/// How many upcoming shifts the dashboard lists
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_employees: usize,
    pub active_employees: usize,
    pub inactive_employees: usize,

    pub total_shifts: usize,
    pub confirmed_shifts: usize,
    pub draft_shifts: usize,

    /// Drafts nobody has been assigned to yet
    pub unstaffed_drafts: usize,

    /// Confirmed shifts whose staff has not been emailed
    pub pending_notification: usize,

    /// Shifts from today on, earliest first, at most [`UPCOMING_LIMIT`]
    pub upcoming: Vec<Shift>,
    pub upcoming_total: usize,

    /// Active employees with no assignment on any upcoming shift
    pub idle_employees: Vec<Employee>,
}

impl DashboardSummary {
    pub fn compute(employees: &[Employee], shifts: &[Shift], today: NaiveDate) -> Self {
        let active_employees = employees.iter().filter(|e| e.is_active).count();
        let confirmed_shifts = shifts.iter().filter(|s| s.is_confirmed).count();

        let mut upcoming: Vec<&Shift> = shifts.iter().filter(|s| s.shift_date >= today).collect();
        upcoming.sort_by(|a, b| {
            (a.shift_date, &a.start_time, a.id).cmp(&(b.shift_date, &b.start_time, b.id))
        });

        let busy: HashSet<EmployeeId> = upcoming
            .iter()
            .flat_map(|s| s.assignments.iter().map(|a| a.employee_id))
            .collect();

        Self {
            total_employees: employees.len(),
            active_employees,
            inactive_employees: employees.len() - active_employees,
            total_shifts: shifts.len(),
            confirmed_shifts,
            draft_shifts: shifts.len() - confirmed_shifts,
            unstaffed_drafts: shifts
                .iter()
                .filter(|s| s.is_draft() && !s.has_staff())
                .count(),
            pending_notification: shifts.iter().filter(|s| s.awaits_notification()).count(),
            upcoming_total: upcoming.len(),
            upcoming: upcoming
                .into_iter()
                .take(UPCOMING_LIMIT)
                .cloned()
                .collect(),
            idle_employees: employees
                .iter()
                .filter(|e| e.is_active && !busy.contains(&e.id))
                .cloned()
                .collect(),
        }
    }
}

pub struct DashboardView {
    api: Arc<dyn SchedulingApi>,
    summary: Option<DashboardSummary>,
}

impl DashboardView {
    pub fn new(api: Arc<dyn SchedulingApi>) -> Self {
        Self { api, summary: None }
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.summary.as_ref()
    }

    pub async fn load(&mut self) -> ClientResult<&DashboardSummary> {
        self.load_for(Local::now().date_naive()).await
    }

    /// Load employees and shifts together and summarise them as of `today`
    pub async fn load_for(&mut self, today: NaiveDate) -> ClientResult<&DashboardSummary> {
        let (employees, shifts) =
            try_join(self.api.list_employees(), self.api.list_shifts()).await?;
        let summary = DashboardSummary::compute(&employees, &shifts, today);
        debug!(
            employees = summary.total_employees,
            shifts = summary.total_shifts,
            upcoming = summary.upcoming_total,
            "Dashboard loaded"
        );
        Ok(self.summary.insert(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn employee(id: EmployeeId, active: bool) -> Employee {
        Employee {
            id,
            full_name: format!("E{}", id),
            email: format!("e{}@example.com", id),
            phone: String::new(),
            role: "Clerk".to_string(),
            max_weekly_hours: 40,
            is_active: active,
            availability_notes: None,
        }
    }

    fn shift(id: i64, day: u32, confirmed: bool, informed: bool, staff: &[EmployeeId]) -> Shift {
        Shift {
            id,
            shift_date: date(day),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            shift_type: "Day".to_string(),
            is_confirmed: confirmed,
            is_informed: informed,
            assignments: staff
                .iter()
                .map(|id| Assignment {
                    employee_id: *id,
                    full_name: format!("E{}", id),
                    email: String::new(),
                    role: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_compute_counts() {
        let employees = vec![employee(1, true), employee(2, true), employee(3, false)];
        let shifts = vec![
            shift(1, 1, true, true, &[2]),
            shift(2, 12, true, false, &[1]),
            shift(3, 11, false, false, &[]),
            shift(4, 10, false, false, &[3]),
        ];

        let summary = DashboardSummary::compute(&employees, &shifts, date(10));
        assert_eq!(summary.active_employees, 2);
        assert_eq!(summary.inactive_employees, 1);
        assert_eq!(summary.confirmed_shifts, 2);
        assert_eq!(summary.draft_shifts, 2);
        assert_eq!(summary.unstaffed_drafts, 1);
        assert_eq!(summary.pending_notification, 1);

        let upcoming: Vec<i64> = summary.upcoming.iter().map(|s| s.id).collect();
        assert_eq!(upcoming, vec![4, 3, 2]);

        // employee 2 only works a past shift
        let idle: Vec<EmployeeId> = summary.idle_employees.iter().map(|e| e.id).collect();
        assert_eq!(idle, vec![2]);
    }

    #[test]
    fn test_upcoming_is_capped() {
        let shifts: Vec<Shift> = (1..=8).map(|d| shift(d as i64, d, false, false, &[])).collect();
        let summary = DashboardSummary::compute(&[], &shifts, date(1));
        assert_eq!(summary.upcoming.len(), UPCOMING_LIMIT);
        assert_eq!(summary.upcoming_total, 8);
    }
}
