use std::sync::Arc;

use crate::client::SchedulingApi;
use crate::core::error::ClientResult;
use crate::core::pluralize::Pluralizer;
use crate::models::{Assignment, ShiftId};

pub const NO_ASSIGNMENTS_MESSAGE: &str = "No employees have been assigned to this shift yet.";

/// Read-only list of the employees placed on one shift
pub struct AssignmentsView {
    api: Arc<dyn SchedulingApi>,
    shift_id: Option<ShiftId>,
    assignments: Vec<Assignment>,
    loading: bool,
}

impl AssignmentsView {
    pub fn new(api: Arc<dyn SchedulingApi>) -> Self {
        Self {
            api,
            shift_id: None,
            assignments: Vec::new(),
            loading: false,
        }
    }

    pub async fn open(&mut self, shift_id: ShiftId) -> ClientResult<()> {
        self.shift_id = Some(shift_id);
        self.assignments.clear();
        self.loading = true;
        let loaded = self.api.list_assignments(shift_id).await;
        self.loading = false;
        self.assignments = loaded?;
        Ok(())
    }

    pub fn close(&mut self) {
        self.shift_id = None;
        self.assignments.clear();
    }

    pub fn shift_id(&self) -> Option<ShiftId> {
        self.shift_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// "2 employees assigned"
    pub fn summary(&self) -> String {
        format!(
            "{} assigned",
            Pluralizer::count_label(self.assignments.len(), "employee")
        )
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        (!self.loading && self.assignments.is_empty()).then_some(NO_ASSIGNMENTS_MESSAGE)
    }
}
