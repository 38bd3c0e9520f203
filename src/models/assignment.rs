use serde::{Deserialize, Serialize};

use crate::models::employee::{Employee, EmployeeId};

/// An employee placed on a shift
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub employee_id: EmployeeId,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl From<&Employee> for Assignment {
    fn from(employee: &Employee) -> Self {
        Self {
            employee_id: employee.id,
            full_name: employee.full_name.clone(),
            email: employee.email.clone(),
            role: employee.role.clone(),
        }
    }
}

/// Body of `POST /shifts/{id}/assign`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub employee_ids: Vec<EmployeeId>,
}
