//! Employee records and their request payloads

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::core::pluralize::Pluralizer;
use crate::core::record::Record;
use crate::core::validation::filters::trim;

pub type EmployeeId = i64;

/// Employee as returned by `GET /employees`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: String,
    pub max_weekly_hours: i64,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_notes: Option<String>,
}

/// Facet values of the employee status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl FromStr for EmployeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(EmployeeStatus::Active),
            "inactive" => Ok(EmployeeStatus::Inactive),
            other => Err(format!("unknown employee status '{}'", other)),
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeStatus::Active => write!(f, "active"),
            EmployeeStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl Employee {
    /// Initials shown in the avatar bubble ("Ann Lee" -> "AL")
    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active { "Active" } else { "Inactive" }
    }

    /// Verb for the status switch: "activate" or "deactivate"
    pub fn toggle_action(&self) -> &'static str {
        if self.is_active { "deactivate" } else { "activate" }
    }

    /// Question asked before flipping the status switch
    pub fn toggle_prompt(&self) -> String {
        format!(
            "Are you sure you want to {} \"{}\"?",
            self.toggle_action(),
            self.full_name
        )
    }

    /// Copy of this employee with the active flag flipped
    pub fn with_status_toggled(&self) -> Self {
        Self {
            is_active: !self.is_active,
            ..self.clone()
        }
    }
}

impl Record for Employee {
    type Id = EmployeeId;
    type Status = EmployeeStatus;

    fn resource_name() -> &'static str {
        "employee"
    }

    fn id(&self) -> EmployeeId {
        self.id
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.full_name.as_str()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.role.as_str()),
        ]
    }

    fn status(&self) -> EmployeeStatus {
        if self.is_active {
            EmployeeStatus::Active
        } else {
            EmployeeStatus::Inactive
        }
    }
}

/// One entry of the `POST /employees/bulk` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub availability_notes: String,
    pub max_weekly_hours: i64,
}

/// Body of `PUT /employees/{id}`, also used by the edit dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[validate(length(min = 1, message = "Name is required"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,

    #[validate(range(min = 1, max = 168, message = "Hours must be between 1-168"))]
    pub max_weekly_hours: i64,

    pub is_active: bool,
}

impl EmployeeUpdate {
    /// Copy with surrounding whitespace removed from text fields
    pub fn normalized(&self) -> Self {
        Self {
            full_name: trim(&self.full_name),
            email: trim(&self.email),
            phone: trim(&self.phone),
            role: trim(&self.role),
            ..self.clone()
        }
    }
}

impl From<&Employee> for EmployeeUpdate {
    fn from(employee: &Employee) -> Self {
        Self {
            full_name: employee.full_name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            role: employee.role.clone(),
            max_weekly_hours: employee.max_weekly_hours,
            is_active: employee.is_active,
        }
    }
}

/// Response of `POST /employees/bulk`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateResponse {
    #[serde(default)]
    pub rejected_emails: Vec<String>,
}

/// What happened to a submitted batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub submitted: usize,
    pub rejected_emails: Vec<String>,
}

impl BulkOutcome {
    pub fn accepted(&self) -> usize {
        self.submitted.saturating_sub(self.rejected_emails.len())
    }

    /// Alert text shown once the batch has been processed
    pub fn message(&self) -> String {
        if self.rejected_emails.is_empty() {
            format!(
                "Successfully added {}!",
                Pluralizer::count_label(self.submitted, "employee")
            )
        } else {
            format!(
                "Some emails were rejected (already exist):\n{}",
                self.rejected_emails.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alice() -> Employee {
        Employee {
            id: 1,
            full_name: "Alice Moreau".to_string(),
            email: "alice@example.com".to_string(),
            phone: "555-0101".to_string(),
            role: "Nurse".to_string(),
            max_weekly_hours: 38,
            is_active: true,
            availability_notes: None,
        }
    }

    #[test]
    fn test_deserialize_camel_case() {
        let employee: Employee = serde_json::from_value(json!({
            "id": 7,
            "fullName": "Bob Stone",
            "email": "bob@example.com",
            "phone": "555",
            "role": "Clerk",
            "maxWeeklyHours": 20,
            "isActive": false
        }))
        .expect("valid employee");
        assert_eq!(employee.id, 7);
        assert_eq!(employee.status(), EmployeeStatus::Inactive);
        assert!(employee.availability_notes.is_none());
    }

    #[test]
    fn test_initials() {
        assert_eq!(alice().initials(), "AM");
    }

    #[test]
    fn test_toggle_prompt() {
        let employee = alice();
        assert_eq!(
            employee.toggle_prompt(),
            "Are you sure you want to deactivate \"Alice Moreau\"?"
        );
        let toggled = employee.with_status_toggled();
        assert!(!toggled.is_active);
        assert_eq!(toggled.toggle_action(), "activate");
    }

    #[test]
    fn test_update_validation() {
        let mut update = EmployeeUpdate::from(&alice());
        assert!(update.validate().is_ok());

        update.max_weekly_hours = 0;
        update.email = "nope".to_string();
        let errors = update.validate().expect_err("invalid update");
        let fields = errors.field_errors();
        assert!(fields.contains_key("max_weekly_hours"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_normalized_then_blank_name_fails() {
        let mut update = EmployeeUpdate::from(&alice());
        update.full_name = "   ".to_string();
        assert!(update.validate().is_ok());
        assert!(update.normalized().validate().is_err());
    }

    #[test]
    fn test_bulk_outcome_messages() {
        let ok = BulkOutcome {
            submitted: 2,
            rejected_emails: vec![],
        };
        assert_eq!(ok.message(), "Successfully added 2 employees!");

        let partial = BulkOutcome {
            submitted: 3,
            rejected_emails: vec!["a@b.com".to_string()],
        };
        assert_eq!(partial.accepted(), 2);
        assert!(partial.message().contains("a@b.com"));
    }

    #[test]
    fn test_facet_parsing() {
        assert_eq!("Active".parse::<EmployeeStatus>(), Ok(EmployeeStatus::Active));
        assert!("retired".parse::<EmployeeStatus>().is_err());
    }
}
