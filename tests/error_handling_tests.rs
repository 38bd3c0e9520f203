//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors carry the right codes and statuses
//! - User messages come from the server body when there is one
//! - Validation crates convert into the client error hierarchy
//! - Failed mutations leave local state as it was

use shiftdesk::core::error::FieldValidationError;
use shiftdesk::core::session::SessionError;
use shiftdesk::prelude::*;
use validator::Validate;

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_conflict_code() {
        let err = ClientError::Api(ApiError::Rejected {
            operation: "update employee".to_string(),
            status: 409,
            message: "Email already in use".to_string(),
        });
        assert_eq!(err.error_code(), "CONFLICT");
        assert_eq!(err.user_message(), "Email already in use");
    }

    #[test]
    fn test_validation_codes() {
        let cases = [
            (ValidationError::MissingDateRange, "MISSING_DATE_RANGE"),
            (
                ValidationError::MissingFields {
                    message: "Please fill all required fields.".to_string(),
                },
                "MISSING_FIELDS",
            ),
            (
                ValidationError::ActionUnavailable {
                    action: "notify".to_string(),
                    reason: "employees were already notified".to_string(),
                },
                "ACTION_UNAVAILABLE",
            ),
        ];
        for (err, code) in cases {
            assert_eq!(ClientError::Validation(err).error_code(), code);
        }
    }

    #[test]
    fn test_busy_and_internal() {
        let busy = ClientError::Busy {
            operation: "confirm shift".to_string(),
        };
        assert_eq!(busy.error_code(), "BUSY");
        assert!(busy.to_string().contains("confirm shift"));
        assert_eq!(
            ClientError::Internal("lock".to_string()).error_code(),
            "INTERNAL_ERROR"
        );
    }
}

// =============================================================================
// Message Tests
// =============================================================================

mod message_tests {
    use super::*;

    #[test]
    fn test_missing_date_range_message() {
        let err: ClientError = ValidationError::MissingDateRange.into();
        assert_eq!(
            err.user_message(),
            "Please select both from and to dates for export."
        );
    }

    #[test]
    fn test_unauthorized_message() {
        let err: ClientError = ApiError::Unauthorized {
            operation: "load shifts".to_string(),
        }
        .into();
        assert!(err.user_message().contains("sign in again"));
        assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    }

    #[test]
    fn test_field_errors_display() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError::new("rows[0].email", "Invalid email format"),
            FieldValidationError::new("rows[0].phone", "Phone is required"),
        ]);
        let text = err.to_string();
        assert!(text.contains("rows[0].email: Invalid email format"));
        assert!(text.contains("rows[0].phone: Phone is required"));
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[test]
    fn test_validator_errors_convert_sorted() {
        let update = EmployeeUpdate {
            full_name: String::new(),
            email: "bad".to_string(),
            phone: "555".to_string(),
            role: "Nurse".to_string(),
            max_weekly_hours: 40,
            is_active: true,
        };
        let err: ClientError = update.validate().unwrap_err().into();
        let fields: Vec<&str> = match &err {
            ClientError::Validation(v) => v.field_errors().iter().map(|f| f.field.as_str()).collect(),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(fields, vec!["email", "full_name"]);
    }

    #[test]
    fn test_session_error_converts() {
        let err: ClientError = SessionError::Poisoned.into();
        assert_eq!(err.error_code(), "SESSION_ERROR");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_config_error_is_not_recoverable() {
        let err: ClientError = ConfigError::ParseError {
            file: Some("shiftdesk.yaml".to_string()),
            message: "bad indent".to_string(),
        }
        .into();
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("shiftdesk.yaml"));
    }
}

// =============================================================================
// Local State Tests
// =============================================================================

mod local_state_tests {
    use super::*;

    fn employee(id: EmployeeId) -> Employee {
        Employee {
            id,
            full_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: "555".to_string(),
            role: "Nurse".to_string(),
            max_weekly_hours: 40,
            is_active: true,
            availability_notes: None,
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_rows() {
        let api = Arc::new(InMemoryApi::new().with_employees(vec![employee(1)]));
        let mut view = EmployeesView::new(api.clone(), 8);
        view.refresh().await.unwrap();

        api.fail_next("list_employees", 503, "");
        let err = view.refresh().await.unwrap_err();
        assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
        assert_eq!(view.listing().records().len(), 1);
        assert!(!view.listing().is_loading());
    }

    #[tokio::test]
    async fn test_in_flight_released_after_failure() {
        let api = Arc::new(InMemoryApi::new().with_employees(vec![employee(1)]));
        let mut view = EmployeesView::new(api.clone(), 8);
        view.refresh().await.unwrap();

        api.fail_next("update_employee", 500, "Failed to deactivate employee");
        assert!(view.toggle_status(1).await.is_err());
        assert!(!view.in_flight().is_active());
        assert!(view.toggle_status(1).await.is_ok());
    }
}
