//! Bulk employee entry: a table of rows validated together before one POST
//!
//! Each [`BulkRow`] carries its own field errors. A batch is only ready for
//! submission when every row is valid and no two rows share an email
//! (compared case-insensitively).

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::filters::{email_key, parse_hours, trim};
use super::validators::{email, not_blank, within};
use crate::core::error::{FieldValidationError, ValidationError};
use crate::models::employee::NewEmployee;

/// Hours pre-filled in a new row
pub const DEFAULT_WEEKLY_HOURS: i64 = 40;

/// Lowest and highest accepted weekly hours
pub const WEEKLY_HOURS_RANGE: (i64, i64) = (1, 168);

/// Editable columns of the bulk-entry table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkField {
    FullName,
    Email,
    Role,
    MaxWeeklyHours,
    Phone,
    AvailabilityNotes,
}

impl BulkField {
    /// Columns in validation order
    pub const ALL: [BulkField; 6] = [
        BulkField::FullName,
        BulkField::Email,
        BulkField::Role,
        BulkField::MaxWeeklyHours,
        BulkField::Phone,
        BulkField::AvailabilityNotes,
    ];

    /// Wire name of the field
    pub fn name(&self) -> &'static str {
        match self {
            BulkField::FullName => "fullName",
            BulkField::Email => "email",
            BulkField::Role => "role",
            BulkField::MaxWeeklyHours => "maxWeeklyHours",
            BulkField::Phone => "phone",
            BulkField::AvailabilityNotes => "availabilityNotes",
        }
    }
}

impl fmt::Display for BulkField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the bulk-entry table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRow {
    key: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub availability_notes: String,
    pub max_weekly_hours: Option<i64>,
    errors: IndexMap<BulkField, String>,
}

impl Default for BulkRow {
    fn default() -> Self {
        Self::blank()
    }
}

impl BulkRow {
    /// Empty row with the default weekly hours
    pub fn blank() -> Self {
        Self {
            key: Uuid::new_v4(),
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            role: String::new(),
            availability_notes: String::new(),
            max_weekly_hours: Some(DEFAULT_WEEKLY_HOURS),
            errors: IndexMap::new(),
        }
    }

    /// Stable key identifying the row while it is edited
    pub fn key(&self) -> Uuid {
        self.key
    }

    pub fn errors(&self) -> &IndexMap<BulkField, String> {
        &self.errors
    }

    pub fn error(&self, field: BulkField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Valid iff the last validation produced no errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check every field; the map is empty when the row is valid
    pub fn validate(&self) -> IndexMap<BulkField, String> {
        let (min_hours, max_hours) = WEEKLY_HOURS_RANGE;
        let mut errors = IndexMap::new();

        for field in BulkField::ALL {
            let name = field.name();
            let outcome = match field {
                BulkField::FullName => not_blank("Name is required")(name, &self.full_name),
                BulkField::Email => email()(name, &self.email),
                BulkField::Role => not_blank("Role is required")(name, &self.role),
                BulkField::MaxWeeklyHours => {
                    within(min_hours, max_hours, "Hours must be between 1-168")(
                        name,
                        self.max_weekly_hours,
                    )
                }
                BulkField::Phone => not_blank("Phone is required")(name, &self.phone),
                BulkField::AvailabilityNotes => {
                    not_blank("Availability notes required")(name, &self.availability_notes)
                }
            };
            if let Err(message) = outcome {
                errors.insert(field, message);
            }
        }

        errors
    }

    /// Apply a value typed into one of the row's inputs.
    ///
    /// Editing a field clears its error.
    pub fn set(&mut self, field: BulkField, value: &str) {
        match field {
            BulkField::FullName => self.full_name = value.to_string(),
            BulkField::Email => self.email = value.to_string(),
            BulkField::Role => self.role = value.to_string(),
            BulkField::MaxWeeklyHours => self.max_weekly_hours = parse_hours(value),
            BulkField::Phone => self.phone = value.to_string(),
            BulkField::AvailabilityNotes => self.availability_notes = value.to_string(),
        }
        self.errors.shift_remove(&field);
    }

    /// Payload for the API, with text fields trimmed
    pub fn to_new_employee(&self) -> NewEmployee {
        NewEmployee {
            full_name: trim(&self.full_name),
            email: trim(&self.email),
            phone: trim(&self.phone),
            role: trim(&self.role),
            availability_notes: trim(&self.availability_notes),
            max_weekly_hours: self.max_weekly_hours.unwrap_or(DEFAULT_WEEKLY_HOURS),
        }
    }
}

/// Outcome of validating the whole table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Keys of rows with at least one field error
    pub invalid_rows: Vec<Uuid>,
    /// Every email involved in a collision, as typed, in row order
    pub duplicate_emails: Vec<String>,
}

impl BulkReport {
    pub fn is_clean(&self) -> bool {
        self.invalid_rows.is_empty() && self.duplicate_emails.is_empty()
    }
}

/// The bulk-entry table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEntry {
    rows: Vec<BulkRow>,
}

impl Default for BulkEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkEntry {
    /// Table with a single blank row
    pub fn new() -> Self {
        Self {
            rows: vec![BulkRow::blank()],
        }
    }

    pub fn rows(&self) -> &[BulkRow] {
        &self.rows
    }

    pub fn row(&self, key: Uuid) -> Option<&BulkRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a blank row and return its key
    pub fn add_row(&mut self) -> Uuid {
        let row = BulkRow::blank();
        let key = row.key;
        self.rows.push(row);
        key
    }

    /// Remove a row; the last remaining row cannot be removed
    pub fn remove_row(&mut self, key: Uuid) -> bool {
        if self.rows.len() <= 1 {
            return false;
        }
        let before = self.rows.len();
        self.rows.retain(|r| r.key != key);
        self.rows.len() != before
    }

    /// Whether the remove button of a row is enabled
    pub fn can_remove(&self) -> bool {
        self.rows.len() > 1
    }

    /// Set a field of one row; returns `false` for an unknown key
    pub fn set(&mut self, key: Uuid, field: BulkField, value: &str) -> bool {
        match self.rows.iter_mut().find(|r| r.key == key) {
            Some(row) => {
                row.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Validate every row, store the per-row errors, and look for email collisions
    pub fn validate_all(&mut self) -> BulkReport {
        let mut report = BulkReport::default();

        for row in &mut self.rows {
            row.errors = row.validate();
            if !row.is_valid() {
                report.invalid_rows.push(row.key);
            }
        }

        report.duplicate_emails = self.duplicate_emails();
        report
    }

    /// Emails that appear on more than one row, ignoring case
    pub fn duplicate_emails(&self) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in &self.rows {
            let key = email_key(&row.email);
            if !key.is_empty() {
                *counts.entry(key).or_default() += 1;
            }
        }

        self.rows
            .iter()
            .filter(|row| counts.get(&email_key(&row.email)).is_some_and(|n| *n > 1))
            .map(|row| trim(&row.email))
            .collect()
    }

    /// Validate and build the request body.
    ///
    /// Field errors take precedence over duplicate emails. On error the rows
    /// keep their messages for display and nothing should be sent.
    pub fn prepare(&mut self) -> Result<Vec<NewEmployee>, ValidationError> {
        let report = self.validate_all();

        if !report.invalid_rows.is_empty() {
            let errors = self
                .rows
                .iter()
                .enumerate()
                .flat_map(|(index, row)| {
                    row.errors.iter().map(move |(field, message)| {
                        FieldValidationError::new(format!("rows[{}].{}", index, field), message)
                    })
                })
                .collect();
            return Err(ValidationError::FieldErrors(errors));
        }

        if !report.duplicate_emails.is_empty() {
            return Err(ValidationError::DuplicateEmails {
                emails: report.duplicate_emails,
            });
        }

        Ok(self.rows.iter().map(BulkRow::to_new_employee).collect())
    }

    /// Back to a single blank row
    pub fn reset(&mut self) {
        self.rows = vec![BulkRow::blank()];
    }
}
