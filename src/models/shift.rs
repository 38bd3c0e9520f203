//! Shift records, the shift form and the per-shift action rules

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::core::error::ValidationError;
use crate::core::record::Record;
use crate::models::assignment::Assignment;

pub type ShiftId = i64;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Message used whenever a required shift field is blank
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill all required fields.";

/// Shift as returned by `GET /shifts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    #[serde(deserialize_with = "lenient_date")]
    pub shift_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub shift_type: String,
    #[serde(default)]
    pub is_confirmed: bool,
    #[serde(default)]
    pub is_informed: bool,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// Accepts both `2024-03-04` and `2024-03-04T00:00:00`
fn lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(serde::de::Error::custom)
}

/// Facet values of the shift status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftStatus {
    Confirmed,
    Draft,
}

impl FromStr for ShiftStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "confirmed" => Ok(ShiftStatus::Confirmed),
            "draft" => Ok(ShiftStatus::Draft),
            other => Err(format!("unknown shift status '{}'", other)),
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftStatus::Confirmed => write!(f, "confirmed"),
            ShiftStatus::Draft => write!(f, "draft"),
        }
    }
}

/// Row actions offered for a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftAction {
    ViewAssignments,
    Assign,
    Edit,
    Confirm,
    Delete,
    Export,
    Notify,
}

impl ShiftAction {
    pub fn name(&self) -> &'static str {
        match self {
            ShiftAction::ViewAssignments => "view assignments",
            ShiftAction::Assign => "assign",
            ShiftAction::Edit => "edit",
            ShiftAction::Confirm => "confirm",
            ShiftAction::Delete => "delete",
            ShiftAction::Export => "export",
            ShiftAction::Notify => "notify",
        }
    }
}

impl fmt::Display for ShiftAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Shift {
    pub fn time_span(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }

    /// Long form used in tables, e.g. "Mon, Mar 4, 2024"
    pub fn display_date(&self) -> String {
        self.shift_date.format("%a, %b %-d, %Y").to_string()
    }

    pub fn is_draft(&self) -> bool {
        !self.is_confirmed
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_confirmed { "Confirmed" } else { "Draft" }
    }

    pub fn has_staff(&self) -> bool {
        !self.assignments.is_empty()
    }

    pub fn awaits_notification(&self) -> bool {
        self.is_confirmed && !self.is_informed
    }

    /// Actions available in the current state
    ///
    /// Drafts can be staffed, edited, confirmed and deleted. Confirmed shifts
    /// are frozen and can only be exported, plus notified once.
    pub fn actions(&self) -> Vec<ShiftAction> {
        let mut actions = vec![ShiftAction::ViewAssignments];
        if self.is_confirmed {
            actions.push(ShiftAction::Export);
            if !self.is_informed {
                actions.push(ShiftAction::Notify);
            }
        } else {
            actions.extend([
                ShiftAction::Assign,
                ShiftAction::Edit,
                ShiftAction::Confirm,
                ShiftAction::Delete,
            ]);
        }
        actions
    }

    pub fn allows(&self, action: ShiftAction) -> bool {
        self.actions().contains(&action)
    }

    /// Reason shown when `action` is not available
    pub fn unavailable_reason(&self, action: ShiftAction) -> &'static str {
        match action {
            ShiftAction::Export => "only confirmed shifts can be exported",
            ShiftAction::Notify if self.is_informed => "employees were already notified",
            ShiftAction::Notify => "only confirmed shifts can be notified",
            _ => "confirmed shifts cannot be changed",
        }
    }

    pub fn export_file_name(&self) -> String {
        format!("Shift_{}.pdf", self.id)
    }
}

impl Record for Shift {
    type Id = ShiftId;
    type Status = ShiftStatus;

    fn resource_name() -> &'static str {
        "shift"
    }

    fn id(&self) -> ShiftId {
        self.id
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.shift_type.as_str()),
            Cow::Owned(self.shift_date.format(DATE_FORMAT).to_string()),
            Cow::Owned(self.time_span()),
        ]
    }

    fn status(&self) -> ShiftStatus {
        if self.is_confirmed {
            ShiftStatus::Confirmed
        } else {
            ShiftStatus::Draft
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.shift_date)
    }
}

/// State of the create/edit shift form
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ShiftDraft {
    #[validate(required(message = "Please fill all required fields."))]
    pub shift_date: Option<NaiveDate>,

    #[validate(length(min = 1, message = "Please fill all required fields."))]
    pub start_time: String,

    #[validate(length(min = 1, message = "Please fill all required fields."))]
    pub end_time: String,

    #[validate(length(min = 1, message = "Please fill all required fields."))]
    pub shift_type: String,

    #[validate(range(min = 1, max = 365, message = "Number of days must be between 1-365"))]
    pub days_count: u32,

    pub skip_weekends: bool,
}

impl Default for ShiftDraft {
    fn default() -> Self {
        Self {
            shift_date: None,
            start_time: String::new(),
            end_time: String::new(),
            shift_type: String::new(),
            days_count: 1,
            skip_weekends: false,
        }
    }
}

impl ShiftDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefilled form for editing an existing shift
    pub fn from_shift(shift: &Shift) -> Self {
        Self {
            shift_date: Some(shift.shift_date),
            start_time: shift.start_time.clone(),
            end_time: shift.end_time.clone(),
            shift_type: shift.shift_type.clone(),
            ..Self::default()
        }
    }

    fn normalized(&self) -> Self {
        Self {
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            shift_type: self.shift_type.trim().to_string(),
            ..self.clone()
        }
    }

    /// Validate the form
    ///
    /// Any blank required field collapses into a single `MissingFields`
    /// error. A bad day count is reported per field.
    pub fn check(&self) -> Result<(), ValidationError> {
        let normalized = self.normalized();
        let Err(errors) = normalized.validate() else {
            return Ok(());
        };

        let fields = errors.field_errors();
        let required = ["shift_date", "start_time", "end_time", "shift_type"];
        if required.iter().any(|name| fields.contains_key(*name)) {
            return Err(ValidationError::MissingFields {
                message: REQUIRED_FIELDS_MESSAGE.to_string(),
            });
        }
        Err(ValidationError::from(errors))
    }

    pub fn to_create_request(&self) -> Result<CreateShiftRequest, ValidationError> {
        self.check()?;
        let draft = self.normalized();
        Ok(CreateShiftRequest {
            shift_date: draft.required_date()?,
            days_count: draft.days_count,
            skip_weekends: draft.skip_weekends,
            start_time: draft.start_time,
            end_time: draft.end_time,
            shift_type: draft.shift_type,
        })
    }

    pub fn to_update_request(&self) -> Result<UpdateShiftRequest, ValidationError> {
        self.check()?;
        let draft = self.normalized();
        Ok(UpdateShiftRequest {
            shift_date: draft.required_date()?,
            start_time: draft.start_time,
            end_time: draft.end_time,
            shift_type: draft.shift_type,
        })
    }

    fn required_date(&self) -> Result<NaiveDate, ValidationError> {
        self.shift_date.ok_or_else(|| ValidationError::MissingFields {
            message: REQUIRED_FIELDS_MESSAGE.to_string(),
        })
    }
}

/// Body of `POST /shifts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    pub shift_date: NaiveDate,
    pub days_count: u32,
    pub skip_weekends: bool,
    pub start_time: String,
    pub end_time: String,
    pub shift_type: String,
}

impl CreateShiftRequest {
    /// Calendar days this request will produce shifts on
    pub fn dates(&self) -> Vec<NaiveDate> {
        use chrono::{Datelike, Weekday};

        self.shift_date
            .iter_days()
            .take(self.days_count as usize)
            .filter(|day| {
                !self.skip_weekends || !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
            })
            .collect()
    }
}

/// Body of `PUT /shifts/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    pub shift_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub shift_type: String,
}
