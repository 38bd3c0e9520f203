//! Shifts page: table, shift form, row actions and range export

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::assign::AssignDialog;
use super::in_flight::InFlight;
use crate::client::{ExportedDocument, SchedulingApi};
use crate::core::error::{ClientResult, ValidationError};
use crate::core::filter::{DateRange, Facet};
use crate::core::listing::ListingController;
use crate::models::{Shift, ShiftAction, ShiftDraft, ShiftId, ShiftStatus};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this shift?";

pub struct ShiftsView {
    api: Arc<dyn SchedulingApi>,
    listing: ListingController<Shift>,
    export_from: Option<NaiveDate>,
    export_to: Option<NaiveDate>,
    in_flight: InFlight,
}

impl ShiftsView {
    pub fn new(api: Arc<dyn SchedulingApi>, page_size: usize) -> Self {
        Self {
            api,
            listing: ListingController::new(page_size),
            export_from: None,
            export_to: None,
            in_flight: InFlight::new(),
        }
    }

    pub fn listing(&self) -> &ListingController<Shift> {
        &self.listing
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let ticket = self.listing.begin_fetch();
        match self.api.list_shifts().await {
            Ok(shifts) => {
                debug!(count = shifts.len(), "Loaded shifts");
                self.listing.complete_fetch(ticket, shifts);
                Ok(())
            }
            Err(e) => {
                self.listing.fail_fetch(ticket);
                Err(e)
            }
        }
    }

    // === Filters ===

    /// Reload after a change the server already committed
    ///
    /// A failed reload leaves the rows marked stale instead of failing the
    /// change itself.
    async fn reload_after(&mut self, operation: &str) {
        if let Err(e) = self.refresh().await {
            warn!(operation, error = %e, "Reload failed after a committed change");
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.listing.set_query(query);
    }

    pub fn set_facet(&mut self, facet: Facet<ShiftStatus>) {
        self.listing.set_facet(facet);
    }

    /// Table date filter; applied once both ends are chosen
    pub fn set_date_bounds(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.listing.set_date_bounds(from, to);
    }

    pub fn clear_filters(&mut self) {
        self.listing.clear_filters();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.listing.go_to_page(page);
    }

    // === Row actions ===

    /// Look up a loaded shift and check that `action` is offered for it
    fn require(&self, id: ShiftId, action: ShiftAction) -> ClientResult<&Shift> {
        let shift = self
            .listing
            .find(id)
            .ok_or_else(|| ValidationError::UnknownRecord {
                resource: "shift".to_string(),
                id: id.to_string(),
            })?;

        if !shift.allows(action) {
            return Err(ValidationError::ActionUnavailable {
                action: action.to_string(),
                reason: shift.unavailable_reason(action).to_string(),
            }
            .into());
        }
        Ok(shift)
    }

    /// Prefilled form for the edit dialog
    pub fn edit_form(&self, id: ShiftId) -> ClientResult<ShiftDraft> {
        Ok(ShiftDraft::from_shift(self.require(id, ShiftAction::Edit)?))
    }

    /// Create shifts from the form, or update `id` when editing
    pub async fn save(&mut self, id: Option<ShiftId>, draft: &ShiftDraft) -> ClientResult<()> {
        match id {
            Some(id) => {
                self.require(id, ShiftAction::Edit)?;
                let request = draft.to_update_request()?;
                let _guard = self.in_flight.begin("update shift")?;
                self.api.update_shift(id, &request).await?;
                info!(shift_id = id, "Shift updated");
            }
            None => {
                let request = draft.to_create_request()?;
                let _guard = self.in_flight.begin("create shift")?;
                self.api.create_shifts(&request).await?;
                info!(
                    start = %request.shift_date,
                    days = request.days_count,
                    skip_weekends = request.skip_weekends,
                    "Shifts created"
                );
            }
        }
        self.reload_after("save shift").await;
        Ok(())
    }

    pub async fn delete(&mut self, id: ShiftId) -> ClientResult<()> {
        self.require(id, ShiftAction::Delete)?;
        let _guard = self.in_flight.begin("delete shift")?;
        self.api.delete_shift(id).await?;
        info!(shift_id = id, "Shift deleted");
        self.reload_after("delete shift").await;
        Ok(())
    }

    pub async fn confirm(&mut self, id: ShiftId) -> ClientResult<()> {
        self.require(id, ShiftAction::Confirm)?;
        let _guard = self.in_flight.begin("confirm shift")?;
        self.api.confirm_shift(id).await?;
        info!(shift_id = id, "Shift confirmed");
        self.reload_after("confirm shift").await;
        Ok(())
    }

    /// Assign dialog for a draft shift, sharing this page's in-flight flag
    pub async fn assign(&self, id: ShiftId) -> ClientResult<AssignDialog> {
        self.require(id, ShiftAction::Assign)?;
        let mut dialog =
            AssignDialog::new(Arc::clone(&self.api)).with_in_flight(self.in_flight.clone());
        dialog.open(id).await?;
        Ok(dialog)
    }

    pub async fn export_single(&self, id: ShiftId) -> ClientResult<ExportedDocument> {
        self.require(id, ShiftAction::Export)?;
        let _guard = self.in_flight.begin("export shift")?;
        let document = self.api.export_shift(id).await?;
        debug!(shift_id = id, bytes = document.bytes.len(), "Shift exported");
        Ok(document)
    }

    /// Email the assigned employees of a confirmed shift
    pub async fn notify(&mut self, id: ShiftId) -> ClientResult<()> {
        self.require(id, ShiftAction::Notify)?;
        let _guard = self.in_flight.begin("send email")?;
        self.api.notify_shift(id).await?;
        info!(shift_id = id, "Shift email sent");
        self.reload_after("send email").await;
        Ok(())
    }

    // === Range export ===

    pub fn set_export_bounds(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.export_from = from;
        self.export_to = to;
    }

    pub fn export_bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.export_from, self.export_to)
    }

    /// Export every shift between the chosen export dates
    pub async fn export_range(&self) -> ClientResult<ExportedDocument> {
        let range = DateRange::from_bounds(self.export_from, self.export_to)
            .ok_or(ValidationError::MissingDateRange)?;
        let _guard = self.in_flight.begin("export shifts")?;
        let document = self.api.export_range(range).await?;
        debug!(file = %document.file_name, "Shift range exported");
        Ok(document)
    }
}
