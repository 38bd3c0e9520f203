//! Employees page: table, status switch, edit dialog and bulk entry

use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use super::in_flight::InFlight;
use crate::client::SchedulingApi;
use crate::core::error::{ClientResult, ValidationError};
use crate::core::filter::Facet;
use crate::core::listing::ListingController;
use crate::core::validation::BulkEntry;
use crate::models::{BulkOutcome, Employee, EmployeeId, EmployeeStatus, EmployeeUpdate};

pub struct EmployeesView {
    api: Arc<dyn SchedulingApi>,
    listing: ListingController<Employee>,
    bulk: BulkEntry,
    in_flight: InFlight,
}

impl EmployeesView {
    pub fn new(api: Arc<dyn SchedulingApi>, page_size: usize) -> Self {
        Self {
            api,
            listing: ListingController::new(page_size),
            bulk: BulkEntry::new(),
            in_flight: InFlight::new(),
        }
    }

    /// Share an in-flight flag with other views on the same page
    pub fn with_in_flight(mut self, in_flight: InFlight) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn listing(&self) -> &ListingController<Employee> {
        &self.listing
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Reload the table from the API
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let ticket = self.listing.begin_fetch();
        match self.api.list_employees().await {
            Ok(employees) => {
                debug!(count = employees.len(), "Loaded employees");
                self.listing.complete_fetch(ticket, employees);
                Ok(())
            }
            Err(e) => {
                self.listing.fail_fetch(ticket);
                Err(e)
            }
        }
    }

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

    pub fn set_facet(&mut self, facet: Facet<EmployeeStatus>) {
        self.listing.set_facet(facet);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.listing.go_to_page(page);
    }

    fn loaded(&self, id: EmployeeId) -> ClientResult<&Employee> {
        self.listing.find(id).ok_or_else(|| {
            ValidationError::UnknownRecord {
                resource: "employee".to_string(),
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Confirmation question for the status switch
    pub fn toggle_prompt(&self, id: EmployeeId) -> ClientResult<String> {
        Ok(self.loaded(id)?.toggle_prompt())
    }

    /// Flip an employee between active and inactive
    ///
    /// The local row changes only after the server accepted the update.
    pub async fn toggle_status(&mut self, id: EmployeeId) -> ClientResult<Employee> {
        let toggled = self.loaded(id)?.with_status_toggled();
        let _guard = self.in_flight.begin("toggle employee status")?;

        self.api
            .update_employee(id, &EmployeeUpdate::from(&toggled))
            .await?;

        info!(employee_id = id, active = toggled.is_active, "Employee status changed");
        self.listing.replace_record(toggled.clone());
        Ok(toggled)
    }

    /// Form prefilled from a loaded employee
    pub fn edit_form(&self, id: EmployeeId) -> ClientResult<EmployeeUpdate> {
        Ok(EmployeeUpdate::from(self.loaded(id)?))
    }

    /// Validate and save the edit dialog, then reload
    pub async fn save_edit(&mut self, id: EmployeeId, form: &EmployeeUpdate) -> ClientResult<()> {
        self.loaded(id)?;
        let update = form.normalized();
        update.validate()?;

        let _guard = self.in_flight.begin("update employee")?;
        self.api.update_employee(id, &update).await?;
        info!(employee_id = id, "Employee updated");

        self.reload_after("update employee").await;
        Ok(())
    }

    pub fn bulk(&self) -> &BulkEntry {
        &self.bulk
    }

    pub fn bulk_mut(&mut self) -> &mut BulkEntry {
        &mut self.bulk
    }

    /// Validate the bulk table and post it
    ///
    /// Nothing is sent while any row is invalid or two rows share an email.
    /// After the server answers the table is reset and the list reloaded.
    pub async fn submit_bulk(&mut self) -> ClientResult<BulkOutcome> {
        let employees = self.bulk.prepare()?;
        let _guard = self.in_flight.begin("add employees")?;

        let response = self.api.bulk_create_employees(&employees).await?;
        let outcome = BulkOutcome {
            submitted: employees.len(),
            rejected_emails: response.rejected_emails,
        };
        info!(
            submitted = outcome.submitted,
            rejected = outcome.rejected_emails.len(),
            "Bulk employee batch processed"
        );

        self.bulk.reset();
        self.reload_after("add employees").await;
        Ok(outcome)
    }
}
