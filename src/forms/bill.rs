//! Create-bill modal.
//!
//! State machine: `Closed -> Open -> Submitting -> (Closed | Open)`.
//! Participant rows are owned by the form and bound to a snapshot of the
//! friend directory taken when the row was added.

use super::{Outcome, parse_float, parse_int};
use crate::api::{Backend, CreateBillRequest, Friend, FriendId, ParticipantShare};
use crate::directory::FriendDirectory;
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::view::{escape_html, format_money, friend_options, modal_classes};

/// Alert shown when no participant row is usable.
pub const NO_PARTICIPANTS: &str = "Please add at least one participant";

/// Modal lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillFormState {
    #[default]
    Closed,
    Open,
    Submitting,
}

/// Derived final amount: `total + tax - discount`.
///
/// Any field that does not parse counts as `0`, so the result is never NaN.
pub fn calculate_final_amount(total: &str, tax: &str, discount: &str) -> f64 {
    let value = |raw: &str| parse_float(raw).unwrap_or(0.0);
    value(total) + value(tax) - value(discount)
}

/// One participant row: a friend selection and an owed amount.
///
/// Both fields hold raw control values; they are only interpreted when
/// the form is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRow {
    id: u32,
    /// Selected option value; empty when nothing is selected.
    pub friend: String,
    /// Amount as typed.
    pub amount: String,
    options: Vec<Friend>,
}

impl ParticipantRow {
    fn new(id: u32, options: Vec<Friend>) -> Self {
        Self {
            id,
            friend: String::new(),
            amount: String::new(),
            options,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Friends offered by this row's select.
    pub fn options(&self) -> &[Friend] {
        &self.options
    }

    /// The share this row contributes, if it is complete.
    ///
    /// A row counts only with a non-zero friend id and a numeric amount.
    pub fn share(&self) -> Option<ParticipantShare> {
        let friend_id: FriendId = parse_int(&self.friend).filter(|id| *id != 0)?;
        let amount_owed = parse_float(&self.amount)?;
        Some(ParticipantShare {
            friend_id,
            amount_owed,
        })
    }

    fn render(&self) -> String {
        format!(
            r#"<div class="flex space-x-2 items-center" data-row-id="{id}">
    <select class="flex-1 border border-gray-300 rounded px-3 py-2 focus:outline-none focus:ring-2 focus:ring-blue-500" required>{options}</select>
    <input type="number" class="w-24 border border-gray-300 rounded px-3 py-2 focus:outline-none focus:ring-2 focus:ring-blue-500" placeholder="Amount" step="0.01" min="0" value="{amount}" required>
    <button type="button" data-action="remove-participant" data-row-id="{id}" class="text-red-500 hover:text-red-700"><i class="fas fa-times"></i></button>
</div>"#,
            id = self.id,
            options = friend_options(&self.options, &self.friend),
            amount = escape_html(&self.amount),
        )
    }
}

/// Create-bill form view-model.
#[derive(Debug, Clone, Default)]
pub struct BillForm {
    state: BillFormState,
    description: String,
    visit_details: String,
    visit_date: String,
    total: String,
    tax: String,
    discount: String,
    rows: Vec<ParticipantRow>,
    participant_count: u32,
    final_amount_display: String,
}

impl BillForm {
    pub fn new() -> Self {
        Self {
            final_amount_display: format_money(0.0),
            ..Self::default()
        }
    }

    pub fn state(&self) -> BillFormState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != BillFormState::Closed
    }

    /// Open the modal with an empty draft holding one empty row.
    pub fn open(&mut self, directory: &FriendDirectory) {
        self.reset_draft();
        self.state = BillFormState::Open;
        self.add_participant(directory);
    }

    /// Close the modal from any state, discarding the draft.
    pub fn close(&mut self) {
        self.state = BillFormState::Closed;
        self.reset_draft();
    }

    fn reset_draft(&mut self) {
        self.description.clear();
        self.visit_details.clear();
        self.visit_date.clear();
        self.total.clear();
        self.tax.clear();
        self.discount.clear();
        self.rows.clear();
        self.participant_count = 0;
        self.recalculate();
    }

    /// Append an empty row offering the directory's current friends.
    pub fn add_participant(&mut self, directory: &FriendDirectory) -> u32 {
        self.participant_count += 1;
        let id = self.participant_count;
        self.rows.push(ParticipantRow::new(id, directory.friends().to_vec()));
        id
    }

    /// Remove one row. Returns `false` when no row has that id.
    pub fn remove_participant(&mut self, row_id: u32) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != row_id);
        self.rows.len() != before
    }

    pub fn rows(&self) -> &[ParticipantRow] {
        &self.rows
    }

    pub fn row_mut(&mut self, row_id: u32) -> Option<&mut ParticipantRow> {
        self.rows.iter_mut().find(|row| row.id == row_id)
    }

    /// Number of rows added since the modal was opened.
    pub fn participant_count(&self) -> u32 {
        self.participant_count
    }

    /// Re-render every row's options from a refreshed directory, keeping
    /// each row's current selection.
    pub fn refresh_friend_options(&mut self, directory: &FriendDirectory) {
        for row in &mut self.rows {
            row.options = directory.friends().to_vec();
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn visit_details(&self) -> &str {
        &self.visit_details
    }

    pub fn visit_date(&self) -> &str {
        &self.visit_date
    }

    pub fn total(&self) -> &str {
        &self.total
    }

    pub fn tax(&self) -> &str {
        &self.tax
    }

    pub fn discount(&self) -> &str {
        &self.discount
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    pub fn set_visit_details(&mut self, value: impl Into<String>) {
        self.visit_details = value.into();
    }

    pub fn set_visit_date(&mut self, value: impl Into<String>) {
        self.visit_date = value.into();
    }

    pub fn set_total(&mut self, value: impl Into<String>) {
        self.total = value.into();
        self.recalculate();
    }

    pub fn set_tax(&mut self, value: impl Into<String>) {
        self.tax = value.into();
        self.recalculate();
    }

    pub fn set_discount(&mut self, value: impl Into<String>) {
        self.discount = value.into();
        self.recalculate();
    }

    /// Recompute the final amount display and return the raw value.
    pub fn recalculate(&mut self) -> f64 {
        let amount = calculate_final_amount(&self.total, &self.tax, &self.discount);
        self.final_amount_display = format_money(amount);
        amount
    }

    /// Final amount as displayed, e.g. `$98.00`.
    pub fn final_amount_display(&self) -> &str {
        &self.final_amount_display
    }

    /// Build the request from the current fields.
    ///
    /// Incomplete rows are dropped; no usable row at all is a validation
    /// error.
    pub fn draft_request(&self) -> Result<CreateBillRequest> {
        let participants: Vec<ParticipantShare> =
            self.rows.iter().filter_map(ParticipantRow::share).collect();
        if participants.is_empty() {
            return Err(Error::Validation(NO_PARTICIPANTS.to_string()));
        }
        Ok(CreateBillRequest {
            description: self.description.clone(),
            visit_details: self.visit_details.clone(),
            visit_date: self.visit_date.clone(),
            total_amount: parse_float(&self.total),
            tax_amount: parse_float(&self.tax).unwrap_or(0.0),
            discount_amount: parse_float(&self.discount).unwrap_or(0.0),
            participants,
        })
    }

    /// Submit the form.
    ///
    /// On success the modal closes and the result is
    /// [`Outcome::Committed`]; on failure the modal stays open with its
    /// data intact.
    pub async fn submit(&mut self, backend: &dyn Backend, notifier: &dyn Notifier) -> Outcome {
        if self.state != BillFormState::Open {
            tracing::debug!(state = ?self.state, "Ignoring bill submit outside the open state");
            return Outcome::Ignored;
        }

        let request = match self.draft_request() {
            Ok(request) => request,
            Err(e) => {
                notifier.alert(&e.user_message());
                return Outcome::Invalid;
            }
        };

        self.state = BillFormState::Submitting;
        tracing::info!(
            name: "bill.submit.sent",
            participants = request.participants.len(),
            "Submitting bill"
        );

        match backend.create_bill(&request).await {
            Ok(response) => {
                tracing::info!(
                    name: "bill.submit.committed",
                    bill_id = ?response.bill_id,
                    "Bill created"
                );
                self.close();
                notifier.alert("Bill created successfully!");
                Outcome::Committed(response)
            }
            Err(e) => {
                tracing::warn!(name: "bill.submit.failed", error = %e, "Bill creation failed");
                self.state = BillFormState::Open;
                notifier.alert(&format!("Error creating bill: {}", e.user_message()));
                Outcome::Failed
            }
        }
    }

    /// HTML for the modal.
    pub fn render(&self) -> String {
        let rows: String = self.rows.iter().map(ParticipantRow::render).collect();
        format!(
            r#"<div id="bill-modal" class="{modal}">
<div class="bg-white rounded-lg p-6 w-full max-w-2xl max-h-screen overflow-y-auto">
<h2 class="text-xl font-bold mb-4">Create New Bill</h2>
<form id="bill-form" class="space-y-4">
    <input id="bill-description" type="text" class="w-full border rounded px-3 py-2" placeholder="Description" value="{description}" required>
    <textarea id="visit-details" class="w-full border rounded px-3 py-2" placeholder="Visit details">{visit_details}</textarea>
    <input id="visit-date" type="date" class="w-full border rounded px-3 py-2" value="{visit_date}" required>
    <input id="bill-amount" type="number" step="0.01" class="w-full border rounded px-3 py-2" value="{total}" required>
    <input id="tax-amount" type="number" step="0.01" class="w-full border rounded px-3 py-2" value="{tax}">
    <input id="discount-amount" type="number" step="0.01" class="w-full border rounded px-3 py-2" value="{discount}">
    <div class="font-semibold">Final Amount: <span id="final-amount-display">{final_amount}</span></div>
    <div id="participants-container" class="space-y-2">{rows}</div>
    <button type="button" data-action="add-participant" class="text-blue-500 hover:text-blue-700">Add Participant</button>
    <div class="flex justify-end space-x-2">
        <button type="button" data-action="close-bill-modal" class="px-4 py-2 border rounded">Cancel</button>
        <button type="submit" class="px-4 py-2 bg-blue-500 text-white rounded">Create Bill</button>
    </div>
</form>
</div>
</div>"#,
            modal = modal_classes(self.is_open()),
            description = escape_html(&self.description),
            visit_details = escape_html(&self.visit_details),
            visit_date = escape_html(&self.visit_date),
            total = escape_html(&self.total),
            tax = escape_html(&self.tax),
            discount = escape_html(&self.discount),
            final_amount = self.final_amount_display,
        )
    }
}
