//! Quote editor session for one client.
//!
//! Ties together the budget options, the numeric keypad, the film catalog and
//! the current [`UiMode`]. Every change to the measurement list goes through
//! the active budget, so totals are always computed from the latest snapshot.
//!
//! Opening any dialog first closes the keypad, committing whatever was typed.

use log::{debug, info};
use shared::{
    Budget, DiscountSpec, DiscountType, Film, MeasurementItem, NumpadField, NumpadKey, NumpadState, TotalsBreakdown,
};
use std::sync::Arc;
use std::time::Instant;

use super::autosave::AutoSaveTracker;
use super::budget_service::{BudgetError, ClientBudgets};
use super::id_generator::IdGenerator;
use super::measurement_service::{MeasurementError, MeasurementService};
use super::numpad_service::{NumericEntryController, NumpadOutcome};
use super::totals_service::TotalsService;
use super::ui_mode::UiMode;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("No {expected} session is open")]
    NoActiveSession { expected: &'static str },
    #[error(transparent)]
    Budget(#[from] BudgetError),
    #[error(transparent)]
    Measurement(#[from] MeasurementError),
}

pub struct QuoteEditor {
    client_id: String,
    budgets: ClientBudgets,
    films: Vec<Film>,
    numpad: NumericEntryController,
    measurements: MeasurementService,
    totals: TotalsService,
    ids: Arc<dyn IdGenerator>,
    autosave: AutoSaveTracker,
    mode: UiMode,
}

impl QuoteEditor {
    pub fn new(
        client_id: &str,
        budgets: ClientBudgets,
        films: Vec<Film>,
        measurements: MeasurementService,
        ids: Arc<dyn IdGenerator>,
        autosave: AutoSaveTracker,
    ) -> Self {
        Self {
            client_id: client_id.to_string(),
            budgets,
            films,
            numpad: NumericEntryController::with_measurement_service(measurements.clone()),
            measurements,
            totals: TotalsService::new(),
            ids,
            autosave,
            mode: UiMode::Idle,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn budgets(&self) -> &ClientBudgets {
        &self.budgets
    }

    pub fn active_budget(&self) -> &Budget {
        self.budgets.active()
    }

    pub fn items(&self) -> &[MeasurementItem] {
        self.budgets.active_items()
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn mode(&self) -> &UiMode {
        &self.mode
    }

    pub fn numpad_state(&self) -> &NumpadState {
        self.numpad.state()
    }

    /// Totals of the active budget
    pub fn totals(&self) -> TotalsBreakdown {
        self.totals.totals_for(self.budgets.active(), &self.films)
    }

    /// Rows that would be printed on a quote
    pub fn quotable_items(&self) -> Vec<MeasurementItem> {
        self.measurements.quotable_items(self.items())
    }

    /// Replace the film catalog, e.g. after the catalog was edited elsewhere
    pub fn set_films(&mut self, films: Vec<Film>) {
        self.films = films;
    }

    // Keypad

    pub fn open_numpad(&mut self, item_id: &str, field: NumpadField) -> &NumpadState {
        let outcome = self.numpad.open_on(self.budgets.active_items(), item_id, field);
        self.apply_numpad(outcome)
    }

    pub fn numpad_input(&mut self, key: NumpadKey) -> &NumpadState {
        let outcome = self.numpad.input(self.budgets.active_items(), key);
        self.apply_numpad(outcome)
    }

    pub fn numpad_delete(&mut self) -> &NumpadState {
        let outcome = self.numpad.delete();
        self.apply_numpad(outcome)
    }

    pub fn numpad_clear(&mut self) -> &NumpadState {
        let outcome = self.numpad.clear(self.budgets.active_items());
        self.apply_numpad(outcome)
    }

    pub fn numpad_done(&mut self) -> &NumpadState {
        let outcome = self.numpad.done(self.budgets.active_items());
        self.apply_numpad(outcome)
    }

    pub fn close_numpad(&mut self) -> &NumpadState {
        let outcome = self.numpad.close(self.budgets.active_items());
        self.apply_numpad(outcome)
    }

    pub fn numpad_duplicate_row(&mut self) -> &NumpadState {
        let outcome = self.numpad.duplicate_row(self.budgets.active_items(), self.ids.as_ref());
        self.apply_numpad(outcome)
    }

    /// Add an empty row on top of the list, committing any pending keypad entry
    pub fn add_row(&mut self) -> &NumpadState {
        let outcome = self
            .numpad
            .add_row(self.budgets.active_items(), &self.films, self.ids.as_ref());
        self.apply_numpad(outcome)
    }

    // Dialogs

    pub fn open_discount_editor(&mut self, item_id: &str) {
        self.enter_modal(UiMode::DiscountEditor { item_id: item_id.to_string() });
    }

    pub fn save_item_discount(&mut self, discount: f64, discount_type: DiscountType) -> Result<(), EditorError> {
        let item_id = match &self.mode {
            UiMode::DiscountEditor { item_id } => item_id.clone(),
            _ => return Err(EditorError::NoActiveSession { expected: "discount editor" }),
        };
        let items = self
            .measurements
            .set_item_discount(self.items(), &item_id, discount, discount_type);
        self.replace_items(items);
        self.mode = UiMode::Idle;
        Ok(())
    }

    pub fn open_film_selection(&mut self, item_id: &str) {
        self.enter_modal(UiMode::FilmSelection { item_id: item_id.to_string() });
    }

    pub fn select_film(&mut self, film_name: &str) -> Result<(), EditorError> {
        let item_id = match &self.mode {
            UiMode::FilmSelection { item_id } => item_id.clone(),
            _ => return Err(EditorError::NoActiveSession { expected: "film selection" }),
        };
        let items = self.measurements.select_film(self.items(), &item_id, film_name);
        self.replace_items(items);
        self.mode = UiMode::Idle;
        Ok(())
    }

    pub fn open_apply_film_to_all(&mut self) {
        self.enter_modal(UiMode::ApplyFilmToAll { film_name: None });
    }

    /// Pick the film for every row; the change waits for confirmation
    pub fn choose_film_for_all(&mut self, film_name: &str) -> Result<(), EditorError> {
        match self.mode {
            UiMode::ApplyFilmToAll { .. } => {
                self.mode = UiMode::ApplyFilmToAll { film_name: Some(film_name.to_string()) };
                Ok(())
            }
            _ => Err(EditorError::NoActiveSession { expected: "apply film to all" }),
        }
    }

    pub fn confirm_apply_film_to_all(&mut self) -> Result<(), EditorError> {
        let film_name = match &self.mode {
            UiMode::ApplyFilmToAll { film_name: Some(name) } => name.clone(),
            _ => return Err(EditorError::NoActiveSession { expected: "apply film to all" }),
        };
        let items = self.measurements.apply_film_to_all(self.items(), &film_name);
        self.replace_items(items);
        self.mode = UiMode::Idle;
        Ok(())
    }

    pub fn request_clear_all(&mut self) {
        self.enter_modal(UiMode::ConfirmClearAll);
    }

    pub fn confirm_clear_all(&mut self) -> Result<(), EditorError> {
        if self.mode != UiMode::ConfirmClearAll {
            return Err(EditorError::NoActiveSession { expected: "clear all" });
        }
        info!("Clearing all measurements of budget {}", self.active_budget().id);
        self.replace_items(Vec::new());
        self.mode = UiMode::Idle;
        Ok(())
    }

    pub fn request_delete_budget(&mut self, index: usize) -> Result<(), EditorError> {
        self.flush_numpad();
        if index >= self.budgets.budgets().len() {
            return Err(BudgetError::IndexOutOfRange {
                index,
                count: self.budgets.budgets().len(),
            }
            .into());
        }
        self.enter_modal(UiMode::ConfirmDeleteBudget { index });
        Ok(())
    }

    pub fn confirm_delete_budget(&mut self) -> Result<Budget, EditorError> {
        let index = match self.mode {
            UiMode::ConfirmDeleteBudget { index } => index,
            _ => return Err(EditorError::NoActiveSession { expected: "delete budget" }),
        };
        self.mode = UiMode::Idle;
        let removed = self.budgets.delete_option(index)?;
        self.autosave.record_change(Instant::now());
        Ok(removed)
    }

    /// Leave the current dialog without applying anything
    pub fn cancel_modal(&mut self) {
        if self.mode.is_modal() {
            debug!("Cancelled {}", self.mode.label());
            self.mode = UiMode::Idle;
        }
    }

    // Budget options and row edits

    pub fn select_budget(&mut self, index: usize) -> Result<(), EditorError> {
        self.flush_numpad();
        self.budgets.select(index)?;
        Ok(())
    }

    pub fn create_budget_option(&mut self) -> usize {
        self.flush_numpad();
        let index = self.budgets.create_option(self.ids.as_ref());
        self.autosave.record_change(Instant::now());
        index
    }

    pub fn set_general_discount(&mut self, discount: DiscountSpec) {
        self.budgets.set_general_discount(discount);
        self.autosave.record_change(Instant::now());
    }

    pub fn toggle_active(&mut self, item_id: &str) {
        self.flush_numpad();
        let items = self.measurements.toggle_active(self.items(), item_id);
        self.replace_items(items);
    }

    pub fn update_item(&mut self, item: &MeasurementItem) {
        self.flush_numpad();
        let items = self.measurements.update_item(self.items(), item);
        self.replace_items(items);
    }

    pub fn remove_item(&mut self, item_id: &str) {
        self.flush_numpad();
        let items = self.measurements.remove_item(self.items(), item_id);
        self.replace_items(items);
    }

    /// Import measurements from an external extractor's JSON answer
    pub fn import_extracted_json(&mut self, json: &str) -> Result<usize, EditorError> {
        self.flush_numpad();
        let extracted = self.measurements.parse_extracted_json(json)?;
        let items = self
            .measurements
            .import_extracted(self.items(), &extracted, &self.films, self.ids.as_ref())?;
        self.replace_items(items);
        Ok(extracted.len())
    }

    // Persistence hooks

    pub fn is_dirty(&self) -> bool {
        self.budgets.is_dirty()
    }

    pub fn autosave_due(&self, now: Instant) -> bool {
        self.budgets.is_dirty() && self.autosave.due(now)
    }

    pub fn for_storage(&self) -> Vec<Budget> {
        self.budgets.for_storage()
    }

    pub fn mark_saved(&mut self) {
        self.budgets.mark_saved();
        self.autosave.mark_saved();
    }

    fn apply_numpad(&mut self, outcome: NumpadOutcome) -> &NumpadState {
        if let Some(items) = outcome.items {
            self.replace_items(items);
        }
        if outcome.state.is_open {
            self.mode = UiMode::Numpad;
        } else if self.mode == UiMode::Numpad {
            self.mode = UiMode::Idle;
        }
        self.numpad.state()
    }

    fn flush_numpad(&mut self) {
        if self.numpad.is_open() {
            self.close_numpad();
        }
    }

    fn enter_modal(&mut self, mode: UiMode) {
        self.flush_numpad();
        debug!("Opening {}", mode.label());
        self.mode = mode;
    }

    fn replace_items(&mut self, items: Vec<MeasurementItem>) {
        self.budgets.replace_active_items(items);
        self.autosave.record_change(Instant::now());
    }
}
