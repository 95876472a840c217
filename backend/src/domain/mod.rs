//! # Domain Module
//!
//! Business logic for pricing film installations and editing quotes.
//!
//! The quote editor works on plain values from the `shared` crate and never
//! touches storage directly. Measurement lists are treated as immutable
//! snapshots: every operation returns a new list. The record services
//! (clients, settings, quote history, schedule) hold storage trait objects.
//!
//! ## Module Organization
//!
//! - **number_parsing**: lenient parsing of locale decimal strings
//! - **totals_service**: the budget totals engine
//! - **numpad_service**: the numeric keypad state machine
//! - **measurement_service**: row-level edits of a measurement list
//! - **budget_service**: budget options of a client
//! - **quote_editor**: editing session combining all of the above
//! - **client_service**: client records and cascade deletion
//! - **settings_service**: company settings and phone formatting
//! - **quote_history**: issued quotes and their status
//! - **schedule_service**: installation visits linked to quotes
//! - **ui_mode**: the single active interaction session
//! - **autosave**: debounced save decision
//! - **id_generator**: injectable id sources
//!
//! ## Business Rules
//!
//! - Inactive rows never count towards totals
//! - Item discounts apply before the general discount
//! - Row prices and the final total never go below zero
//! - Quantities are at least 1 once committed
//! - A pending keypad entry is committed before anything else takes focus
//! - Issued quotes keep the totals they were issued with
//! - Deleting a client deletes its budgets, quotes and visits

pub mod autosave;
pub mod budget_service;
pub mod client_service;
pub mod id_generator;
pub mod measurement_service;
pub mod number_parsing;
pub mod numpad_service;
pub mod quote_editor;
pub mod quote_history;
pub mod schedule_service;
pub mod settings_service;
pub mod totals_service;
pub mod ui_mode;

pub use autosave::AutoSaveTracker;
pub use budget_service::{BudgetError, ClientBudgets};
pub use client_service::{ClientDeletion, ClientError, ClientService};
pub use id_generator::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use measurement_service::{MeasurementDefaults, MeasurementError, MeasurementService};
pub use numpad_service::{NumericEntryController, NumpadOutcome};
pub use quote_editor::{EditorError, QuoteEditor};
pub use quote_history::{QuoteError, QuoteHistoryService};
pub use schedule_service::{ScheduleError, ScheduleService};
pub use settings_service::{format_phone, SettingsError, SettingsService};
pub use totals_service::{compute_item_price, compute_totals, TotalsService};
pub use ui_mode::UiMode;
