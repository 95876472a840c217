//! # Film Quote Backend
//!
//! Non-UI logic for quoting film installations.
//!
//! This crate brings together:
//! - **Domain**: totals, keypad entry and quote editing rules
//! - **Storage**: persistence of budgets, the film catalog, clients,
//!   company settings, issued quotes and appointments
//! - **Config / Logging**: application settings and log setup
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (keypad, dialogs, quote views)
//!     ↓
//! AppState (editor sessions, record services)
//!     ↓
//! Domain Layer (QuoteEditor, services)
//!     ↓
//! Storage Layer (YAML files, in-memory)
//! ```

pub mod config;
pub mod domain;
pub mod logging;
pub mod storage;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use shared::SavedQuote;
use std::sync::Arc;

use crate::storage::yaml::DataDirectory;
use crate::storage::StorageSet;

pub use config::*;
pub use domain::*;

/// Application state holding the storage collaborators and shared services
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: StorageSet,
    pub ids: Arc<dyn IdGenerator>,
    pub clients: ClientService,
    pub settings: SettingsService,
    pub quotes: QuoteHistoryService,
    pub schedule: ScheduleService,
}

impl AppState {
    /// Build a state from explicit collaborators
    pub fn new(config: AppConfig, storage: StorageSet, ids: Arc<dyn IdGenerator>) -> Self {
        let clients = ClientService::new(
            Arc::clone(&storage.clients),
            Arc::clone(&storage.budgets),
            Arc::clone(&storage.quotes),
            Arc::clone(&storage.appointments),
            Arc::clone(&ids),
        );
        let settings = SettingsService::new(Arc::clone(&storage.settings));
        let quotes = QuoteHistoryService::new(Arc::clone(&storage.quotes), Arc::clone(&ids));
        let schedule = ScheduleService::new(
            Arc::clone(&storage.appointments),
            Arc::clone(&storage.quotes),
            Arc::clone(&ids),
        );

        Self {
            config,
            storage,
            ids,
            clients,
            settings,
            quotes,
            schedule,
        }
    }

    /// Start an editing session for a client with its saved budgets and the current catalog
    pub fn open_editor(&self, client_id: &str) -> Result<QuoteEditor> {
        let films = self.storage.films.list_films()?;
        let saved = self.storage.budgets.load_budgets(client_id)?;
        info!(
            "Opening editor for client '{}' ({} saved budgets, {} films)",
            client_id,
            saved.len(),
            films.len()
        );

        let budgets = ClientBudgets::from_saved(saved, self.ids.as_ref(), &self.config.budget_name_prefix);
        Ok(QuoteEditor::new(
            client_id,
            budgets,
            films,
            MeasurementService::with_defaults(self.config.measurement_defaults()),
            Arc::clone(&self.ids),
            AutoSaveTracker::from_millis(self.config.autosave_debounce_ms),
        ))
    }

    /// Persist the editor's budgets if it has unsaved changes. Returns whether it saved.
    pub fn save_editor(&self, editor: &mut QuoteEditor) -> Result<bool> {
        if !editor.is_dirty() {
            return Ok(false);
        }
        self.storage.budgets.save_budgets(editor.client_id(), &editor.for_storage())?;
        editor.mark_saved();
        Ok(true)
    }

    /// Issue a quote for the editor's active budget. A pending keypad entry is
    /// committed and unsaved edits are saved first. The client and the
    /// company settings must exist.
    pub fn issue_quote(&self, editor: &mut QuoteEditor, issued_at: DateTime<Utc>) -> Result<SavedQuote> {
        editor.close_numpad();
        let client = self
            .clients
            .get_client(editor.client_id())?
            .ok_or_else(|| QuoteError::UnknownClient(editor.client_id().to_string()))?;
        let settings = self.settings.load()?.ok_or(QuoteError::MissingCompanySettings)?;

        self.save_editor(editor)?;
        self.quotes.record(
            &client,
            editor.active_budget(),
            editor.quotable_items(),
            &editor.totals(),
            &settings,
            issued_at,
        )
    }
}

/// Initialize the backend on the configured data directory
pub fn initialize_backend(config: AppConfig) -> Result<AppState> {
    info!("Setting up data directory {}", config.data_directory.display());
    let connection = DataDirectory::new(&config.data_directory)?;

    info!("Setting up storage");
    let storage = StorageSet::yaml(connection);

    Ok(AppState::new(config, storage, Arc::new(UuidIdGenerator)))
}
