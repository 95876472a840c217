//! # Storage Module
//!
//! Persistence collaborators for budgets, the film catalog, clients, company
//! settings, issued quotes and appointments.
//!
//! - **traits**: the storage interfaces
//! - **yaml**: YAML files under the configured data directory
//! - **memory**: in-process storage for embedding and tests

pub mod memory;
pub mod traits;
pub mod yaml;

use std::sync::Arc;

pub use memory::InMemoryStorage;
pub use traits::*;

use yaml::{
    AppointmentRepository, BudgetRepository, ClientRepository, DataDirectory, FilmRepository, QuoteRepository,
    SettingsRepository,
};

/// One implementation per storage concern
#[derive(Clone)]
pub struct StorageSet {
    pub budgets: Arc<dyn BudgetStorage>,
    pub films: Arc<dyn FilmStorage>,
    pub clients: Arc<dyn ClientStorage>,
    pub settings: Arc<dyn SettingsStorage>,
    pub quotes: Arc<dyn QuoteStorage>,
    pub appointments: Arc<dyn AppointmentStorage>,
}

impl StorageSet {
    /// YAML repositories sharing one data directory
    pub fn yaml(connection: DataDirectory) -> Self {
        Self {
            budgets: Arc::new(BudgetRepository::new(connection.clone())),
            films: Arc::new(FilmRepository::new(connection.clone())),
            clients: Arc::new(ClientRepository::new(connection.clone())),
            settings: Arc::new(SettingsRepository::new(connection.clone())),
            quotes: Arc::new(QuoteRepository::new(connection.clone())),
            appointments: Arc::new(AppointmentRepository::new(connection)),
        }
    }

    /// Every concern backed by the same in-memory store
    pub fn in_memory(storage: &InMemoryStorage) -> Self {
        Self {
            budgets: Arc::new(storage.clone()),
            films: Arc::new(storage.clone()),
            clients: Arc::new(storage.clone()),
            settings: Arc::new(storage.clone()),
            quotes: Arc::new(storage.clone()),
            appointments: Arc::new(storage.clone()),
        }
    }
}
