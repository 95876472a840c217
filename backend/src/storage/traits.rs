//! # Storage Traits
//!
//! Storage abstraction used by the application layer and the record services.
//! The quote editor never calls these directly; it receives loaded values and
//! hands back snapshots to save.

use anyhow::Result;
use shared::{Appointment, Budget, Client, Film, SavedQuote, UserInfo};

/// Persistence of the budget options of each client
pub trait BudgetStorage: Send + Sync {
    /// Load all budget options of a client, empty when none were saved
    fn load_budgets(&self, client_id: &str) -> Result<Vec<Budget>>;

    /// Replace all budget options of a client
    fn save_budgets(&self, client_id: &str, budgets: &[Budget]) -> Result<()>;

    /// Remove every budget of a client.
    /// Returns true if something was deleted
    fn delete_budgets(&self, client_id: &str) -> Result<bool>;
}

/// Persistence of the film catalog
pub trait FilmStorage: Send + Sync {
    /// All films ordered by name
    fn list_films(&self) -> Result<Vec<Film>>;

    /// Insert or replace a film by name
    fn save_film(&self, film: &Film) -> Result<()>;

    /// Returns true if the film existed
    fn delete_film(&self, name: &str) -> Result<bool>;
}

/// Persistence of client records
pub trait ClientStorage: Send + Sync {
    /// All clients ordered by name
    fn list_clients(&self) -> Result<Vec<Client>>;

    fn get_client(&self, client_id: &str) -> Result<Option<Client>>;

    /// Insert or replace a client by id
    fn save_client(&self, client: &Client) -> Result<()>;

    /// Returns true if the client existed
    fn delete_client(&self, client_id: &str) -> Result<bool>;
}

/// Persistence of the company settings
pub trait SettingsStorage: Send + Sync {
    /// `None` until settings were saved once
    fn load_user_info(&self) -> Result<Option<UserInfo>>;

    fn save_user_info(&self, info: &UserInfo) -> Result<()>;
}

/// Persistence of issued quotes
pub trait QuoteStorage: Send + Sync {
    /// All quotes, most recent first
    fn list_quotes(&self) -> Result<Vec<SavedQuote>>;

    fn get_quote(&self, quote_id: &str) -> Result<Option<SavedQuote>>;

    /// Insert or replace a quote by id
    fn save_quote(&self, quote: &SavedQuote) -> Result<()>;

    /// Returns true if the quote existed
    fn delete_quote(&self, quote_id: &str) -> Result<bool>;
}

/// Persistence of scheduled visits
pub trait AppointmentStorage: Send + Sync {
    /// All appointments ordered by start time
    fn list_appointments(&self) -> Result<Vec<Appointment>>;

    fn get_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>>;

    /// Insert or replace an appointment by id
    fn save_appointment(&self, appointment: &Appointment) -> Result<()>;

    /// Returns true if the appointment existed
    fn delete_appointment(&self, appointment_id: &str) -> Result<bool>;
}
