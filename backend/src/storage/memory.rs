use anyhow::{anyhow, Result};
use shared::{Appointment, Budget, Client, Film, SavedQuote, UserInfo};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{AppointmentStorage, BudgetStorage, ClientStorage, FilmStorage, QuoteStorage, SettingsStorage};

#[derive(Debug, Default)]
struct Inner {
    budgets: HashMap<String, Vec<Budget>>,
    films: Vec<Film>,
    clients: Vec<Client>,
    user_info: Option<UserInfo>,
    quotes: Vec<SavedQuote>,
    appointments: Vec<Appointment>,
}

/// Every record kept in memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_films(films: Vec<Film>) -> Self {
        let storage = Self::default();
        if let Ok(mut inner) = storage.inner.lock() {
            inner.films = films;
        }
        storage
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| anyhow!("In-memory storage lock poisoned"))
    }
}

impl BudgetStorage for InMemoryStorage {
    fn load_budgets(&self, client_id: &str) -> Result<Vec<Budget>> {
        Ok(self.lock()?.budgets.get(client_id).cloned().unwrap_or_default())
    }

    fn save_budgets(&self, client_id: &str, budgets: &[Budget]) -> Result<()> {
        self.lock()?.budgets.insert(client_id.to_string(), budgets.to_vec());
        Ok(())
    }

    fn delete_budgets(&self, client_id: &str) -> Result<bool> {
        Ok(self.lock()?.budgets.remove(client_id).is_some())
    }
}

impl FilmStorage for InMemoryStorage {
    fn list_films(&self) -> Result<Vec<Film>> {
        let mut films = self.lock()?.films.clone();
        films.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(films)
    }

    fn save_film(&self, film: &Film) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.films.iter_mut().find(|f| f.name == film.name) {
            Some(existing) => *existing = film.clone(),
            None => inner.films.push(film.clone()),
        }
        Ok(())
    }

    fn delete_film(&self, name: &str) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.films.len();
        inner.films.retain(|f| f.name != name);
        Ok(inner.films.len() != before)
    }
}

impl ClientStorage for InMemoryStorage {
    fn list_clients(&self) -> Result<Vec<Client>> {
        let mut clients = self.lock()?.clients.clone();
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(clients)
    }

    fn get_client(&self, client_id: &str) -> Result<Option<Client>> {
        Ok(self.lock()?.clients.iter().find(|c| c.id == client_id).cloned())
    }

    fn save_client(&self, client: &Client) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.clients.iter_mut().find(|c| c.id == client.id) {
            Some(existing) => *existing = client.clone(),
            None => inner.clients.push(client.clone()),
        }
        Ok(())
    }

    fn delete_client(&self, client_id: &str) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.clients.len();
        inner.clients.retain(|c| c.id != client_id);
        Ok(inner.clients.len() != before)
    }
}

impl SettingsStorage for InMemoryStorage {
    fn load_user_info(&self) -> Result<Option<UserInfo>> {
        Ok(self.lock()?.user_info.clone())
    }

    fn save_user_info(&self, info: &UserInfo) -> Result<()> {
        self.lock()?.user_info = Some(info.clone());
        Ok(())
    }
}

impl QuoteStorage for InMemoryStorage {
    fn list_quotes(&self) -> Result<Vec<SavedQuote>> {
        let mut quotes = self.lock()?.quotes.clone();
        quotes.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(quotes)
    }

    fn get_quote(&self, quote_id: &str) -> Result<Option<SavedQuote>> {
        Ok(self.lock()?.quotes.iter().find(|q| q.id == quote_id).cloned())
    }

    fn save_quote(&self, quote: &SavedQuote) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.quotes.iter_mut().find(|q| q.id == quote.id) {
            Some(existing) => *existing = quote.clone(),
            None => inner.quotes.push(quote.clone()),
        }
        Ok(())
    }

    fn delete_quote(&self, quote_id: &str) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.quotes.len();
        inner.quotes.retain(|q| q.id != quote_id);
        Ok(inner.quotes.len() != before)
    }
}

impl AppointmentStorage for InMemoryStorage {
    fn list_appointments(&self) -> Result<Vec<Appointment>> {
        let mut appointments = self.lock()?.appointments.clone();
        appointments.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(appointments)
    }

    fn get_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>> {
        Ok(self.lock()?.appointments.iter().find(|a| a.id == appointment_id).cloned())
    }

    fn save_appointment(&self, appointment: &Appointment) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.appointments.iter_mut().find(|a| a.id == appointment.id) {
            Some(existing) => *existing = appointment.clone(),
            None => inner.appointments.push(appointment.clone()),
        }
        Ok(())
    }

    fn delete_appointment(&self, appointment_id: &str) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.appointments.len();
        inner.appointments.retain(|a| a.id != appointment_id);
        Ok(inner.appointments.len() != before)
    }
}
