//! Client records.
//!
//! Deleting a client removes everything filed under it: its budget options,
//! its issued quotes and its scheduled visits.

use anyhow::Result;
use log::{info, warn};
use shared::Client;
use std::sync::Arc;

use super::id_generator::IdGenerator;
use crate::storage::{AppointmentStorage, BudgetStorage, ClientStorage, QuoteStorage};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Client name cannot be empty")]
    EmptyName,
}

/// What was removed together with a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientDeletion {
    pub client_deleted: bool,
    pub budgets_deleted: bool,
    pub quotes_deleted: usize,
    pub appointments_deleted: usize,
}

/// Service for managing clients and the records that belong to them
#[derive(Clone)]
pub struct ClientService {
    clients: Arc<dyn ClientStorage>,
    budgets: Arc<dyn BudgetStorage>,
    quotes: Arc<dyn QuoteStorage>,
    appointments: Arc<dyn AppointmentStorage>,
    ids: Arc<dyn IdGenerator>,
}

impl ClientService {
    pub fn new(
        clients: Arc<dyn ClientStorage>,
        budgets: Arc<dyn BudgetStorage>,
        quotes: Arc<dyn QuoteStorage>,
        appointments: Arc<dyn AppointmentStorage>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            clients,
            budgets,
            quotes,
            appointments,
            ids,
        }
    }

    pub fn list_clients(&self) -> Result<Vec<Client>> {
        self.clients.list_clients()
    }

    pub fn get_client(&self, client_id: &str) -> Result<Option<Client>> {
        let client = self.clients.get_client(client_id)?;
        if client.is_none() {
            warn!("Client not found: {}", client_id);
        }
        Ok(client)
    }

    /// Create or update a client. A client without id gets a new one.
    pub fn save_client(&self, client: Client) -> Result<Client> {
        let name = client.name.trim().to_string();
        if name.is_empty() {
            return Err(ClientError::EmptyName.into());
        }

        let id = if client.id.is_empty() { self.ids.next_id() } else { client.id.clone() };
        let client = Client { id, name, ..client };
        self.clients.save_client(&client)?;
        Ok(client)
    }

    /// Delete a client with its budgets, quotes and appointments
    pub fn delete_client(&self, client_id: &str) -> Result<ClientDeletion> {
        info!("Deleting client {} and its records", client_id);

        let client_deleted = self.clients.delete_client(client_id)?;
        let budgets_deleted = self.budgets.delete_budgets(client_id)?;

        let mut quotes_deleted = 0;
        for quote in self.quotes.list_quotes()?.iter().filter(|q| q.client_id == client_id) {
            if self.quotes.delete_quote(&quote.id)? {
                quotes_deleted += 1;
            }
        }

        let mut appointments_deleted = 0;
        for appointment in self
            .appointments
            .list_appointments()?
            .iter()
            .filter(|a| a.client_id == client_id)
        {
            if self.appointments.delete_appointment(&appointment.id)? {
                appointments_deleted += 1;
            }
        }

        let deletion = ClientDeletion {
            client_deleted,
            budgets_deleted,
            quotes_deleted,
            appointments_deleted,
        };
        info!("Client {} deletion: {:?}", client_id, deletion);
        Ok(deletion)
    }
}
