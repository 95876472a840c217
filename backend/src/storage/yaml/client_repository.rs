//! # YAML Client Repository
//!
//! All client records live in `clients.yaml`, sorted by name. Each client's
//! budgets are stored separately by [`super::BudgetRepository`].

use anyhow::Result;
use log::{debug, info};
use shared::Client;

use super::connection::{read_yaml, write_yaml, DataDirectory};
use crate::storage::ClientStorage;

#[derive(Debug, Clone)]
pub struct ClientRepository {
    connection: DataDirectory,
}

impl ClientRepository {
    pub fn new(connection: DataDirectory) -> Self {
        Self { connection }
    }

    fn read_clients(&self) -> Result<Vec<Client>> {
        Ok(read_yaml(&self.connection.clients_file())?.unwrap_or_default())
    }

    fn write_clients(&self, mut clients: Vec<Client>) -> Result<()> {
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        write_yaml(&self.connection.clients_file(), &clients)
    }
}

impl ClientStorage for ClientRepository {
    fn list_clients(&self) -> Result<Vec<Client>> {
        let clients = self.read_clients()?;
        debug!("Loaded {} clients", clients.len());
        Ok(clients)
    }

    fn get_client(&self, client_id: &str) -> Result<Option<Client>> {
        Ok(self.read_clients()?.into_iter().find(|c| c.id == client_id))
    }

    fn save_client(&self, client: &Client) -> Result<()> {
        let mut clients = self.read_clients()?;
        match clients.iter_mut().find(|c| c.id == client.id) {
            Some(existing) => *existing = client.clone(),
            None => clients.push(client.clone()),
        }
        self.write_clients(clients)?;
        info!("Saved client '{}' ({})", client.name, client.id);
        Ok(())
    }

    fn delete_client(&self, client_id: &str) -> Result<bool> {
        let clients = self.read_clients()?;
        let before = clients.len();
        let remaining: Vec<Client> = clients.into_iter().filter(|c| c.id != client_id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.write_clients(remaining)?;
        info!("Deleted client {}", client_id);
        Ok(true)
    }
}
