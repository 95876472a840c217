//! # YAML Budget Repository
//!
//! Stores the budget options of each client in
//! `clients/{client_id}/budgets.yaml`.
//!
//! ## YAML Format
//!
//! ```yaml
//! client_id: "client-1"
//! updated_at: "2025-01-21T19:35:00Z"
//! budgets:
//!   - id: "..."
//!     name: "Opção 1"
//!     items: []
//!     general_discount:
//!       value: ""
//!       discount_type: percentage
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use shared::Budget;
use std::fs;

use super::connection::{write_atomically, DataDirectory};
use crate::storage::BudgetStorage;

#[derive(Debug, Serialize, Deserialize)]
struct BudgetFile {
    client_id: String,
    updated_at: String,
    budgets: Vec<Budget>,
}

#[derive(Debug, Clone)]
pub struct BudgetRepository {
    connection: DataDirectory,
}

impl BudgetRepository {
    pub fn new(connection: DataDirectory) -> Self {
        Self { connection }
    }
}

impl BudgetStorage for BudgetRepository {
    fn load_budgets(&self, client_id: &str) -> Result<Vec<Budget>> {
        let path = self.connection.budgets_file(client_id);
        if !path.exists() {
            debug!("No budgets saved for client '{}'", client_id);
            return Ok(Vec::new());
        }

        let yaml_content = fs::read_to_string(&path)?;
        let file: BudgetFile = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Malformed budget file {}", path.display()))?;

        debug!("Loaded {} budgets for client '{}'", file.budgets.len(), client_id);
        Ok(file.budgets)
    }

    fn save_budgets(&self, client_id: &str, budgets: &[Budget]) -> Result<()> {
        let file = BudgetFile {
            client_id: client_id.to_string(),
            updated_at: Utc::now().to_rfc3339(),
            budgets: budgets.to_vec(),
        };
        let yaml_content = serde_yaml::to_string(&file)?;
        write_atomically(&self.connection.budgets_file(client_id), &yaml_content)?;

        info!("Saved {} budgets for client '{}'", budgets.len(), client_id);
        Ok(())
    }

    fn delete_budgets(&self, client_id: &str) -> Result<bool> {
        let path = self.connection.budgets_file(client_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!("Deleted budgets of client '{}'", client_id);
        Ok(true)
    }
}
