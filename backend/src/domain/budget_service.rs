//! Budget options of a client.
//!
//! A client can have several pricing options ("Opção 1", "Opção 2", ...) and
//! one of them is active in the editor. New options start as a copy of the
//! active one. The last remaining option can never be deleted.

use log::{debug, info};
use shared::{Budget, DiscountSpec, MeasurementItem};

use super::id_generator::IdGenerator;

/// Validation errors for budget option operations
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum BudgetError {
    #[error("Budget option {index} does not exist ({count} options)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("The last budget option cannot be deleted")]
    LastOption,
}

/// All budget options of one client plus the editor's selection
#[derive(Debug, Clone, PartialEq)]
pub struct ClientBudgets {
    budgets: Vec<Budget>,
    active_index: usize,
    name_prefix: String,
    dirty: bool,
}

impl ClientBudgets {
    /// A single empty option named `"<prefix> 1"`
    pub fn new_default(ids: &dyn IdGenerator, name_prefix: &str) -> Self {
        Self {
            budgets: vec![empty_budget(ids, &format!("{} 1", name_prefix))],
            active_index: 0,
            name_prefix: name_prefix.to_string(),
            dirty: false,
        }
    }

    /// Options loaded from storage. A client without saved options gets the default one.
    pub fn from_saved(budgets: Vec<Budget>, ids: &dyn IdGenerator, name_prefix: &str) -> Self {
        if budgets.is_empty() {
            debug!("No saved budgets, starting with a default option");
            return Self::new_default(ids, name_prefix);
        }
        Self {
            budgets,
            active_index: 0,
            name_prefix: name_prefix.to_string(),
            dirty: false,
        }
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active(&self) -> &Budget {
        &self.budgets[self.active_index]
    }

    pub fn active_items(&self) -> &[MeasurementItem] {
        &self.active().items
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn select(&mut self, index: usize) -> Result<(), BudgetError> {
        self.check_index(index)?;
        self.active_index = index;
        Ok(())
    }

    /// Replace the measurement list of the active option
    pub fn replace_active_items(&mut self, items: Vec<MeasurementItem>) {
        self.budgets[self.active_index].items = items;
        self.dirty = true;
    }

    pub fn set_general_discount(&mut self, discount: DiscountSpec) {
        self.budgets[self.active_index].general_discount = discount;
        self.dirty = true;
    }

    /// Copy the active option into a new one and make it active. Returns its index.
    pub fn create_option(&mut self, ids: &dyn IdGenerator) -> usize {
        let source = self.active();
        let copy = Budget {
            id: ids.next_id(),
            name: format!("{} {}", self.name_prefix, self.budgets.len() + 1),
            items: source
                .items
                .iter()
                .cloned()
                .map(|mut m| {
                    m.id = ids.next_id();
                    m.is_new = false;
                    m
                })
                .collect(),
            general_discount: source.general_discount.clone(),
        };

        info!("Created budget option '{}' from '{}'", copy.name, source.name);
        self.budgets.push(copy);
        self.active_index = self.budgets.len() - 1;
        self.dirty = true;
        self.active_index
    }

    /// Delete an option, keeping the selection on a valid one
    pub fn delete_option(&mut self, index: usize) -> Result<Budget, BudgetError> {
        self.check_index(index)?;
        if self.budgets.len() == 1 {
            return Err(BudgetError::LastOption);
        }

        let removed = self.budgets.remove(index);
        if self.active_index >= index && self.active_index > 0 {
            self.active_index -= 1;
        }
        self.dirty = true;
        info!("Deleted budget option '{}'", removed.name);
        Ok(removed)
    }

    /// Options as they should be persisted, without transient row markers
    pub fn for_storage(&self) -> Vec<Budget> {
        self.budgets
            .iter()
            .cloned()
            .map(|mut budget| {
                budget.items.iter_mut().for_each(|m| m.is_new = false);
                budget
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), BudgetError> {
        if index >= self.budgets.len() {
            return Err(BudgetError::IndexOutOfRange {
                index,
                count: self.budgets.len(),
            });
        }
        Ok(())
    }
}

fn empty_budget(ids: &dyn IdGenerator, name: &str) -> Budget {
    Budget {
        id: ids.next_id(),
        name: name.to_string(),
        items: Vec::new(),
        general_discount: DiscountSpec::default(),
    }
}
