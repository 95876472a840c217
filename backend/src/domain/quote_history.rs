//! # Quote History
//!
//! Every quote handed to a client is recorded with the totals of its budget
//! at that moment, so later catalog price changes do not alter it. A recorded
//! quote only changes through its status and its linked appointment.

use anyhow::Result;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{info, warn};
use shared::{
    Budget, Client, MeasurementItem, QuoteStatus, SavedDiscount, SavedDiscountType, SavedQuote, TotalsBreakdown,
    UserInfo,
};
use std::sync::Arc;

use super::id_generator::IdGenerator;
use super::number_parsing::parse_locale_decimal;
use super::settings_service::proposal_validity_days;
use crate::storage::QuoteStorage;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum QuoteError {
    #[error("There are no valid measurements to quote")]
    NoQuotableItems,
    #[error("Client not found: {0}")]
    UnknownClient(String),
    #[error("Company settings must be filled in before issuing quotes")]
    MissingCompanySettings,
    #[error("Quote not found: {0}")]
    UnknownQuote(String),
}

/// General discount as recorded on a quote. A blank value records `None`.
pub fn saved_discount(budget: &Budget) -> SavedDiscount {
    let discount = &budget.general_discount;
    let discount_type = if discount.value.is_empty() {
        SavedDiscountType::None
    } else {
        match discount.discount_type {
            shared::DiscountType::Percentage => SavedDiscountType::Percentage,
            shared::DiscountType::Fixed => SavedDiscountType::Fixed,
        }
    };
    SavedDiscount {
        value: parse_locale_decimal(&discount.value),
        discount_type,
    }
}

/// `orcamento_<client name>_<dd-mm-yyyy>.pdf`, whitespace runs in the name
/// collapsed to `_` and lowercased
pub fn quote_file_name(client_name: &str, issued_at: DateTime<Utc>) -> String {
    let mut name = String::with_capacity(client_name.len());
    let mut in_space = false;
    for c in client_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.extend(c.to_lowercase());
            in_space = false;
        }
    }
    format!("orcamento_{}_{}.pdf", name, issued_at.format("%d-%m-%Y"))
}

/// Freeze a budget into a quote record. `items` are the rows printed on the
/// quote and must not be empty.
pub fn build_saved_quote(
    id: String,
    client: &Client,
    budget: &Budget,
    items: Vec<MeasurementItem>,
    totals: &TotalsBreakdown,
    settings: &UserInfo,
    issued_at: DateTime<Utc>,
) -> Result<SavedQuote, QuoteError> {
    if items.is_empty() {
        return Err(QuoteError::NoQuotableItems);
    }

    let validity = proposal_validity_days(Some(settings));
    let expires_at = issued_at + Duration::days(i64::from(validity));

    Ok(SavedQuote {
        id,
        client_id: client.id.clone(),
        issued_at: issued_at.to_rfc3339_opts(SecondsFormat::Secs, false),
        expires_at: expires_at.to_rfc3339_opts(SecondsFormat::Secs, false),
        total_price: totals.final_total,
        total_area: totals.total_area,
        subtotal: totals.subtotal,
        general_discount_amount: totals.general_discount_amount,
        general_discount: saved_discount(budget),
        file_name: quote_file_name(&client.name, issued_at),
        measurements: items,
        status: QuoteStatus::Pending,
        appointment_id: None,
    })
}

/// Service for the history of issued quotes
#[derive(Clone)]
pub struct QuoteHistoryService {
    quotes: Arc<dyn QuoteStorage>,
    ids: Arc<dyn IdGenerator>,
}

impl QuoteHistoryService {
    pub fn new(quotes: Arc<dyn QuoteStorage>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { quotes, ids }
    }

    /// Record a new quote for a budget
    pub fn record(
        &self,
        client: &Client,
        budget: &Budget,
        items: Vec<MeasurementItem>,
        totals: &TotalsBreakdown,
        settings: &UserInfo,
        issued_at: DateTime<Utc>,
    ) -> Result<SavedQuote> {
        let quote = build_saved_quote(self.ids.next_id(), client, budget, items, totals, settings, issued_at)?;
        self.quotes.save_quote(&quote)?;
        info!(
            "Recorded quote {} for client {}: {:.2} over {:.2} m²",
            quote.id, quote.client_id, quote.total_price, quote.total_area
        );
        Ok(quote)
    }

    pub fn list_quotes(&self) -> Result<Vec<SavedQuote>> {
        self.quotes.list_quotes()
    }

    /// Quotes of one client, most recent first
    pub fn quotes_for_client(&self, client_id: &str) -> Result<Vec<SavedQuote>> {
        Ok(self
            .quotes
            .list_quotes()?
            .into_iter()
            .filter(|q| q.client_id == client_id)
            .collect())
    }

    pub fn get_quote(&self, quote_id: &str) -> Result<Option<SavedQuote>> {
        self.quotes.get_quote(quote_id)
    }

    pub fn update_status(&self, quote_id: &str, status: QuoteStatus) -> Result<SavedQuote> {
        let mut quote = self
            .quotes
            .get_quote(quote_id)?
            .ok_or_else(|| QuoteError::UnknownQuote(quote_id.to_string()))?;
        quote.status = status;
        self.quotes.save_quote(&quote)?;
        info!("Quote {} is now {}", quote_id, status);
        Ok(quote)
    }

    pub fn delete_quote(&self, quote_id: &str) -> Result<bool> {
        let deleted = self.quotes.delete_quote(quote_id)?;
        if !deleted {
            warn!("Quote not found for deletion: {}", quote_id);
        }
        Ok(deleted)
    }
}
