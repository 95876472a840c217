//! # YAML Quote Repository
//!
//! Issued quotes are kept in `quotes.yaml`, most recent first.

use anyhow::Result;
use log::{debug, info};
use shared::SavedQuote;

use super::connection::{read_yaml, write_yaml, DataDirectory};
use crate::storage::QuoteStorage;

#[derive(Debug, Clone)]
pub struct QuoteRepository {
    connection: DataDirectory,
}

impl QuoteRepository {
    pub fn new(connection: DataDirectory) -> Self {
        Self { connection }
    }

    fn read_quotes(&self) -> Result<Vec<SavedQuote>> {
        Ok(read_yaml(&self.connection.quotes_file())?.unwrap_or_default())
    }

    fn write_quotes(&self, mut quotes: Vec<SavedQuote>) -> Result<()> {
        // RFC 3339 timestamps in UTC sort chronologically as strings
        quotes.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        write_yaml(&self.connection.quotes_file(), &quotes)
    }
}

impl QuoteStorage for QuoteRepository {
    fn list_quotes(&self) -> Result<Vec<SavedQuote>> {
        let quotes = self.read_quotes()?;
        debug!("Loaded {} quotes", quotes.len());
        Ok(quotes)
    }

    fn get_quote(&self, quote_id: &str) -> Result<Option<SavedQuote>> {
        Ok(self.read_quotes()?.into_iter().find(|q| q.id == quote_id))
    }

    fn save_quote(&self, quote: &SavedQuote) -> Result<()> {
        let mut quotes = self.read_quotes()?;
        match quotes.iter_mut().find(|q| q.id == quote.id) {
            Some(existing) => *existing = quote.clone(),
            None => quotes.push(quote.clone()),
        }
        self.write_quotes(quotes)?;
        info!("Saved quote {} for client {}", quote.id, quote.client_id);
        Ok(())
    }

    fn delete_quote(&self, quote_id: &str) -> Result<bool> {
        let quotes = self.read_quotes()?;
        let before = quotes.len();
        let remaining: Vec<SavedQuote> = quotes.into_iter().filter(|q| q.id != quote_id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.write_quotes(remaining)?;
        info!("Deleted quote {}", quote_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{QuoteStatus, SavedDiscount, SavedDiscountType};
    use tempfile::TempDir;

    fn quote(id: &str, issued_at: &str) -> SavedQuote {
        SavedQuote {
            id: id.to_string(),
            client_id: "c1".to_string(),
            issued_at: issued_at.to_string(),
            expires_at: issued_at.to_string(),
            total_price: 540.0,
            total_area: 6.0,
            subtotal: 600.0,
            general_discount_amount: 60.0,
            general_discount: SavedDiscount {
                value: 60.0,
                discount_type: SavedDiscountType::Fixed,
            },
            file_name: format!("{}.pdf", id),
            measurements: Vec::new(),
            status: QuoteStatus::Pending,
            appointment_id: None,
        }
    }

    #[test]
    fn test_quotes_are_listed_most_recent_first() {
        let temp_dir = TempDir::new().unwrap();
        let repo = QuoteRepository::new(DataDirectory::new(temp_dir.path()).unwrap());

        repo.save_quote(&quote("q1", "2025-01-10T10:00:00+00:00")).unwrap();
        repo.save_quote(&quote("q2", "2025-03-01T10:00:00+00:00")).unwrap();

        let ids: Vec<String> = repo.list_quotes().unwrap().into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec!["q2", "q1"]);
    }

    #[test]
    fn test_update_and_delete_quote() {
        let temp_dir = TempDir::new().unwrap();
        let repo = QuoteRepository::new(DataDirectory::new(temp_dir.path()).unwrap());
        repo.save_quote(&quote("q1", "2025-01-10T10:00:00+00:00")).unwrap();

        let mut approved = quote("q1", "2025-01-10T10:00:00+00:00");
        approved.status = QuoteStatus::Approved;
        repo.save_quote(&approved).unwrap();
        assert_eq!(repo.get_quote("q1").unwrap().map(|q| q.status), Some(QuoteStatus::Approved));

        assert!(repo.delete_quote("q1").unwrap());
        assert!(!repo.delete_quote("q1").unwrap());
    }
}
