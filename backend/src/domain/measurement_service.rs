//! Measurement list operations.
//!
//! Every operation takes the current list and returns a new one; lists are
//! never mutated in place so each result can be handed to storage as a
//! snapshot.

use log::{debug, info, warn};
use shared::{DiscountType, ExtractedMeasurement, Film, MeasurementItem};

use super::id_generator::IdGenerator;
use super::number_parsing::{coerce_quantity, parse_locale_decimal, to_stored_form};

/// Validation errors for measurement list operations
#[derive(Debug, thiserror::Error)]
pub enum MeasurementError {
    #[error("No measurements were extracted")]
    NothingExtracted,
    #[error("Extracted measurements are not a valid list: {0}")]
    InvalidExtraction(String),
}

/// Values given to fields the user has not filled in yet
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementDefaults {
    /// Film name used when the catalog is empty
    pub fallback_film_name: String,
    pub environment: String,
    pub application_type: String,
}

impl Default for MeasurementDefaults {
    fn default() -> Self {
        Self {
            fallback_film_name: "Nenhuma".to_string(),
            environment: "Desconhecido".to_string(),
            application_type: "Desconhecido".to_string(),
        }
    }
}

/// Service for editing the measurement rows of a budget
#[derive(Debug, Clone, Default)]
pub struct MeasurementService {
    defaults: MeasurementDefaults,
}

impl MeasurementService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: MeasurementDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &MeasurementDefaults {
        &self.defaults
    }

    /// Film assigned to new rows: the first of the catalog, or the fallback name
    pub fn default_film_name(&self, films: &[Film]) -> String {
        films
            .first()
            .map(|film| film.name.clone())
            .unwrap_or_else(|| self.defaults.fallback_film_name.clone())
    }

    /// A blank active row with quantity 1
    pub fn create_empty_item(&self, films: &[Film], ids: &dyn IdGenerator) -> MeasurementItem {
        MeasurementItem {
            id: ids.next_id(),
            width: String::new(),
            height: String::new(),
            quantity: 1,
            film_name: self.default_film_name(films),
            environment: self.defaults.environment.clone(),
            application_type: self.defaults.application_type.clone(),
            active: true,
            discount: 0.0,
            discount_type: DiscountType::Percentage,
            is_new: false,
        }
    }

    /// Prepend a row and make it the only one marked new
    pub fn prepend_new(&self, items: &[MeasurementItem], mut item: MeasurementItem) -> Vec<MeasurementItem> {
        item.is_new = true;
        std::iter::once(item)
            .chain(items.iter().cloned().map(|mut m| {
                m.is_new = false;
                m
            }))
            .collect()
    }

    /// Clone a row right after itself under a new id. `None` when the row does not exist.
    pub fn duplicate_after(
        &self,
        items: &[MeasurementItem],
        item_id: &str,
        ids: &dyn IdGenerator,
    ) -> Option<Vec<MeasurementItem>> {
        let index = items.iter().position(|m| m.id == item_id)?;

        let mut copy = items[index].clone();
        copy.id = ids.next_id();
        copy.is_new = true;
        debug!("Duplicating measurement {} as {}", item_id, copy.id);

        let mut result: Vec<MeasurementItem> = items
            .iter()
            .cloned()
            .map(|mut m| {
                m.is_new = false;
                m
            })
            .collect();
        result.insert(index + 1, copy);
        Some(result)
    }

    /// Change the film of one row
    pub fn select_film(&self, items: &[MeasurementItem], item_id: &str, film_name: &str) -> Vec<MeasurementItem> {
        self.map_item(items, item_id, |m| m.film_name = film_name.to_string())
    }

    /// Use the same film on every row
    pub fn apply_film_to_all(&self, items: &[MeasurementItem], film_name: &str) -> Vec<MeasurementItem> {
        info!("Applying film '{}' to {} measurements", film_name, items.len());
        items
            .iter()
            .cloned()
            .map(|mut m| {
                m.film_name = film_name.to_string();
                m
            })
            .collect()
    }

    /// Set the per-row discount
    pub fn set_item_discount(
        &self,
        items: &[MeasurementItem],
        item_id: &str,
        discount: f64,
        discount_type: DiscountType,
    ) -> Vec<MeasurementItem> {
        self.map_item(items, item_id, |m| {
            m.discount = discount;
            m.discount_type = discount_type;
        })
    }

    /// Include or exclude a row from the totals
    pub fn toggle_active(&self, items: &[MeasurementItem], item_id: &str) -> Vec<MeasurementItem> {
        self.map_item(items, item_id, |m| m.active = !m.active)
    }

    /// Replace the row that has the same id
    pub fn update_item(&self, items: &[MeasurementItem], updated: &MeasurementItem) -> Vec<MeasurementItem> {
        self.map_item(items, &updated.id, |m| *m = updated.clone())
    }

    pub fn remove_item(&self, items: &[MeasurementItem], item_id: &str) -> Vec<MeasurementItem> {
        items.iter().filter(|m| m.id != item_id).cloned().collect()
    }

    pub fn clear_new_flags(&self, items: &[MeasurementItem]) -> Vec<MeasurementItem> {
        items
            .iter()
            .cloned()
            .map(|mut m| {
                m.is_new = false;
                m
            })
            .collect()
    }

    /// Rows that can be printed on a quote: active with a positive width and height
    pub fn quotable_items(&self, items: &[MeasurementItem]) -> Vec<MeasurementItem> {
        items
            .iter()
            .filter(|m| m.active && parse_locale_decimal(&m.width) > 0.0 && parse_locale_decimal(&m.height) > 0.0)
            .cloned()
            .collect()
    }

    /// Parse the JSON list an external extractor produced
    pub fn parse_extracted_json(&self, json: &str) -> Result<Vec<ExtractedMeasurement>, MeasurementError> {
        serde_json::from_str(json).map_err(|e| MeasurementError::InvalidExtraction(e.to_string()))
    }

    /// Turn extracted measurements into rows and prepend them to the list.
    ///
    /// Films are matched to the catalog ignoring case; unknown films fall back
    /// to the default film. Only the first imported row is marked new.
    pub fn import_extracted(
        &self,
        items: &[MeasurementItem],
        extracted: &[ExtractedMeasurement],
        films: &[Film],
        ids: &dyn IdGenerator,
    ) -> Result<Vec<MeasurementItem>, MeasurementError> {
        if extracted.is_empty() {
            warn!("Extraction returned no measurements");
            return Err(MeasurementError::NothingExtracted);
        }

        let imported = extracted.iter().enumerate().map(|(index, source)| {
            let film_name = source
                .film_name
                .as_deref()
                .and_then(|wanted| films.iter().find(|f| f.name.to_lowercase() == wanted.to_lowercase()))
                .map(|film| film.name.clone())
                .unwrap_or_else(|| self.default_film_name(films));

            MeasurementItem {
                id: ids.next_id(),
                width: source.width.as_ref().map(|w| to_stored_form(&w.as_text())).unwrap_or_default(),
                height: source.height.as_ref().map(|h| to_stored_form(&h.as_text())).unwrap_or_default(),
                quantity: source.quantity.as_ref().map(|q| coerce_quantity(&q.as_text())).unwrap_or(1),
                film_name,
                environment: non_empty_or(&source.environment, &self.defaults.environment),
                application_type: non_empty_or(&source.application_type, &self.defaults.application_type),
                active: true,
                discount: 0.0,
                discount_type: DiscountType::Percentage,
                is_new: index == 0,
            }
        });

        let result: Vec<MeasurementItem> = imported.chain(self.clear_new_flags(items)).collect();
        info!("Imported {} extracted measurements", extracted.len());
        Ok(result)
    }

    fn map_item<F>(&self, items: &[MeasurementItem], item_id: &str, change: F) -> Vec<MeasurementItem>
    where
        F: Fn(&mut MeasurementItem),
    {
        items
            .iter()
            .cloned()
            .map(|mut m| {
                if m.id == item_id {
                    change(&mut m);
                }
                m
            })
            .collect()
    }
}

fn non_empty_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
