//! Numeric entry controller behind the virtual keypad.
//!
//! The keypad edits exactly one `(item, field)` pair at a time. Keystrokes are
//! buffered in `NumpadState::raw_value` (always with `.` as separator) and only
//! written to the measurement list on commit. Fields are visited in the order
//! width -> height -> quantity.
//!
//! Invariants:
//! - a pending buffer is committed before another target becomes active
//! - width/height buffers of the form `d.dd` commit and advance on their own
//! - quantity commits as an integer >= 1, width/height as a `,` decimal
//!
//! Operations that change rows return the whole new list in
//! [`NumpadOutcome::items`]; `None` means the list is unchanged.

use log::debug;
use shared::{Film, MeasurementItem, NumpadField, NumpadKey, NumpadState};

use super::id_generator::IdGenerator;
use super::measurement_service::MeasurementService;
use super::number_parsing::{coerce_dimension, coerce_quantity, to_buffer_form, to_stored_form};

/// Result of a keypad operation
#[derive(Debug, Clone, PartialEq)]
pub struct NumpadOutcome {
    pub state: NumpadState,
    /// Replacement measurement list, when the operation committed something
    pub items: Option<Vec<MeasurementItem>>,
}

impl NumpadOutcome {
    /// The list to keep after this outcome
    pub fn items_or(&self, current: &[MeasurementItem]) -> Vec<MeasurementItem> {
        self.items.clone().unwrap_or_else(|| current.to_vec())
    }
}

/// State machine for the numeric keypad
#[derive(Debug, Clone, Default)]
pub struct NumericEntryController {
    state: NumpadState,
    measurements: MeasurementService,
}

impl NumericEntryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_measurement_service(measurements: MeasurementService) -> Self {
        Self {
            state: NumpadState::closed(),
            measurements,
        }
    }

    pub fn state(&self) -> &NumpadState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Focus a field. A missing item or field closes the keypad instead.
    pub fn open(
        &mut self,
        items: &[MeasurementItem],
        item_id: Option<&str>,
        field: Option<NumpadField>,
        current_value: &str,
    ) -> NumpadOutcome {
        let (item_id, field) = match (item_id, field) {
            (Some(id), Some(field)) => (id, field),
            _ => return self.close(items),
        };

        if self.state.target() == Some((item_id, field)) {
            // Tapping the focused field again switches from replace to append
            self.state.replace_on_next_digit = false;
            return self.outcome(None);
        }

        let committed = self.commit_pending(items);
        debug!("Keypad focus on {} of {}", field, item_id);
        self.state = NumpadState::editing(item_id, field, to_buffer_form(current_value));
        self.outcome(committed)
    }

    /// Focus a field using the value currently stored in the row
    pub fn open_on(&mut self, items: &[MeasurementItem], item_id: &str, field: NumpadField) -> NumpadOutcome {
        let current = items
            .iter()
            .find(|m| m.id == item_id)
            .map(|m| m.field_value(field))
            .unwrap_or_default();
        self.open(items, Some(item_id), Some(field), &current)
    }

    /// Type a digit or the decimal separator
    pub fn input(&mut self, items: &[MeasurementItem], key: NumpadKey) -> NumpadOutcome {
        let (item_id, field) = match self.state.target() {
            Some((id, field)) => (id.to_string(), field),
            None => return self.outcome(None),
        };
        if matches!(key, NumpadKey::Digit(d) if !d.is_ascii_digit()) {
            return self.outcome(None);
        }

        let replace = self.state.replace_on_next_digit;
        let current = &self.state.raw_value;
        let value = match key {
            NumpadKey::Separator if !field.accepts_decimal() => current.clone(),
            NumpadKey::Separator if replace => "0.".to_string(),
            NumpadKey::Separator if current.contains('.') => current.clone(),
            NumpadKey::Separator => format!("{}.", current),
            NumpadKey::Digit(d) if replace => d.to_string(),
            NumpadKey::Digit(d) => format!("{}{}", current, d),
        };

        if field.accepts_decimal() && is_complete_dimension(&value) {
            debug!("Auto-committing {} = {} on {}", field, value, item_id);
            let committed = write_field(items, &item_id, field, &to_stored_form(&value));
            self.advance_from(&committed, &item_id, field);
            return self.outcome(Some(committed));
        }

        self.state.raw_value = value;
        self.state.replace_on_next_digit = false;
        self.outcome(None)
    }

    /// Backspace. Never commits.
    pub fn delete(&mut self) -> NumpadOutcome {
        if self.state.target().is_some() {
            self.state.raw_value.pop();
            self.state.replace_on_next_digit = false;
        }
        self.outcome(None)
    }

    /// Reset the focused row to empty width/height and quantity 1, keeping the keypad open
    pub fn clear(&mut self, items: &[MeasurementItem]) -> NumpadOutcome {
        let (item_id, field) = match self.state.target() {
            Some((id, field)) => (id.to_string(), field),
            None => return self.outcome(None),
        };

        let cleared: Vec<MeasurementItem> = items
            .iter()
            .cloned()
            .map(|mut m| {
                if m.id == item_id {
                    m.width = String::new();
                    m.height = String::new();
                    m.quantity = 1;
                }
                m
            })
            .collect();

        self.state.raw_value = match field {
            NumpadField::Quantity => "1".to_string(),
            _ => String::new(),
        };
        self.state.replace_on_next_digit = true;
        self.outcome(Some(cleared))
    }

    /// Commit and move to the next field, closing after quantity
    pub fn done(&mut self, items: &[MeasurementItem]) -> NumpadOutcome {
        let (item_id, field) = match self.state.target() {
            Some((id, field)) => (id.to_string(), field),
            None => return self.outcome(None),
        };

        let committed = self.commit_pending(items).unwrap_or_else(|| items.to_vec());
        self.advance_from(&committed, &item_id, field);
        self.outcome(Some(committed))
    }

    /// Commit the buffer and close
    pub fn close(&mut self, items: &[MeasurementItem]) -> NumpadOutcome {
        let committed = self.commit_pending(items);
        self.state = NumpadState::closed();
        self.outcome(committed)
    }

    /// Commit, copy the focused row right below itself and close
    pub fn duplicate_row(&mut self, items: &[MeasurementItem], ids: &dyn IdGenerator) -> NumpadOutcome {
        let item_id = match self.state.target() {
            Some((id, _)) => id.to_string(),
            None => return self.outcome(None),
        };

        let committed = self.commit_pending(items).unwrap_or_else(|| items.to_vec());
        let duplicated = self
            .measurements
            .duplicate_after(&committed, &item_id, ids)
            .unwrap_or(committed);

        self.state = NumpadState::closed();
        self.outcome(Some(duplicated))
    }

    /// Commit if editing, then prepend a fresh row and close
    pub fn add_row(&mut self, items: &[MeasurementItem], films: &[Film], ids: &dyn IdGenerator) -> NumpadOutcome {
        let committed = self.commit_pending(items).unwrap_or_else(|| items.to_vec());
        let fresh = self.measurements.create_empty_item(films, ids);
        debug!("Adding measurement row {}", fresh.id);
        let result = self.measurements.prepend_new(&committed, fresh);

        self.state = NumpadState::closed();
        self.outcome(Some(result))
    }

    fn commit_pending(&self, items: &[MeasurementItem]) -> Option<Vec<MeasurementItem>> {
        let (item_id, field) = self.state.target()?;
        let value = match field {
            NumpadField::Quantity => self.state.raw_value.clone(),
            _ => coerce_dimension(&self.state.raw_value),
        };
        Some(write_field(items, item_id, field, &value))
    }

    fn advance_from(&mut self, items: &[MeasurementItem], item_id: &str, field: NumpadField) {
        self.state = match field.next() {
            Some(next) => {
                let next_value = items
                    .iter()
                    .find(|m| m.id == item_id)
                    .map(|m| m.field_value(next))
                    .unwrap_or_default();
                NumpadState::editing(item_id, next, to_buffer_form(&next_value))
            }
            None => NumpadState::closed(),
        };
    }

    fn outcome(&self, items: Option<Vec<MeasurementItem>>) -> NumpadOutcome {
        NumpadOutcome {
            state: self.state.clone(),
            items,
        }
    }
}

/// Write a committed value into a copy of the list
fn write_field(items: &[MeasurementItem], item_id: &str, field: NumpadField, value: &str) -> Vec<MeasurementItem> {
    items
        .iter()
        .cloned()
        .map(|mut m| {
            if m.id == item_id {
                match field {
                    NumpadField::Width => m.width = value.to_string(),
                    NumpadField::Height => m.height = value.to_string(),
                    NumpadField::Quantity => m.quantity = coerce_quantity(value),
                }
            }
            m
        })
        .collect()
}

/// One digit, the separator, then exactly two digits
fn is_complete_dimension(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 4
        && bytes[0].is_ascii_digit()
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit()
        && bytes[3].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id_generator::SequentialIdGenerator;
    use shared::DiscountType;

    fn row(id: &str, width: &str, height: &str, quantity: u32) -> MeasurementItem {
        MeasurementItem {
            id: id.to_string(),
            width: width.to_string(),
            height: height.to_string(),
            quantity,
            film_name: "Fumê G20".to_string(),
            environment: String::new(),
            application_type: String::new(),
            active: true,
            discount: 0.0,
            discount_type: DiscountType::Percentage,
            is_new: false,
        }
    }

    fn films() -> Vec<Film> {
        vec![Film { name: "Fumê G20".to_string(), price_per_square_meter: 100.0 }]
    }

    fn type_keys(controller: &mut NumericEntryController, items: &mut Vec<MeasurementItem>, keys: &str) {
        for c in keys.chars() {
            let key = NumpadKey::from_char(c).expect("test keys are digits or separators");
            let outcome = controller.input(items, key);
            *items = outcome.items_or(items);
        }
    }

    #[test]
    fn test_open_sets_replace_mode_with_buffer_form() {
        let items = vec![row("m1", "1,20", "", 1)];
        let mut controller = NumericEntryController::new();

        let outcome = controller.open(&items, Some("m1"), Some(NumpadField::Width), "1,20");

        assert!(outcome.items.is_none());
        assert!(outcome.state.is_open);
        assert_eq!(outcome.state.raw_value, "1.20");
        assert!(outcome.state.replace_on_next_digit);
    }

    #[test]
    fn test_open_without_target_closes() {
        let items = vec![row("m1", "", "", 1)];
        let mut controller = NumericEntryController::new();

        let outcome = controller.open(&items, None, Some(NumpadField::Width), "");
        assert!(!outcome.state.is_open);

        let outcome = controller.open(&items, Some("m1"), None, "");
        assert!(!outcome.state.is_open);
        assert_eq!(outcome.state, NumpadState::closed());
    }

    #[test]
    fn test_tapping_same_field_switches_to_append() {
        let items = vec![row("m1", "2", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);

        let outcome = controller.open_on(&items, "m1", NumpadField::Width);
        assert!(!outcome.state.replace_on_next_digit);

        let outcome = controller.input(&items, NumpadKey::Digit('5'));
        assert_eq!(outcome.state.raw_value, "25");
    }

    #[test]
    fn test_switching_target_commits_pending_value() {
        let items = vec![row("m1", "", "", 1), row("m2", "", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);
        controller.input(&items, NumpadKey::Digit('3'));

        let outcome = controller.open_on(&items, "m2", NumpadField::Height);

        let updated = outcome.items.expect("pending width must be committed");
        assert_eq!(updated[0].width, "3");
        assert_eq!(outcome.state.target(), Some(("m2", NumpadField::Height)));
    }

    #[test]
    fn test_first_keystroke_replaces_buffer() {
        let items = vec![row("m1", "4,5", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);

        let outcome = controller.input(&items, NumpadKey::Digit('7'));
        assert_eq!(outcome.state.raw_value, "7");
        assert!(!outcome.state.replace_on_next_digit);

        let outcome = controller.input(&items, NumpadKey::Digit('0'));
        assert_eq!(outcome.state.raw_value, "70");
    }

    #[test]
    fn test_separator_rules() {
        let items = vec![row("m1", "4", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);

        let outcome = controller.input(&items, NumpadKey::Separator);
        assert_eq!(outcome.state.raw_value, "0.");

        let outcome = controller.input(&items, NumpadKey::Separator);
        assert_eq!(outcome.state.raw_value, "0.", "second separator is ignored");

        controller.open_on(&items, "m1", NumpadField::Quantity);
        let outcome = controller.input(&items, NumpadKey::Separator);
        assert_eq!(outcome.state.raw_value, "1", "quantity never takes a separator");
    }

    #[test]
    fn test_non_digit_keys_are_ignored() {
        let items = vec![row("m1", "1,2", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);

        let outcome = controller.input(&items, NumpadKey::Digit('x'));
        assert!(outcome.items.is_none());
        assert_eq!(outcome.state.raw_value, "1.2");
        assert!(outcome.state.replace_on_next_digit, "ignored key keeps replace mode");
    }

    #[test]
    fn test_auto_advance_from_width_to_height() {
        let mut items = vec![row("m1", "", "2,5", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);

        type_keys(&mut controller, &mut items, "1.23");

        assert_eq!(items[0].width, "1,23");
        let state = controller.state();
        assert_eq!(state.target(), Some(("m1", NumpadField::Height)));
        assert_eq!(state.raw_value, "2.5");
        assert!(state.replace_on_next_digit);
    }

    #[test]
    fn test_auto_advance_from_height_to_quantity() {
        let mut items = vec![row("m1", "1,00", "", 3)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Height);

        type_keys(&mut controller, &mut items, "0,75");

        assert_eq!(items[0].height, "0,75");
        assert_eq!(controller.state().target(), Some(("m1", NumpadField::Quantity)));
        assert_eq!(controller.state().raw_value, "3");
    }

    #[test]
    fn test_longer_values_do_not_auto_commit() {
        let mut items = vec![row("m1", "", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);

        type_keys(&mut controller, &mut items, "12.5");

        assert_eq!(items[0].width, "", "nothing committed yet");
        assert_eq!(controller.state().raw_value, "12.5");
        assert_eq!(controller.state().target(), Some(("m1", NumpadField::Width)));
    }

    #[test]
    fn test_delete_drops_last_character_without_commit() {
        let items = vec![row("m1", "", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);
        controller.input(&items, NumpadKey::Digit('1'));
        controller.input(&items, NumpadKey::Digit('2'));

        let outcome = controller.delete();

        assert_eq!(outcome.state.raw_value, "1");
        assert!(outcome.items.is_none());
    }

    #[test]
    fn test_clear_resets_row_and_stays_open() {
        let items = vec![row("m1", "1,5", "2", 4)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Quantity);

        let outcome = controller.clear(&items);

        let cleared = outcome.items.unwrap();
        assert_eq!(cleared[0].width, "");
        assert_eq!(cleared[0].height, "");
        assert_eq!(cleared[0].quantity, 1);
        assert!(outcome.state.is_open);
        assert_eq!(outcome.state.raw_value, "1");
        assert!(outcome.state.replace_on_next_digit);

        controller.open_on(&cleared, "m1", NumpadField::Width);
        let outcome = controller.clear(&cleared);
        assert_eq!(outcome.state.raw_value, "");
    }

    #[test]
    fn test_done_walks_the_sequence_and_closes_after_quantity() {
        let mut items = vec![row("m1", "", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);
        type_keys(&mut controller, &mut items, "2");

        let outcome = controller.done(&items);
        items = outcome.items_or(&items);
        assert_eq!(items[0].width, "2");
        assert_eq!(outcome.state.target(), Some(("m1", NumpadField::Height)));

        let outcome = controller.done(&items);
        items = outcome.items_or(&items);
        assert_eq!(items[0].height, "0", "empty buffer commits as zero");
        assert_eq!(outcome.state.target(), Some(("m1", NumpadField::Quantity)));

        type_keys(&mut controller, &mut items, "0");
        let outcome = controller.done(&items);
        items = outcome.items_or(&items);
        assert_eq!(items[0].quantity, 1, "zero quantity commits as one");
        assert!(!outcome.state.is_open);
    }

    #[test]
    fn test_close_commits_and_round_trips() {
        let items = vec![row("m1", "", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);
        controller.input(&items, NumpadKey::Digit('3'));
        controller.input(&items, NumpadKey::Separator);
        controller.input(&items, NumpadKey::Digit('4'));

        let outcome = controller.close(&items);
        let items = outcome.items.unwrap();
        assert_eq!(items[0].width, "3,4");
        assert!(!outcome.state.is_open);

        let reopened = controller.open_on(&items, "m1", NumpadField::Width);
        assert_eq!(reopened.state.raw_value, "3.4");
    }

    #[test]
    fn test_emptied_buffer_commits_as_zero() {
        let items = vec![row("m1", "5", "", 1)];
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);
        controller.input(&items, NumpadKey::Digit('9'));
        controller.delete();

        let outcome = controller.close(&items);
        assert_eq!(outcome.items.unwrap()[0].width, "0");
    }

    #[test]
    fn test_duplicate_row_commits_then_copies() {
        let items = vec![row("m1", "", "1", 1), row("m2", "3", "3", 1)];
        let ids = SequentialIdGenerator::new("dup");
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Width);
        controller.input(&items, NumpadKey::Digit('2'));

        let outcome = controller.duplicate_row(&items, &ids);

        let result = outcome.items.unwrap();
        let order: Vec<&str> = result.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, vec!["m1", "dup-1", "m2"]);
        assert_eq!(result[0].width, "2");
        assert_eq!(result[1].width, "2");
        assert!(result[1].is_new);
        assert!(!result[0].is_new && !result[2].is_new);
        assert!(!outcome.state.is_open);
    }

    #[test]
    fn test_add_row_prepends_and_closes() {
        let items = vec![row("m1", "", "", 1)];
        let ids = SequentialIdGenerator::new("new");
        let mut controller = NumericEntryController::new();
        controller.open_on(&items, "m1", NumpadField::Quantity);
        controller.input(&items, NumpadKey::Digit('4'));

        let outcome = controller.add_row(&items, &films(), &ids);

        let result = outcome.items.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "new-1");
        assert!(result[0].is_new);
        assert_eq!(result[0].quantity, 1);
        assert_eq!(result[1].quantity, 4);
        assert!(!outcome.state.is_open);
    }

    #[test]
    fn test_add_row_when_closed_does_not_commit() {
        let items = vec![row("m1", "1", "1", 2)];
        let ids = SequentialIdGenerator::new("new");
        let mut controller = NumericEntryController::new();

        let outcome = controller.add_row(&items, &[], &ids);

        let result = outcome.items.unwrap();
        assert_eq!(result[0].film_name, "Nenhuma");
        assert_eq!(result[1], items[0]);
    }

    #[test]
    fn test_operations_without_target_are_noops() {
        let items = vec![row("m1", "1", "1", 1)];
        let ids = SequentialIdGenerator::new("x");
        let mut controller = NumericEntryController::new();

        assert!(controller.input(&items, NumpadKey::Digit('1')).items.is_none());
        assert!(controller.delete().items.is_none());
        assert!(controller.clear(&items).items.is_none());
        assert!(controller.done(&items).items.is_none());
        assert!(controller.close(&items).items.is_none());
        assert!(controller.duplicate_row(&items, &ids).items.is_none());
        assert_eq!(controller.state(), &NumpadState::closed());
    }

    #[test]
    fn test_complete_dimension_pattern() {
        assert!(is_complete_dimension("1.23"));
        assert!(!is_complete_dimension("1.2"));
        assert!(!is_complete_dimension("12.34"));
        assert!(!is_complete_dimension("1,23"));
        assert!(!is_complete_dimension("1.234"));
    }
}
