//! Budget totals engine.
//!
//! Prices every active measurement against the film catalog, folds the
//! per-item discounts, then applies the budget's general discount once.
//!
//! The algorithm, per active item:
//! 1. Parse width and height as locale decimals (invalid -> 0)
//! 2. `area = width * height * quantity`
//! 3. Unknown film -> base price 0, else `area * price_per_square_meter`
//! 4. Subtract the item discount, clamping the row at 0
//!
//! Fixed discounts are not clamped to the price they discount before being
//! summed; only the row price and the final total are clamped at zero.

use log::debug;
use shared::{Budget, DiscountSpec, DiscountType, Film, ItemPricing, MeasurementItem, TotalsBreakdown};

use super::number_parsing::parse_locale_decimal;

/// Price a single row. Inactive rows are priced too; the caller decides whether they count.
pub fn compute_item_price(item: &MeasurementItem, films: &[Film]) -> ItemPricing {
    let width = parse_locale_decimal(&item.width);
    let height = parse_locale_decimal(&item.height);
    let area = width * height * f64::from(item.quantity);

    let base_price = films
        .iter()
        .find(|film| film.name == item.film_name)
        .map(|film| area * film.price_per_square_meter)
        .unwrap_or(0.0);

    let discount_amount = discount_amount(base_price, item.discount, item.discount_type);

    ItemPricing {
        area,
        base_price,
        discount_amount,
        final_price: (base_price - discount_amount).max(0.0),
    }
}

/// Compute the full breakdown of a budget. Pure: the budget is never modified.
pub fn compute_totals(budget: &Budget, films: &[Film]) -> TotalsBreakdown {
    let mut totals = budget
        .items
        .iter()
        .filter(|item| item.active)
        .map(|item| compute_item_price(item, films))
        .fold(TotalsBreakdown::default(), |mut acc, pricing| {
            acc.total_area += pricing.area;
            acc.subtotal += pricing.base_price;
            acc.total_item_discount += pricing.discount_amount;
            acc.price_after_item_discounts += pricing.final_price;
            acc
        });

    totals.general_discount_amount =
        general_discount_amount(&budget.general_discount, totals.price_after_item_discounts);
    totals.final_total = (totals.price_after_item_discounts - totals.general_discount_amount).max(0.0);
    totals
}

fn general_discount_amount(spec: &DiscountSpec, price_after_item_discounts: f64) -> f64 {
    let value = parse_locale_decimal(&spec.value);
    discount_amount(price_after_item_discounts, value, spec.discount_type)
}

fn discount_amount(price: f64, value: f64, discount_type: DiscountType) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    match discount_type {
        DiscountType::Percentage => price * (value / 100.0),
        DiscountType::Fixed => value,
    }
}

/// Service wrapper around the totals engine
#[derive(Clone, Default)]
pub struct TotalsService;

impl TotalsService {
    pub fn new() -> Self {
        Self
    }

    /// Compute totals for a budget and log the result
    pub fn totals_for(&self, budget: &Budget, films: &[Film]) -> TotalsBreakdown {
        let totals = compute_totals(budget, films);
        debug!(
            "Totals for budget {}: area={:.2} subtotal={:.2} item_discount={:.2} general_discount={:.2} final={:.2}",
            budget.id,
            totals.total_area,
            totals.subtotal,
            totals.total_item_discount,
            totals.general_discount_amount,
            totals.final_total
        );
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn films() -> Vec<Film> {
        vec![
            Film { name: "Fumê G20".to_string(), price_per_square_meter: 100.0 },
            Film { name: "Espelhado".to_string(), price_per_square_meter: 80.0 },
        ]
    }

    fn item(id: &str, width: &str, height: &str, quantity: u32, film: &str) -> MeasurementItem {
        MeasurementItem {
            id: id.to_string(),
            width: width.to_string(),
            height: height.to_string(),
            quantity,
            film_name: film.to_string(),
            environment: String::new(),
            application_type: String::new(),
            active: true,
            discount: 0.0,
            discount_type: DiscountType::Percentage,
            is_new: false,
        }
    }

    fn budget(items: Vec<MeasurementItem>, general_discount: DiscountSpec) -> Budget {
        Budget {
            id: "b1".to_string(),
            name: "Opção 1".to_string(),
            items,
            general_discount,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_item_price_with_percentage_discount() {
        let mut row = item("m1", "2", "1,5", 2, "Fumê G20");
        row.discount = 10.0;

        let pricing = compute_item_price(&row, &films());

        assert_close(pricing.area, 6.0);
        assert_close(pricing.base_price, 600.0);
        assert_close(pricing.discount_amount, 60.0);
        assert_close(pricing.final_price, 540.0);
    }

    #[test]
    fn test_general_fixed_discount_applies_after_item_discounts() {
        let mut row = item("m1", "2", "1,5", 2, "Fumê G20");
        row.discount = 10.0;

        let totals = compute_totals(&budget(vec![row], DiscountSpec::fixed("50")), &films());

        assert_close(totals.subtotal, 600.0);
        assert_close(totals.total_item_discount, 60.0);
        assert_close(totals.price_after_item_discounts, 540.0);
        assert_close(totals.general_discount_amount, 50.0);
        assert_close(totals.final_total, 490.0);
    }

    #[test]
    fn test_general_percentage_discount() {
        let rows = vec![item("m1", "1", "1", 1, "Fumê G20"), item("m2", "1.0", "2,0", 1, "Espelhado")];

        let totals = compute_totals(&budget(rows, DiscountSpec::percentage("10,5")), &films());

        assert_close(totals.price_after_item_discounts, 260.0);
        assert_close(totals.general_discount_amount, 27.3);
        assert_close(totals.final_total, 232.7);
    }

    #[test]
    fn test_empty_budget_is_all_zero() {
        let totals = compute_totals(&budget(vec![], DiscountSpec::default()), &films());
        assert_eq!(totals, TotalsBreakdown::default());

        // a fixed discount on nothing still reports its amount, the total stays clamped
        let discounted = compute_totals(&budget(vec![], DiscountSpec::fixed("100")), &films());
        assert_eq!(discounted.final_total, 0.0);
        assert_close(discounted.general_discount_amount, 100.0);
    }

    #[test]
    fn test_inactive_items_are_excluded() {
        let mut hidden = item("m2", "99", "99", 9, "Fumê G20");
        hidden.active = false;
        hidden.discount = 500.0;
        hidden.discount_type = DiscountType::Fixed;

        let with_hidden = compute_totals(
            &budget(vec![item("m1", "1", "2", 1, "Fumê G20"), hidden], DiscountSpec::default()),
            &films(),
        );
        let without = compute_totals(
            &budget(vec![item("m1", "1", "2", 1, "Fumê G20")], DiscountSpec::default()),
            &films(),
        );

        assert_eq!(with_hidden, without);
    }

    #[test]
    fn test_unknown_film_contributes_area_only() {
        let totals = compute_totals(
            &budget(vec![item("m1", "2", "3", 1, "Descontinuado")], DiscountSpec::default()),
            &films(),
        );

        assert_close(totals.total_area, 6.0);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.final_total, 0.0);
    }

    #[test]
    fn test_fixed_discounts_are_clamped_only_at_row_and_total() {
        let mut row = item("m1", "1", "1", 1, "Fumê G20");
        row.discount = 150.0;
        row.discount_type = DiscountType::Fixed;

        let totals = compute_totals(&budget(vec![row], DiscountSpec::fixed("1000")), &films());

        assert_close(totals.total_item_discount, 150.0);
        assert_eq!(totals.price_after_item_discounts, 0.0);
        assert_close(totals.general_discount_amount, 1000.0);
        assert_eq!(totals.final_total, 0.0);
    }

    #[test]
    fn test_invalid_numbers_degrade_to_zero() {
        let rows = vec![item("m1", "abc", "2", 1, "Fumê G20")];
        let totals = compute_totals(&budget(rows, DiscountSpec::percentage("xx")), &films());

        assert_eq!(totals.total_area, 0.0);
        assert_eq!(totals.general_discount_amount, 0.0);
    }

    #[test]
    fn test_final_total_is_never_negative() {
        for discount in ["0", "50", "100", "250", "100000"] {
            let rows = vec![item("m1", "1,5", "1,5", 3, "Espelhado")];
            let percentage = compute_totals(&budget(rows.clone(), DiscountSpec::percentage(discount)), &films());
            let fixed = compute_totals(&budget(rows, DiscountSpec::fixed(discount)), &films());

            assert!(percentage.final_total >= 0.0);
            assert!(fixed.final_total >= 0.0);
        }
    }
}
