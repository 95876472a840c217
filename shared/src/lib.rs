use serde::{Deserialize, Serialize};
use std::fmt;

/// One billable row of a budget: width x height x quantity of a film.
///
/// Width and height are kept as the decimal strings the user typed. Either
/// `.` or `,` is accepted as separator; committed values always use `,`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementItem {
    pub id: String,
    /// Width in meters, locale decimal string
    pub width: String,
    /// Height in meters, locale decimal string
    pub height: String,
    /// Number of identical panes, at least 1 once committed
    pub quantity: u32,
    /// Name of the film in the catalog (may not exist anymore)
    pub film_name: String,
    /// Room or place of the installation
    #[serde(default)]
    pub environment: String,
    /// Kind of application (window, door, glass roof...)
    #[serde(default)]
    pub application_type: String,
    /// Inactive rows are kept in the list but excluded from totals
    pub active: bool,
    /// Per-row discount amount, interpreted according to `discount_type`
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub discount_type: DiscountType,
    /// Highlight marker for the row that was just created. Never persisted.
    #[serde(skip)]
    pub is_new: bool,
}

impl MeasurementItem {
    /// Read a keypad-managed field as the string the keypad edits
    pub fn field_value(&self, field: NumpadField) -> String {
        match field {
            NumpadField::Width => self.width.clone(),
            NumpadField::Height => self.height.clone(),
            NumpadField::Quantity => self.quantity.to_string(),
        }
    }
}

/// How a discount amount is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Discount is a percentage of the discounted price
    #[default]
    Percentage,
    /// Discount is a flat currency amount
    Fixed,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percentage => write!(f, "percentage"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

/// Discount typed by the user for a whole budget
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscountSpec {
    /// Raw decimal string as typed, empty when no discount
    pub value: String,
    pub discount_type: DiscountType,
}

impl DiscountSpec {
    pub fn percentage(value: &str) -> Self {
        Self {
            value: value.to_string(),
            discount_type: DiscountType::Percentage,
        }
    }

    pub fn fixed(value: &str) -> Self {
        Self {
            value: value.to_string(),
            discount_type: DiscountType::Fixed,
        }
    }
}

/// A film in the catalog, keyed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub name: String,
    pub price_per_square_meter: f64,
}

/// One pricing option for a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    /// Display name, e.g. "Opção 2"
    pub name: String,
    pub items: Vec<MeasurementItem>,
    pub general_discount: DiscountSpec,
}

/// Derived price breakdown of a budget. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TotalsBreakdown {
    /// Sum of active areas in square meters
    pub total_area: f64,
    /// Sum of base prices before any discount
    pub subtotal: f64,
    pub total_item_discount: f64,
    pub price_after_item_discounts: f64,
    pub general_discount_amount: f64,
    /// `max(0, price_after_item_discounts - general_discount_amount)`
    pub final_total: f64,
}

/// Price of a single measurement row
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemPricing {
    pub area: f64,
    pub base_price: f64,
    pub discount_amount: f64,
    pub final_price: f64,
}

/// Fields the numeric keypad can edit, in entry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumpadField {
    Width,
    Height,
    Quantity,
}

impl NumpadField {
    /// Field the keypad moves to after this one, `None` at the end of the sequence
    pub fn next(self) -> Option<NumpadField> {
        match self {
            NumpadField::Width => Some(NumpadField::Height),
            NumpadField::Height => Some(NumpadField::Quantity),
            NumpadField::Quantity => None,
        }
    }

    /// Width and height accept decimals, quantity does not
    pub fn accepts_decimal(self) -> bool {
        !matches!(self, NumpadField::Quantity)
    }
}

impl fmt::Display for NumpadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumpadField::Width => write!(f, "width"),
            NumpadField::Height => write!(f, "height"),
            NumpadField::Quantity => write!(f, "quantity"),
        }
    }
}

/// A key pressed on the virtual keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumpadKey {
    /// An ASCII digit; any other character is ignored by the keypad
    Digit(char),
    /// Decimal separator, shown as `,` and typed as `,` or `.`
    Separator,
}

impl NumpadKey {
    /// Map a typed character to a key, `None` for anything that is not a digit or separator
    pub fn from_char(c: char) -> Option<NumpadKey> {
        match c {
            '0'..='9' => Some(NumpadKey::Digit(c)),
            '.' | ',' => Some(NumpadKey::Separator),
            _ => None,
        }
    }
}

/// State of the numeric keypad. Owned by the entry controller, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumpadState {
    pub is_open: bool,
    pub target_item_id: Option<String>,
    pub target_field: Option<NumpadField>,
    /// Keystroke buffer, always uses `.` as separator
    pub raw_value: String,
    /// First keystroke after focusing replaces the buffer instead of appending
    pub replace_on_next_digit: bool,
}

impl NumpadState {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn editing(item_id: &str, field: NumpadField, raw_value: String) -> Self {
        Self {
            is_open: true,
            target_item_id: Some(item_id.to_string()),
            target_field: Some(field),
            raw_value,
            replace_on_next_digit: true,
        }
    }

    /// The (item, field) pair being edited, if any
    pub fn target(&self) -> Option<(&str, NumpadField)> {
        match (&self.target_item_id, self.target_field) {
            (Some(id), Some(field)) if self.is_open => Some((id.as_str(), field)),
            _ => None,
        }
    }
}

/// A decimal read from an external extractor, which may send numbers or strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecimalInput {
    Number(f64),
    Text(String),
}

impl DecimalInput {
    /// Text form of the value, as it would have been typed
    pub fn as_text(&self) -> String {
        match self {
            DecimalInput::Number(n) => n.to_string(),
            DecimalInput::Text(s) => s.trim().to_string(),
        }
    }
}

/// A measurement extracted from free text by an external assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMeasurement {
    #[serde(default)]
    pub width: Option<DecimalInput>,
    #[serde(default)]
    pub height: Option<DecimalInput>,
    #[serde(default)]
    pub quantity: Option<DecimalInput>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub application_type: Option<String>,
    #[serde(default)]
    pub film_name: Option<String>,
}

/// A customer of the installer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// CPF or CNPJ
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
}

impl Client {
    /// Street, number, neighborhood, city and state joined by ", ", skipping blanks
    pub fn formatted_address(&self) -> String {
        [&self.street, &self.number, &self.neighborhood, &self.city, &self.state]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One way the company accepts payment, e.g. "PIX" with the key as details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub name: String,
    #[serde(default)]
    pub details: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
}

/// Opening hours used when proposing appointment slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// "HH:MM"
    pub start: String,
    pub end: String,
    /// ISO weekdays, 1 = Monday
    pub days: Vec<u8>,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: "08:00".to_string(),
            end: "18:00".to_string(),
            days: vec![1, 2, 3, 4, 5],
        }
    }
}

/// Company settings printed on quotes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    /// Person responsible for the quotes
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// CPF or CNPJ of the company
    pub document: String,
    pub website: String,
    /// Free text payment terms, e.g. "50% na aprovação"
    pub payment_terms: String,
    /// Days a quote stays valid, 60 when unset
    pub proposal_validity_days: Option<u32>,
    pub payment_methods: Vec<PaymentMethod>,
    pub employees: Vec<Employee>,
    pub working_hours: WorkingHours,
}

/// Discount kind as recorded on a saved quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavedDiscountType {
    Percentage,
    Fixed,
    /// No general discount was typed
    None,
}

/// General discount frozen at the time the quote was issued
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedDiscount {
    pub value: f64,
    pub discount_type: SavedDiscountType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteStatus::Pending => write!(f, "pending"),
            QuoteStatus::Approved => write!(f, "approved"),
            QuoteStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A quote issued to a client, kept as history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuote {
    pub id: String,
    pub client_id: String,
    /// RFC 3339 timestamp
    pub issued_at: String,
    /// RFC 3339 timestamp
    pub expires_at: String,
    pub total_price: f64,
    pub total_area: f64,
    pub subtotal: f64,
    pub general_discount_amount: f64,
    pub general_discount: SavedDiscount,
    pub file_name: String,
    pub measurements: Vec<MeasurementItem>,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default)]
    pub appointment_id: Option<String>,
}

/// A scheduled installation visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    /// Quote this visit installs, if any
    #[serde(default)]
    pub quote_id: Option<String>,
    /// RFC 3339 timestamp
    pub starts_at: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub notes: String,
}
