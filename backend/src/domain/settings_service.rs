//! Company settings: contact data printed on quotes, payment methods, the
//! installation team and working hours.

use anyhow::Result;
use log::info;
use shared::{Employee, PaymentMethod, UserInfo};
use std::sync::Arc;

use super::id_generator::IdGenerator;
use super::number_parsing::parse_integer;
use crate::storage::SettingsStorage;

/// Days a quote stays valid when the settings leave it unset
pub const DEFAULT_PROPOSAL_VALIDITY_DAYS: u32 = 60;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Company settings have not been saved yet")]
    NotConfigured,
}

/// Format a Brazilian phone number as typed: `(XX) XXXXX-XXXX` for mobiles,
/// `(XX) XXXX-XXXX` for landlines. Anything but digits is dropped and at most
/// 11 digits are kept.
pub fn format_phone(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).take(11).collect();

    match digits.len() {
        0 => String::new(),
        1..=2 => format!("({}", digits),
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}

/// Validity typed in the settings form. Anything below one day means unset.
pub fn parse_validity_days(input: &str) -> Option<u32> {
    parse_integer(input)
        .filter(|days| *days >= 1)
        .map(|days| u32::try_from(days).unwrap_or(u32::MAX))
}

/// Validity of new quotes, falling back to the default
pub fn proposal_validity_days(info: Option<&UserInfo>) -> u32 {
    info.and_then(|i| i.proposal_validity_days)
        .unwrap_or(DEFAULT_PROPOSAL_VALIDITY_DAYS)
}

/// Toggle a working weekday (0 = Sunday). Days stay sorted and unique.
pub fn set_working_day(info: &mut UserInfo, day: u8, working: bool) {
    let days = &mut info.working_hours.days;
    days.retain(|d| *d != day);
    if working {
        days.push(day);
        days.sort_unstable();
    }
}

/// Add a team member. Blank names are ignored.
pub fn add_employee(info: &mut UserInfo, name: &str, ids: &dyn IdGenerator) -> Option<Employee> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let employee = Employee {
        id: ids.next_id(),
        name: name.to_string(),
    };
    info.employees.push(employee.clone());
    Some(employee)
}

pub fn remove_employee(info: &mut UserInfo, employee_id: &str) -> bool {
    let before = info.employees.len();
    info.employees.retain(|e| e.id != employee_id);
    info.employees.len() != before
}

/// Service for loading and saving the company settings
#[derive(Clone)]
pub struct SettingsService {
    storage: Arc<dyn SettingsStorage>,
}

impl SettingsService {
    pub fn new(storage: Arc<dyn SettingsStorage>) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Result<Option<UserInfo>> {
        self.storage.load_user_info()
    }

    /// Saved settings, or blank ones for a first run
    pub fn load_or_default(&self) -> Result<UserInfo> {
        Ok(self.storage.load_user_info()?.unwrap_or_default())
    }

    /// Save the settings form. The phone is stored formatted.
    pub fn save(&self, info: UserInfo) -> Result<UserInfo> {
        let info = UserInfo {
            phone: format_phone(&info.phone),
            ..info
        };
        self.storage.save_user_info(&info)?;
        Ok(info)
    }

    /// Replace the payment methods of the saved settings
    pub fn save_payment_methods(&self, methods: Vec<PaymentMethod>) -> Result<UserInfo> {
        let mut info = self.storage.load_user_info()?.ok_or(SettingsError::NotConfigured)?;
        info.payment_methods = methods;
        self.storage.save_user_info(&info)?;
        info!("Saved {} payment methods", info.payment_methods.len());
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id_generator::SequentialIdGenerator;
    use crate::storage::InMemoryStorage;

    #[test]
    fn test_format_phone_progressively() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("8"), "(8");
        assert_eq!(format_phone("81"), "(81");
        assert_eq!(format_phone("8199"), "(81) 99");
        assert_eq!(format_phone("8132221"), "(81) 3222-1");
        assert_eq!(format_phone("8132221234"), "(81) 3222-1234");
        assert_eq!(format_phone("81999991234"), "(81) 99999-1234");
    }

    #[test]
    fn test_format_phone_drops_noise_and_extra_digits() {
        assert_eq!(format_phone("(81) 99999-1234"), "(81) 99999-1234");
        assert_eq!(format_phone("+55 81 99999 12345"), "(55) 81999-9912");
        assert_eq!(format_phone("abc"), "");
    }

    #[test]
    fn test_validity_days() {
        assert_eq!(parse_validity_days("30"), Some(30));
        assert_eq!(parse_validity_days("0"), None);
        assert_eq!(parse_validity_days("-5"), None);
        assert_eq!(parse_validity_days(""), None);

        assert_eq!(proposal_validity_days(None), 60);
        let info = UserInfo {
            proposal_validity_days: Some(15),
            ..UserInfo::default()
        };
        assert_eq!(proposal_validity_days(Some(&info)), 15);
    }

    #[test]
    fn test_working_days_stay_sorted() {
        let mut info = UserInfo::default();
        set_working_day(&mut info, 6, true);
        set_working_day(&mut info, 0, true);
        set_working_day(&mut info, 6, true);
        set_working_day(&mut info, 3, false);
        assert_eq!(info.working_hours.days, vec![0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn test_employees() {
        let ids = SequentialIdGenerator::new("emp");
        let mut info = UserInfo::default();

        assert_eq!(add_employee(&mut info, "   ", &ids), None);
        let carlos = add_employee(&mut info, " Carlos ", &ids).unwrap();
        assert_eq!(carlos.name, "Carlos");
        assert_eq!(info.employees.len(), 1);

        assert!(remove_employee(&mut info, &carlos.id));
        assert!(!remove_employee(&mut info, &carlos.id));
    }

    #[test]
    fn test_save_formats_phone() {
        let service = SettingsService::new(Arc::new(InMemoryStorage::new()));
        assert_eq!(service.load_or_default().unwrap(), UserInfo::default());

        let saved = service
            .save(UserInfo {
                company: "Películas Sol".to_string(),
                phone: "81999991234".to_string(),
                ..UserInfo::default()
            })
            .unwrap();

        assert_eq!(saved.phone, "(81) 99999-1234");
        assert_eq!(service.load().unwrap(), Some(saved));
    }

    #[test]
    fn test_payment_methods_need_saved_settings() {
        let service = SettingsService::new(Arc::new(InMemoryStorage::new()));
        let pix = PaymentMethod {
            name: "PIX".to_string(),
            details: "contato@sol.com".to_string(),
            enabled: true,
        };

        let err = service.save_payment_methods(vec![pix.clone()]).unwrap_err();
        assert_eq!(err.downcast_ref::<SettingsError>(), Some(&SettingsError::NotConfigured));

        service.save(UserInfo::default()).unwrap();
        let info = service.save_payment_methods(vec![pix.clone()]).unwrap();
        assert_eq!(info.payment_methods, vec![pix]);
        assert_eq!(service.load().unwrap().map(|i| i.payment_methods.len()), Some(1));
    }
}
