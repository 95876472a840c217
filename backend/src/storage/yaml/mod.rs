//! File-based storage using human-readable YAML files.

pub mod appointment_repository;
pub mod budget_repository;
pub mod client_repository;
pub mod connection;
pub mod film_repository;
pub mod quote_repository;
pub mod settings_repository;

pub use appointment_repository::AppointmentRepository;
pub use budget_repository::BudgetRepository;
pub use client_repository::ClientRepository;
pub use connection::DataDirectory;
pub use film_repository::FilmRepository;
pub use quote_repository::QuoteRepository;
pub use settings_repository::SettingsRepository;
