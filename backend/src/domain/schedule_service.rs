//! Installation visits and their link to issued quotes.
//!
//! A visit may point at the quote it installs. Saving such a visit stamps
//! the quote with the visit id; deleting the visit clears the stamp.

use anyhow::Result;
use chrono::DateTime;
use log::{debug, info};
use shared::Appointment;
use std::sync::Arc;

use super::id_generator::IdGenerator;
use crate::storage::{AppointmentStorage, QuoteStorage};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid appointment start '{0}', expected an RFC 3339 timestamp")]
    InvalidStart(String),
}

/// Service for scheduling installation visits
#[derive(Clone)]
pub struct ScheduleService {
    appointments: Arc<dyn AppointmentStorage>,
    quotes: Arc<dyn QuoteStorage>,
    ids: Arc<dyn IdGenerator>,
}

impl ScheduleService {
    pub fn new(
        appointments: Arc<dyn AppointmentStorage>,
        quotes: Arc<dyn QuoteStorage>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            appointments,
            quotes,
            ids,
        }
    }

    pub fn list_appointments(&self) -> Result<Vec<Appointment>> {
        self.appointments.list_appointments()
    }

    pub fn appointments_for_client(&self, client_id: &str) -> Result<Vec<Appointment>> {
        Ok(self
            .appointments
            .list_appointments()?
            .into_iter()
            .filter(|a| a.client_id == client_id)
            .collect())
    }

    /// Create or update a visit and link its quote to it
    pub fn save_appointment(&self, appointment: Appointment) -> Result<Appointment> {
        if DateTime::parse_from_rfc3339(&appointment.starts_at).is_err() {
            return Err(ScheduleError::InvalidStart(appointment.starts_at).into());
        }

        let id = if appointment.id.is_empty() {
            self.ids.next_id()
        } else {
            appointment.id.clone()
        };
        let appointment = Appointment { id, ..appointment };
        self.appointments.save_appointment(&appointment)?;

        if let Some(quote_id) = &appointment.quote_id {
            match self.quotes.get_quote(quote_id)? {
                Some(mut quote) if quote.appointment_id.as_deref() != Some(appointment.id.as_str()) => {
                    quote.appointment_id = Some(appointment.id.clone());
                    self.quotes.save_quote(&quote)?;
                    info!("Linked quote {} to appointment {}", quote_id, appointment.id);
                }
                Some(_) => {}
                None => debug!("Appointment {} refers to missing quote {}", appointment.id, quote_id),
            }
        }

        Ok(appointment)
    }

    /// Delete a visit and unlink the quote that pointed at it
    pub fn delete_appointment(&self, appointment_id: &str) -> Result<bool> {
        let linked: Vec<_> = self
            .quotes
            .list_quotes()?
            .into_iter()
            .filter(|q| q.appointment_id.as_deref() == Some(appointment_id))
            .collect();

        let deleted = self.appointments.delete_appointment(appointment_id)?;

        for mut quote in linked {
            quote.appointment_id = None;
            self.quotes.save_quote(&quote)?;
            info!("Unlinked quote {} from appointment {}", quote.id, appointment_id);
        }

        Ok(deleted)
    }
}
