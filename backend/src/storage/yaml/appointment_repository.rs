//! Scheduled visits stored in `appointments.yaml`, ordered by start time.

use anyhow::Result;
use log::info;
use shared::Appointment;

use super::connection::{read_yaml, write_yaml, DataDirectory};
use crate::storage::AppointmentStorage;

#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    connection: DataDirectory,
}

impl AppointmentRepository {
    pub fn new(connection: DataDirectory) -> Self {
        Self { connection }
    }

    fn read_appointments(&self) -> Result<Vec<Appointment>> {
        Ok(read_yaml(&self.connection.appointments_file())?.unwrap_or_default())
    }

    fn write_appointments(&self, mut appointments: Vec<Appointment>) -> Result<()> {
        appointments.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        write_yaml(&self.connection.appointments_file(), &appointments)
    }
}

impl AppointmentStorage for AppointmentRepository {
    fn list_appointments(&self) -> Result<Vec<Appointment>> {
        self.read_appointments()
    }

    fn get_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>> {
        Ok(self.read_appointments()?.into_iter().find(|a| a.id == appointment_id))
    }

    fn save_appointment(&self, appointment: &Appointment) -> Result<()> {
        let mut appointments = self.read_appointments()?;
        match appointments.iter_mut().find(|a| a.id == appointment.id) {
            Some(existing) => *existing = appointment.clone(),
            None => appointments.push(appointment.clone()),
        }
        self.write_appointments(appointments)?;
        info!("Saved appointment {} at {}", appointment.id, appointment.starts_at);
        Ok(())
    }

    fn delete_appointment(&self, appointment_id: &str) -> Result<bool> {
        let appointments = self.read_appointments()?;
        let before = appointments.len();
        let remaining: Vec<Appointment> = appointments.into_iter().filter(|a| a.id != appointment_id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.write_appointments(remaining)?;
        info!("Deleted appointment {}", appointment_id);
        Ok(true)
    }
}
