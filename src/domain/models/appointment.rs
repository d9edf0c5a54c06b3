use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::str::FromStr;

use super::{new_id, patient::Patient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_email: Option<String>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Wall-clock start, `HH:MM`.
    pub time: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentSlot {
    pub date: String,
    pub time: String,
    pub reason: String,
    pub notes: Option<String>,
}

impl AppointmentSlot {
    pub fn starts_at(&self) -> Result<NaiveDateTime, String> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| "Invalid date format (YYYY-MM-DD)".to_string())?;
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M")
            .map_err(|_| "Invalid time format (HH:MM)".to_string())?;
        Ok(date.and_time(time))
    }
}

impl Appointment {
    pub fn new(patient: &Patient, slot: AppointmentSlot, created_by: Option<String>) -> Self {
        Self {
            appointment_id: new_id("apt"),
            patient_id: patient.patient_id.clone(),
            patient_name: patient.full_name(),
            patient_email: patient.email.clone(),
            date: slot.date,
            time: slot.time,
            reason: slot.reason,
            status: AppointmentStatus::Scheduled,
            notes: slot.notes,
            created_at: Utc::now(),
            created_by,
        }
    }

    pub fn reschedule(&mut self, slot: AppointmentSlot) {
        self.date = slot.date;
        self.time = slot.time;
        self.reason = slot.reason;
        self.notes = slot.notes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(date: &str, time: &str) -> AppointmentSlot {
        AppointmentSlot { date: date.into(), time: time.into(), reason: "Checkup".into(), notes: None }
    }

    #[test]
    fn test_slot_parsing() {
        let start = slot("2024-05-10", "09:30").starts_at().unwrap();
        assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2024-05-10 09:30");

        assert!(slot("10/05/2024", "09:30").starts_at().is_err());
        assert!(slot("2024-05-10", "9.30").starts_at().is_err());
        assert!(slot("2024-02-30", "09:30").starts_at().is_err());
    }
}
