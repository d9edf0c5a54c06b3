use chrono::{Duration, NaiveDateTime};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

use crate::config::ClinicProfile;
use crate::domain::models::appointment::Appointment;

pub const APPOINTMENT_LENGTH_MINUTES: i64 = 30;

/// Builds the `.ics` invite attached to appointment emails. Times are the
/// clinic's wall clock, so they are written as floating local times.
pub fn generate_ics(appointment: &Appointment, starts: NaiveDateTime, clinic: &ClinicProfile) -> String {
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(&format!("{}: {}", clinic.name, appointment.reason))
        .description(appointment.notes.as_deref().unwrap_or(&appointment.reason))
        .location(&clinic.address)
        .starts(starts)
        .ends(starts + Duration::minutes(APPOINTMENT_LENGTH_MINUTES))
        .uid(&appointment.appointment_id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
