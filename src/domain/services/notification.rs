use std::sync::Arc;
use serde_json::json;
use tera::{Context, Tera};
use tracing::{error, info, warn};

use crate::config::ClinicProfile;
use crate::domain::{
    models::appointment::{Appointment, AppointmentSlot},
    ports::EmailService,
    services::calendar::generate_ics,
};
use crate::error::AppError;

pub const CONFIRMATION_TEMPLATE: &str = "appointment_confirmation.html";

pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(CONFIRMATION_TEMPLATE, include_str!("../../templates/appointment_confirmation.html"))?;
    Ok(tera)
}

pub struct AppointmentNotifier {
    email_service: Arc<dyn EmailService>,
    templates: Arc<Tera>,
    clinic: ClinicProfile,
}

impl AppointmentNotifier {
    pub fn new(email_service: Arc<dyn EmailService>, templates: Arc<Tera>, clinic: ClinicProfile) -> Self {
        Self { email_service, templates, clinic }
    }

    pub fn render_confirmation(&self, appointment: &Appointment) -> Result<(String, String), AppError> {
        let data = json!({
            "clinic_name": self.clinic.name,
            "clinic_address": self.clinic.address,
            "clinic_phone": self.clinic.phone,
            "patient_name": appointment.patient_name,
            "date": appointment.date,
            "time": appointment.time,
            "reason": appointment.reason,
            "notes": appointment.notes,
        });
        let context = Context::from_value(data).map_err(|_| AppError::Internal)?;

        let body = self.templates
            .render(CONFIRMATION_TEMPLATE, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render failed: {}", e)))?;
        let subject = format!("Appointment confirmation: {} {}", appointment.date, appointment.time);

        Ok((subject, body))
    }

    /// Emails the patient with an invite attached. Delivery problems are
    /// logged and reported as `false`; they never fail the caller.
    pub async fn send_confirmation(&self, appointment: &Appointment) -> bool {
        let Some(recipient) = appointment.patient_email.as_deref() else {
            warn!("Appointment {} has no patient email", appointment.appointment_id);
            return false;
        };

        let (subject, body) = match self.render_confirmation(appointment) {
            Ok(rendered) => rendered,
            Err(e) => {
                error!("Could not render confirmation for {}: {}", appointment.appointment_id, e);
                return false;
            }
        };

        let slot = AppointmentSlot {
            date: appointment.date.clone(),
            time: appointment.time.clone(),
            reason: appointment.reason.clone(),
            notes: appointment.notes.clone(),
        };
        let ics = slot.starts_at().ok().map(|starts| generate_ics(appointment, starts, &self.clinic));

        let result = self.email_service
            .send(
                recipient,
                &subject,
                &body,
                ics.as_ref().map(|_| "appointment.ics"),
                ics.as_deref().map(str::as_bytes),
            )
            .await;

        match result {
            Ok(()) => {
                info!("Appointment confirmation sent for {}", appointment.appointment_id);
                true
            }
            Err(e) => {
                error!("Appointment confirmation failed for {}: {}", appointment.appointment_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use crate::domain::models::appointment::AppointmentStatus;

    struct NoopEmail;

    #[async_trait]
    impl EmailService for NoopEmail {
        async fn send(&self, _: &str, _: &str, _: &str, _: Option<&str>, _: Option<&[u8]>) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[test]
    fn test_confirmation_mentions_the_slot() {
        let notifier = AppointmentNotifier::new(
            Arc::new(NoopEmail),
            Arc::new(load_templates().unwrap()),
            ClinicProfile { name: "Smile Clinic".into(), address: "Main St 1".into(), phone: String::new(), email: String::new() },
        );
        let appointment = Appointment {
            appointment_id: "apt_1".into(),
            patient_id: "pat_1".into(),
            patient_name: "Ana Petrova".into(),
            patient_email: Some("ana@example.com".into()),
            date: "2024-05-10".into(),
            time: "09:30".into(),
            reason: "Cleaning".into(),
            status: AppointmentStatus::Scheduled,
            notes: None,
            created_at: Utc::now(),
            created_by: None,
        };

        let (subject, body) = notifier.render_confirmation(&appointment).unwrap();
        assert!(subject.contains("2024-05-10 09:30"));
        assert!(body.contains("Ana Petrova"));
        assert!(body.contains("Cleaning"));
        assert!(body.contains("Smile Clinic"));
        assert!(!body.contains("Notes:"));
    }
}
