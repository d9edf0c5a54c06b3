use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::{
    requests::{CreateAppointmentRequest, PatientFilter, UpdateStatusRequest},
    responses::{AppointmentCreatedResponse, MessageResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{
    activity::action,
    appointment::{Appointment, AppointmentSlot, AppointmentStatus},
};
use crate::domain::services::{activity, role_policy::{authorize, Operation}};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(filter): Query<PatientFilter>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ReadAppointment)?;
    Ok(Json(state.appointment_repo.list(filter.patient_id.as_deref()).await?))
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::WriteAppointment)?;
    payload.slot.starts_at().map_err(AppError::Validation)?;

    let patient = state.patient_repo.find_by_id(&payload.patient_id).await?
        .ok_or_else(|| AppError::NotFound("Patient not found".into()))?;
    if payload.send_email && patient.email.as_deref().is_none_or(|e| e.trim().is_empty()) {
        return Err(AppError::Validation("Patient has no email address".into()));
    }

    let appointment = Appointment::new(&patient, payload.slot, Some(user.user_id.clone()));
    let created = state.appointment_repo.create(&appointment).await?;
    let details = format!("{} {} {}", created.patient_name, created.date, created.time);
    activity::record(state.activity_repo.as_ref(), &user, action::CREATED, "appointment", Some(&created.appointment_id), Some(details)).await;

    let email_sent = payload.send_email && state.notifier.send_confirmation(&created).await;
    info!("Created appointment {} (email sent: {})", created.appointment_id, email_sent);

    Ok(Json(AppointmentCreatedResponse { appointment: created, email_sent }))
}

pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(appointment_id): Path<String>,
    Json(payload): Json<AppointmentSlot>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::WriteAppointment)?;
    payload.starts_at().map_err(AppError::Validation)?;

    let mut appointment = state.appointment_repo.find_by_id(&appointment_id).await?
        .ok_or_else(|| AppError::NotFound("Appointment not found".into()))?;
    appointment.reschedule(payload);

    let updated = state.appointment_repo.update(&appointment).await?;
    activity::record(state.activity_repo.as_ref(), &user, action::UPDATED, "appointment", Some(&appointment_id), None).await;

    Ok(Json(updated))
}

pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(appointment_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::UpdateAppointmentStatus)?;
    let status: AppointmentStatus = payload.status.parse().map_err(AppError::Validation)?;

    if !state.appointment_repo.update_status(&appointment_id, status).await? {
        return Err(AppError::NotFound("Appointment not found".into()));
    }
    activity::record(state.activity_repo.as_ref(), &user, action::UPDATED, "appointment", Some(&appointment_id), Some(status.as_str().to_string())).await;

    Ok(Json(MessageResponse::new("Status updated")))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::DeleteAppointment)?;

    if !state.appointment_repo.delete(&appointment_id).await? {
        return Err(AppError::NotFound("Appointment not found".into()));
    }
    activity::record(state.activity_repo.as_ref(), &user, action::DELETED, "appointment", Some(&appointment_id), None).await;

    Ok(Json(MessageResponse::new("Appointment deleted")))
}
