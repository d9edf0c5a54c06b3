use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::responses::MessageResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{activity::action, patient::{Patient, PatientDetails}};
use crate::domain::services::{activity, role_policy::{authorize, Operation}};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

fn validate(details: &PatientDetails) -> Result<(), AppError> {
    if details.first_name.trim().is_empty() || details.last_name.trim().is_empty() {
        return Err(AppError::Validation("First and last name are required".into()));
    }
    Ok(())
}

pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ReadPatient)?;
    Ok(Json(state.patient_repo.list().await?))
}

pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ReadPatient)?;
    let patient = state.patient_repo.find_by_id(&patient_id).await?
        .ok_or_else(|| AppError::NotFound("Patient not found".into()))?;
    Ok(Json(patient))
}

pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<PatientDetails>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::WritePatient)?;
    validate(&payload)?;

    let patient = Patient::new(payload, Some(user.user_id.clone()));
    let created = state.patient_repo.create(&patient).await?;
    activity::record(state.activity_repo.as_ref(), &user, action::CREATED, "patient", Some(&created.patient_id), Some(created.full_name())).await;

    info!("Created patient {}", created.patient_id);
    Ok(Json(created))
}

pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(patient_id): Path<String>,
    Json(payload): Json<PatientDetails>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::WritePatient)?;
    validate(&payload)?;

    let mut patient = state.patient_repo.find_by_id(&patient_id).await?
        .ok_or_else(|| AppError::NotFound("Patient not found".into()))?;
    patient.apply(payload);
    let updated = state.patient_repo.update(&patient).await?;
    activity::record(state.activity_repo.as_ref(), &user, action::UPDATED, "patient", Some(&patient_id), None).await;

    Ok(Json(updated))
}

pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::DeletePatient)?;

    if !state.patient_repo.delete(&patient_id).await? {
        return Err(AppError::NotFound("Patient not found".into()));
    }
    activity::record(state.activity_repo.as_ref(), &user, action::DELETED, "patient", Some(&patient_id), None).await;

    info!("Deleted patient {}", patient_id);
    Ok(Json(MessageResponse::new("Patient deleted")))
}
