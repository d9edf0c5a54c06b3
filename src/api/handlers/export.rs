use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use crate::api::dtos::requests::ExportQuery;
use crate::api::extractors::auth::AuthUser;
use crate::domain::ports::SCAN_LIMIT;
use crate::domain::services::{
    export::{ExportFormat, ExportKind, ExportTable},
    role_policy::{authorize, Operation},
};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn export_data(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(format): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::Export)?;

    let format: ExportFormat = format.parse().map_err(AppError::Validation)?;
    let kind = match query.kind.as_deref() {
        Some(raw) => raw.parse::<ExportKind>().map_err(AppError::Validation)?,
        None => ExportKind::default(),
    };

    let table = match kind {
        ExportKind::Inflows => ExportTable::inflows(&state.ledger_repo.list_inflows(SCAN_LIMIT).await?),
        ExportKind::Outflows => ExportTable::outflows(&state.ledger_repo.list_outflows(SCAN_LIMIT).await?),
        ExportKind::Patients => ExportTable::patients(&state.patient_repo.list().await?),
        ExportKind::Invoices => ExportTable::invoices(&state.invoice_repo.list(None).await?),
    };

    info!("Exporting {} rows of {} as {}", table.rows.len(), kind.as_str(), format.extension());
    let disposition = format!("attachment; filename={}_export.{}", kind.as_str(), format.extension());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        table.render(format),
    ))
}
