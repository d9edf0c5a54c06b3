use tracing::warn;

use crate::domain::models::{
    appointment::Appointment,
    invoice::{Invoice, InvoiceItem},
    ledger::{CashInflow, CashOutflow},
    user::User,
};
use crate::error::AppError;
use super::rows::{AppointmentRow, InflowRow, InvoiceRow, OutflowRow, UserRow};

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            role: row.role.parse()?,
            user_id: row.user_id,
            email: row.email,
            name: row.name,
            picture: row.picture,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = String;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let items: Vec<InvoiceItem> = serde_json::from_str(&row.items_json)
            .map_err(|e| format!("invalid invoice items: {}", e))?;

        Ok(Invoice {
            currency: row.currency.parse()?,
            status: row.status.parse()?,
            items,
            invoice_id: row.invoice_id,
            invoice_number: row.invoice_number,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            subtotal: row.subtotal,
            tax_rate: row.tax_rate,
            tax_amount: row.tax_amount,
            total_amount: row.total_amount,
            issue_date: row.issue_date,
            due_date: row.due_date,
            notes: row.notes,
            created_at: row.created_at,
            created_by: row.created_by,
        })
    }
}

impl TryFrom<InflowRow> for CashInflow {
    type Error = String;

    fn try_from(row: InflowRow) -> Result<Self, Self::Error> {
        Ok(CashInflow {
            currency: row.currency.parse()?,
            payment_method: row.payment_method.parse()?,
            inflow_id: row.inflow_id,
            category: row.category,
            description: row.description,
            amount: row.amount,
            patient_id: row.patient_id,
            invoice_id: row.invoice_id,
            recorded_at: row.recorded_at,
            created_by: row.created_by,
        })
    }
}

impl TryFrom<OutflowRow> for CashOutflow {
    type Error = String;

    fn try_from(row: OutflowRow) -> Result<Self, Self::Error> {
        Ok(CashOutflow {
            currency: row.currency.parse()?,
            outflow_id: row.outflow_id,
            category: row.category,
            description: row.description,
            amount: row.amount,
            recorded_at: row.recorded_at,
            created_by: row.created_by,
        })
    }
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = String;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Appointment {
            status: row.status.parse()?,
            appointment_id: row.appointment_id,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            patient_email: row.patient_email,
            date: row.date,
            time: row.time,
            reason: row.reason,
            notes: row.notes,
            created_at: row.created_at,
            created_by: row.created_by,
        })
    }
}

pub fn items_to_json(items: &[InvoiceItem]) -> Result<String, AppError> {
    serde_json::to_string(items).map_err(|e| AppError::InternalWithMsg(format!("Failed to encode invoice items: {}", e)))
}

/// Single lookups refuse rows that do not map cleanly.
pub fn map_one<R, T>(row: Option<R>, table: &str) -> Result<Option<T>, AppError>
where
    T: TryFrom<R, Error = String>,
{
    row.map(|r| T::try_from(r).map_err(|e| AppError::InternalWithMsg(format!("Corrupt {} row: {}", table, e))))
        .transpose()
}

/// Listings drop rows that do not map cleanly and keep going.
pub fn map_all<R, T>(rows: Vec<R>, table: &str) -> Vec<T>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter()
        .filter_map(|r| match T::try_from(r) {
            Ok(mapped) => Some(mapped),
            Err(e) => {
                warn!("Skipping corrupt {} row: {}", table, e);
                None
            }
        })
        .collect()
}
