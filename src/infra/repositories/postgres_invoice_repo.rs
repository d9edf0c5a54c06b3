use crate::domain::{
    models::invoice::{Invoice, InvoiceStatus},
    ports::{InvoiceRepository, SCAN_LIMIT},
};
use crate::error::AppError;
use super::mapper::{items_to_json, map_all, map_one};
use super::rows::{InvoiceRow, INVOICE_COLUMNS};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresInvoiceRepo {
    pool: PgPool,
}

impl PostgresInvoiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepo {
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        sqlx::query(
            r#"INSERT INTO invoices (invoice_id, invoice_number, patient_id, patient_name, items_json, subtotal, tax_rate,
                   tax_amount, total_amount, currency, status, issue_date, due_date, notes, created_at, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"#
        )
            .bind(&invoice.invoice_id)
            .bind(&invoice.invoice_number)
            .bind(&invoice.patient_id)
            .bind(&invoice.patient_name)
            .bind(items_to_json(&invoice.items)?)
            .bind(invoice.subtotal)
            .bind(invoice.tax_rate)
            .bind(invoice.tax_amount)
            .bind(invoice.total_amount)
            .bind(invoice.currency.as_str())
            .bind(invoice.status.as_str())
            .bind(&invoice.issue_date)
            .bind(&invoice.due_date)
            .bind(&invoice.notes)
            .bind(invoice.created_at)
            .bind(&invoice.created_by)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(invoice.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        let sql = format!("SELECT {} FROM invoices WHERE invoice_id = $1", INVOICE_COLUMNS);
        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        map_one(row, "invoices")
    }

    async fn list(&self, patient_id: Option<&str>) -> Result<Vec<Invoice>, AppError> {
        let rows = match patient_id {
            Some(pid) => {
                let sql = format!("SELECT {} FROM invoices WHERE patient_id = $1 ORDER BY created_at DESC LIMIT $2", INVOICE_COLUMNS);
                sqlx::query_as::<_, InvoiceRow>(&sql)
                    .bind(pid)
                    .bind(SCAN_LIMIT)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("SELECT {} FROM invoices ORDER BY created_at DESC LIMIT $1", INVOICE_COLUMNS);
                sqlx::query_as::<_, InvoiceRow>(&sql)
                    .bind(SCAN_LIMIT)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(AppError::Database)?;
        Ok(map_all(rows, "invoices"))
    }

    async fn update(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        sqlx::query(
            r#"UPDATE invoices SET invoice_number = $1, patient_id = $2, patient_name = $3, items_json = $4, subtotal = $5, tax_rate = $6,
                   tax_amount = $7, total_amount = $8, currency = $9, status = $10, issue_date = $11, due_date = $12, notes = $13
               WHERE invoice_id = $14"#
        )
            .bind(&invoice.invoice_number)
            .bind(&invoice.patient_id)
            .bind(&invoice.patient_name)
            .bind(items_to_json(&invoice.items)?)
            .bind(invoice.subtotal)
            .bind(invoice.tax_rate)
            .bind(invoice.tax_amount)
            .bind(invoice.total_amount)
            .bind(invoice.currency.as_str())
            .bind(invoice.status.as_str())
            .bind(&invoice.issue_date)
            .bind(&invoice.due_date)
            .bind(&invoice.notes)
            .bind(&invoice.invoice_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(invoice.clone())
    }

    async fn update_status(&self, id: &str, status: InvoiceStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE invoices SET status = $1 WHERE invoice_id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM invoices WHERE invoice_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self, status: InvoiceStatus) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM invoices WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(count)
    }
}
