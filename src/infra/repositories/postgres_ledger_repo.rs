use crate::domain::{
    models::ledger::{CashInflow, CashOutflow},
    ports::LedgerRepository,
};
use crate::error::AppError;
use super::mapper::{map_all, map_one};
use super::rows::{InflowRow, OutflowRow, INFLOW_COLUMNS, OUTFLOW_COLUMNS};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresLedgerRepo {
    pool: PgPool,
}

impl PostgresLedgerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for PostgresLedgerRepo {
    async fn create_inflow(&self, inflow: &CashInflow) -> Result<CashInflow, AppError> {
        sqlx::query(
            r#"INSERT INTO inflows (inflow_id, category, description, amount, currency, payment_method, patient_id, invoice_id, recorded_at, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#
        )
            .bind(&inflow.inflow_id)
            .bind(&inflow.category)
            .bind(&inflow.description)
            .bind(inflow.amount)
            .bind(inflow.currency.as_str())
            .bind(inflow.payment_method.as_str())
            .bind(&inflow.patient_id)
            .bind(&inflow.invoice_id)
            .bind(&inflow.recorded_at)
            .bind(&inflow.created_by)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(inflow.clone())
    }

    async fn find_inflow(&self, id: &str) -> Result<Option<CashInflow>, AppError> {
        let sql = format!("SELECT {} FROM inflows WHERE inflow_id = $1", INFLOW_COLUMNS);
        let row = sqlx::query_as::<_, InflowRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        map_one(row, "inflows")
    }

    async fn list_inflows(&self, limit: i64) -> Result<Vec<CashInflow>, AppError> {
        let sql = format!("SELECT {} FROM inflows ORDER BY recorded_at DESC LIMIT $1", INFLOW_COLUMNS);
        let rows = sqlx::query_as::<_, InflowRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(map_all(rows, "inflows"))
    }

    async fn update_inflow(&self, inflow: &CashInflow) -> Result<CashInflow, AppError> {
        sqlx::query(
            r#"UPDATE inflows SET category = $1, description = $2, amount = $3, currency = $4, payment_method = $5, patient_id = $6, invoice_id = $7
               WHERE inflow_id = $8"#
        )
            .bind(&inflow.category)
            .bind(&inflow.description)
            .bind(inflow.amount)
            .bind(inflow.currency.as_str())
            .bind(inflow.payment_method.as_str())
            .bind(&inflow.patient_id)
            .bind(&inflow.invoice_id)
            .bind(&inflow.inflow_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(inflow.clone())
    }

    async fn delete_inflow(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM inflows WHERE inflow_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_outflow(&self, outflow: &CashOutflow) -> Result<CashOutflow, AppError> {
        sqlx::query(
            r#"INSERT INTO outflows (outflow_id, category, description, amount, currency, recorded_at, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#
        )
            .bind(&outflow.outflow_id)
            .bind(&outflow.category)
            .bind(&outflow.description)
            .bind(outflow.amount)
            .bind(outflow.currency.as_str())
            .bind(&outflow.recorded_at)
            .bind(&outflow.created_by)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(outflow.clone())
    }

    async fn find_outflow(&self, id: &str) -> Result<Option<CashOutflow>, AppError> {
        let sql = format!("SELECT {} FROM outflows WHERE outflow_id = $1", OUTFLOW_COLUMNS);
        let row = sqlx::query_as::<_, OutflowRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        map_one(row, "outflows")
    }

    async fn list_outflows(&self, limit: i64) -> Result<Vec<CashOutflow>, AppError> {
        let sql = format!("SELECT {} FROM outflows ORDER BY recorded_at DESC LIMIT $1", OUTFLOW_COLUMNS);
        let rows = sqlx::query_as::<_, OutflowRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(map_all(rows, "outflows"))
    }

    async fn update_outflow(&self, outflow: &CashOutflow) -> Result<CashOutflow, AppError> {
        sqlx::query("UPDATE outflows SET category = $1, description = $2, amount = $3, currency = $4 WHERE outflow_id = $5")
            .bind(&outflow.category)
            .bind(&outflow.description)
            .bind(outflow.amount)
            .bind(outflow.currency.as_str())
            .bind(&outflow.outflow_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(outflow.clone())
    }

    async fn delete_outflow(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM outflows WHERE outflow_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
