use crate::domain::{models::exchange_rate::ExchangeRate, ports::ExchangeRateRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteExchangeRateRepo {
    pool: SqlitePool,
}

impl SqliteExchangeRateRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExchangeRateRepository for SqliteExchangeRateRepo {
    async fn current(&self) -> Result<Option<ExchangeRate>, AppError> {
        sqlx::query_as::<_, ExchangeRate>(
            "SELECT rate_id, eur_to_mkd, updated_at, updated_by FROM exchange_rates ORDER BY updated_at DESC LIMIT 1",
        )
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create(&self, rate: &ExchangeRate) -> Result<ExchangeRate, AppError> {
        sqlx::query("INSERT INTO exchange_rates (rate_id, eur_to_mkd, updated_at, updated_by) VALUES (?, ?, ?, ?)")
            .bind(&rate.rate_id)
            .bind(rate.eur_to_mkd)
            .bind(rate.updated_at)
            .bind(&rate.updated_by)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(rate.clone())
    }
}
