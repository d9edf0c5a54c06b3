use crate::domain::{models::activity::ActivityLog, ports::ActivityLogRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteActivityRepo {
    pool: SqlitePool,
}

impl SqliteActivityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogRepository for SqliteActivityRepo {
    async fn create(&self, log: &ActivityLog) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO activity_logs (log_id, user_id, user_name, action, entity_type, entity_id, details, logged_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#
        )
            .bind(&log.log_id)
            .bind(&log.user_id)
            .bind(&log.user_name)
            .bind(&log.action)
            .bind(&log.entity_type)
            .bind(&log.entity_id)
            .bind(&log.details)
            .bind(log.timestamp)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ActivityLog>, AppError> {
        sqlx::query_as::<_, ActivityLog>(
            r#"SELECT log_id, user_id, user_name, action, entity_type, entity_id, details, logged_at AS timestamp
               FROM activity_logs ORDER BY logged_at DESC LIMIT ?"#
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
