use crate::domain::{models::user::{Role, User}, ports::{UserRepository, LIST_LIMIT}};
use crate::error::AppError;
use super::mapper::{map_all, map_one};
use super::rows::{UserRow, USER_COLUMNS};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query(
            "INSERT INTO users (user_id, email, name, picture, role, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
            .bind(&user.user_id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.picture)
            .bind(user.role.as_str())
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        map_one(row, "users")
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        map_one(row, "users")
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at ASC LIMIT $1", USER_COLUMNS);
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(LIST_LIMIT)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(map_all(rows, "users"))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(count)
    }

    async fn update_profile(&self, id: &str, name: &str, picture: Option<&str>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET name = $1, picture = $2 WHERE user_id = $3")
            .bind(name)
            .bind(picture)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn update_role(&self, id: &str, role: Role) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET role = $1 WHERE user_id = $2")
            .bind(role.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres User Deletion Failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
