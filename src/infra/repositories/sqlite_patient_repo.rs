use crate::domain::{models::patient::Patient, ports::{PatientRepository, SCAN_LIMIT}};
use crate::error::AppError;
use super::rows::PATIENT_COLUMNS;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePatientRepo {
    pool: SqlitePool,
}

impl SqlitePatientRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientRepository for SqlitePatientRepo {
    async fn create(&self, patient: &Patient) -> Result<Patient, AppError> {
        sqlx::query(
            r#"INSERT INTO patients (patient_id, first_name, last_name, phone, email, address, notes, birth_date, created_at, created_by)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
            .bind(&patient.patient_id)
            .bind(&patient.first_name)
            .bind(&patient.last_name)
            .bind(&patient.phone)
            .bind(&patient.email)
            .bind(&patient.address)
            .bind(&patient.notes)
            .bind(&patient.birth_date)
            .bind(patient.created_at)
            .bind(&patient.created_by)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(patient.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, AppError> {
        let sql = format!("SELECT {} FROM patients WHERE patient_id = ?", PATIENT_COLUMNS);
        sqlx::query_as::<_, Patient>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Patient>, AppError> {
        let sql = format!("SELECT {} FROM patients ORDER BY created_at DESC LIMIT ?", PATIENT_COLUMNS);
        sqlx::query_as::<_, Patient>(&sql)
            .bind(SCAN_LIMIT)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, patient: &Patient) -> Result<Patient, AppError> {
        sqlx::query(
            r#"UPDATE patients SET first_name = ?, last_name = ?, phone = ?, email = ?, address = ?, notes = ?, birth_date = ?
               WHERE patient_id = ?"#
        )
            .bind(&patient.first_name)
            .bind(&patient.last_name)
            .bind(&patient.phone)
            .bind(&patient.email)
            .bind(&patient.address)
            .bind(&patient.notes)
            .bind(&patient.birth_date)
            .bind(&patient.patient_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(patient.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM patients WHERE patient_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patients")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(count)
    }
}
