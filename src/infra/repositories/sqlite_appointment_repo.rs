use crate::domain::{
    models::appointment::{Appointment, AppointmentStatus},
    ports::{AppointmentRepository, LIST_LIMIT},
};
use crate::error::AppError;
use super::mapper::{map_all, map_one};
use super::rows::{AppointmentRow, APPOINTMENT_COLUMNS};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query(
            r#"INSERT INTO appointments (appointment_id, patient_id, patient_name, patient_email, appointment_date, appointment_time, reason, status, notes, created_at, created_by)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
            .bind(&appointment.appointment_id)
            .bind(&appointment.patient_id)
            .bind(&appointment.patient_name)
            .bind(&appointment.patient_email)
            .bind(&appointment.date)
            .bind(&appointment.time)
            .bind(&appointment.reason)
            .bind(appointment.status.as_str())
            .bind(&appointment.notes)
            .bind(appointment.created_at)
            .bind(&appointment.created_by)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(appointment.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        let sql = format!("SELECT {} FROM appointments WHERE appointment_id = ?", APPOINTMENT_COLUMNS);
        let row = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        map_one(row, "appointments")
    }

    async fn list(&self, patient_id: Option<&str>) -> Result<Vec<Appointment>, AppError> {
        let rows = match patient_id {
            Some(pid) => {
                let sql = format!("SELECT {} FROM appointments WHERE patient_id = ? ORDER BY appointment_date DESC, appointment_time DESC LIMIT ?", APPOINTMENT_COLUMNS);
                sqlx::query_as::<_, AppointmentRow>(&sql)
                    .bind(pid)
                    .bind(LIST_LIMIT)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("SELECT {} FROM appointments ORDER BY appointment_date DESC, appointment_time DESC LIMIT ?", APPOINTMENT_COLUMNS);
                sqlx::query_as::<_, AppointmentRow>(&sql)
                    .bind(LIST_LIMIT)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(AppError::Database)?;
        Ok(map_all(rows, "appointments"))
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query("UPDATE appointments SET appointment_date = ?, appointment_time = ?, reason = ?, notes = ? WHERE appointment_id = ?")
            .bind(&appointment.date)
            .bind(&appointment.time)
            .bind(&appointment.reason)
            .bind(&appointment.notes)
            .bind(&appointment.appointment_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(appointment.clone())
    }

    async fn update_status(&self, id: &str, status: AppointmentStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE appointments SET status = ? WHERE appointment_id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM appointments WHERE appointment_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
