//! 数据库查询操作

use crate::connection::DatabasePool;
use crate::models::DbPatient;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPool;
use sqlx::Row;
use vdc_core::{PatientRecord, PatientStore, Result, VdcError};

/// Postgres患者记录存储
pub struct PostgresPatientStore {
    pool: PgPool,
}

impl PostgresPatientStore {
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }

    /// 创建数据库表
    ///
    /// 登记号列上的唯一约束是并发登记冲突的最终裁决者。
    pub async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS patient_records (
                id UUID PRIMARY KEY,
                cro VARCHAR(64) UNIQUE NOT NULL,
                patient_name VARCHAR(255) NOT NULL,
                hospital_id BIGINT NOT NULL,
                doctor_id BIGINT NOT NULL,
                registration_date DATE NOT NULL,
                scan_date DATE NOT NULL,
                category VARCHAR(64) NOT NULL,
                selected_scans TEXT NOT NULL DEFAULT '[]',
                total_amount VARCHAR(32) NOT NULL DEFAULT '0',
                received_amount VARCHAR(32) NOT NULL DEFAULT '0',
                discount_amount VARCHAR(32) NOT NULL DEFAULT '0',
                due_amount VARCHAR(32) NOT NULL DEFAULT '0',
                status_code SMALLINT NOT NULL DEFAULT 0,
                routed_at TIMESTAMP WITH TIME ZONE,
                exam_started_at TIMESTAMP WITH TIME ZONE,
                exam_stopped_at TIMESTAMP WITH TIME ZONE,
                examination_id VARCHAR(64),
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| VdcError::Database(e.to_string()))?;

        self.create_indexes().await?;

        tracing::info!("database tables created successfully");
        Ok(())
    }

    /// 创建数据库索引
    async fn create_indexes(&self) -> Result<()> {
        let indexes = vec![
            "CREATE INDEX IF NOT EXISTS idx_patient_records_registration_date ON patient_records(registration_date)",
            "CREATE INDEX IF NOT EXISTS idx_patient_records_hospital_id ON patient_records(hospital_id)",
            "CREATE INDEX IF NOT EXISTS idx_patient_records_status_code ON patient_records(status_code)",
        ];

        for index_sql in indexes {
            sqlx::query(index_sql)
                .execute(&self.pool)
                .await
                .map_err(|e| VdcError::Database(e.to_string()))?;
        }

        tracing::info!("database indexes created successfully");
        Ok(())
    }

    fn map_insert_error(record: &PatientRecord, e: sqlx::Error) -> VdcError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return VdcError::DuplicateCro(record.cro.clone());
            }
        }
        VdcError::Database(e.to_string())
    }
}

#[async_trait]
impl PatientStore for PostgresPatientStore {
    async fn count_by_registration_date(&self, date: NaiveDate) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS record_count FROM patient_records WHERE registration_date = $1",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| VdcError::Unavailable(e.to_string()))?;

        Ok(row.get("record_count"))
    }

    async fn insert(&self, record: &PatientRecord) -> Result<()> {
        let scans_json = serde_json::to_string(&record.selected_scans)?;

        sqlx::query(
            r#"
            INSERT INTO patient_records (
                id, cro, patient_name, hospital_id, doctor_id,
                registration_date, scan_date, category, selected_scans,
                total_amount, received_amount, discount_amount, due_amount,
                status_code, routed_at, exam_started_at, exam_stopped_at,
                examination_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
        "#,
        )
        .bind(record.id)
        .bind(&record.cro)
        .bind(&record.patient_name)
        .bind(record.hospital_id)
        .bind(record.doctor_id)
        .bind(record.registration_date)
        .bind(record.scan_date)
        .bind(record.category.label())
        .bind(&scans_json)
        .bind(record.total_amount.to_string())
        .bind(record.received_amount.to_string())
        .bind(record.discount_amount.to_string())
        .bind(record.due_amount.to_string())
        .bind(record.status.code())
        .bind(record.routed_at)
        .bind(record.exam_started_at)
        .bind(record.exam_stopped_at)
        .bind(&record.examination_id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(record, e))?;

        Ok(())
    }

    async fn update(&self, record: &PatientRecord) -> Result<()> {
        let scans_json = serde_json::to_string(&record.selected_scans)?;

        let result = sqlx::query(
            r#"
            UPDATE patient_records SET
                patient_name = $2, hospital_id = $3, doctor_id = $4,
                registration_date = $5, scan_date = $6, category = $7,
                selected_scans = $8, total_amount = $9, received_amount = $10,
                discount_amount = $11, due_amount = $12, status_code = $13,
                routed_at = $14, exam_started_at = $15, exam_stopped_at = $16,
                examination_id = $17, updated_at = $18
            WHERE cro = $1
        "#,
        )
        .bind(&record.cro)
        .bind(&record.patient_name)
        .bind(record.hospital_id)
        .bind(record.doctor_id)
        .bind(record.registration_date)
        .bind(record.scan_date)
        .bind(record.category.label())
        .bind(&scans_json)
        .bind(record.total_amount.to_string())
        .bind(record.received_amount.to_string())
        .bind(record.discount_amount.to_string())
        .bind(record.due_amount.to_string())
        .bind(record.status.code())
        .bind(record.routed_at)
        .bind(record.exam_started_at)
        .bind(record.exam_stopped_at)
        .bind(&record.examination_id)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| VdcError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(VdcError::NotFound(format!(
                "patient record {} not found",
                record.cro
            )));
        }
        Ok(())
    }

    async fn get_by_cro(&self, cro: &str) -> Result<Option<PatientRecord>> {
        let result = sqlx::query_as::<_, DbPatient>("SELECT * FROM patient_records WHERE cro = $1")
            .bind(cro)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| VdcError::Database(e.to_string()))?;

        Ok(result.map(PatientRecord::from))
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<PatientRecord>> {
        let results = sqlx::query_as::<_, DbPatient>(
            "SELECT * FROM patient_records WHERE registration_date = $1 ORDER BY created_at",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VdcError::Database(e.to_string()))?;

        Ok(results.into_iter().map(PatientRecord::from).collect())
    }

    async fn list_by_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<PatientRecord>> {
        let results = sqlx::query_as::<_, DbPatient>(
            r#"
            SELECT * FROM patient_records
            WHERE registration_date BETWEEN $1 AND $2
            ORDER BY registration_date, created_at
        "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VdcError::Database(e.to_string()))?;

        Ok(results.into_iter().map(PatientRecord::from).collect())
    }
}
