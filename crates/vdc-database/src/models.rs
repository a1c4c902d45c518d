//! 数据库模型

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use vdc_core::{utils, Category, PatientRecord, PatientStatus, ScanStatus, SelectedScan};

// 数据库表模型 - 使用FromRow trait用于SQL查询

/// 数据库患者登记表
///
/// 金额列沿用旧存储的字符串形式，状态沿用旧整数编码，
/// 全部在 From 转换中解析为类型化值。
#[derive(Debug, FromRow)]
pub struct DbPatient {
    pub id: Uuid,
    pub cro: String,
    pub patient_name: String,
    pub hospital_id: i64,
    pub doctor_id: i64,
    pub registration_date: NaiveDate,
    pub scan_date: NaiveDate,
    pub category: String,
    pub selected_scans: String, // JSON编码的扫描清单
    pub total_amount: String,
    pub received_amount: String,
    pub discount_amount: String,
    pub due_amount: String,
    pub status_code: i16,
    pub routed_at: Option<DateTime<Utc>>,
    pub exam_started_at: Option<DateTime<Utc>>,
    pub exam_stopped_at: Option<DateTime<Utc>>,
    pub examination_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn parse_scans(raw: &str, cro: &str) -> Vec<SelectedScan> {
    match serde_json::from_str(raw) {
        Ok(scans) => scans,
        Err(e) => {
            tracing::warn!("unparseable scan list for {} ({}), treated as empty", cro, e);
            Vec::new()
        }
    }
}

impl From<DbPatient> for PatientRecord {
    fn from(db: DbPatient) -> Self {
        let selected_scans = parse_scans(&db.selected_scans, &db.cro);

        // Complete 不占用整数编码：全部扫描完成且录有检查编号即为终态
        let all_complete = !selected_scans.is_empty()
            && selected_scans.iter().all(|s| s.status == ScanStatus::Complete);
        let has_examination = db
            .examination_id
            .as_deref()
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false);
        let status = if all_complete && has_examination {
            PatientStatus::Complete
        } else {
            PatientStatus::from_code(db.status_code).unwrap_or_else(|| {
                tracing::warn!(
                    "unknown status code {} for {}, treated as Awaiting",
                    db.status_code,
                    db.cro
                );
                PatientStatus::Awaiting
            })
        };

        PatientRecord {
            id: db.id,
            cro: db.cro,
            patient_name: db.patient_name,
            hospital_id: db.hospital_id,
            doctor_id: db.doctor_id,
            registration_date: db.registration_date,
            scan_date: db.scan_date,
            category: Category::from_label(&db.category),
            selected_scans,
            total_amount: utils::parse_amount(&db.total_amount),
            received_amount: utils::parse_amount(&db.received_amount),
            discount_amount: utils::parse_amount(&db.discount_amount),
            due_amount: utils::parse_amount(&db.due_amount),
            status,
            routed_at: db.routed_at,
            exam_started_at: db.exam_started_at,
            exam_stopped_at: db.exam_stopped_at,
            examination_id: db.examination_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_patient() -> DbPatient {
        let now = Utc::now();
        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        DbPatient {
            id: Uuid::new_v4(),
            cro: "VDC/10-02-2024/1".to_string(),
            patient_name: "Asha Devi".to_string(),
            hospital_id: 1,
            doctor_id: 5,
            registration_date: date,
            scan_date: date,
            category: "GEN / Paid".to_string(),
            selected_scans: r#"[{"scan_id":3,"status":"Complete"},{"scan_id":7,"status":"Complete"}]"#
                .to_string(),
            total_amount: "3700".to_string(),
            received_amount: "3700.00".to_string(),
            discount_amount: "".to_string(),
            due_amount: "0".to_string(),
            status_code: 2,
            routed_at: Some(now),
            exam_started_at: Some(now),
            exam_stopped_at: Some(now),
            examination_id: Some("EX-100".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_string_amounts_parsed_with_zero_fallback() {
        let record = PatientRecord::from(db_patient());
        assert_eq!(record.total_amount, 3700.0);
        assert_eq!(record.received_amount, 3700.0);
        assert_eq!(record.discount_amount, 0.0);
        assert_eq!(record.due_amount, 0.0);
    }

    #[test]
    fn test_complete_is_derived_from_scan_completion() {
        let record = PatientRecord::from(db_patient());
        assert_eq!(record.status, PatientStatus::Complete);
    }

    #[test]
    fn test_numbered_status_without_completion() {
        let mut db = db_patient();
        db.selected_scans =
            r#"[{"scan_id":3,"status":"Complete"},{"scan_id":7,"status":"Pending"}]"#.to_string();
        db.examination_id = None;
        db.status_code = 4;

        let record = PatientRecord::from(db);
        assert_eq!(record.status, PatientStatus::Pending);
    }

    #[test]
    fn test_garbage_scan_list_treated_as_empty() {
        let mut db = db_patient();
        db.selected_scans = "not-json".to_string();
        db.status_code = 0;
        db.examination_id = None;

        let record = PatientRecord::from(db);
        assert!(record.selected_scans.is_empty());
        assert_eq!(record.status, PatientStatus::Awaiting);
    }

    #[test]
    fn test_unknown_status_code_defaults_to_awaiting() {
        let mut db = db_patient();
        db.status_code = 9;
        db.examination_id = None;

        let record = PatientRecord::from(db);
        assert_eq!(record.status, PatientStatus::Awaiting);
    }
}
