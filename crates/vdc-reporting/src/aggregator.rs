//! 报表聚合
//!
//! 把日期区间内的患者记录重组为报表行：
//! - 明细模式按 (医院, 分类) 分组，行内保留逐患者、逐扫描的有序清单
//! - 汇总模式按 (医院, 分类, 扫描组合码) 分组，相同检查组合的患者折叠为一行
//!
//! 行之上再计算总计与固定 25% 的机构免费份额分成。

use crate::bill;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vdc_core::{Category, HospitalDirectory, PatientRecord, ScanCatalog};

/// 机构免费份额占毛额的固定比例，报表导出的业务常数，本层不可配置
pub const FREE_SHARE_RATIO: f64 = 0.25;

/// 报表模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportMode {
    Detail,
    Summary,
}

/// 明细行中的单个患者
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailPatient {
    pub cro: String,
    pub patient_name: String,
    pub scan_names: Vec<String>, // 有序，驱动渲染端的列对齐
    pub scan_count: i64,
    pub amount: f64,
}

/// 明细行：每个 (医院, 分类) 一行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailRow {
    pub hospital: String,
    pub category: Category,
    pub patients: Vec<DetailPatient>,
    pub total_scans: i64,
    pub total_amount: f64,
}

/// 汇总行：每个 (医院, 分类, 扫描组合码) 一行
///
/// 组合码是派生键：该次到访的扫描 id 排序后以 `+` 连接（如 "3+7"），
/// 表示一组检查的组合而非单个项目。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub hospital: String,
    pub category: Category,
    pub scan_code: String,
    pub scan_names: Vec<String>,
    pub number_of_scans: i64,
    pub patient_count: i64,
    pub rate: f64, // 组合单价，随组合携带，不从 amount/patient_count 反推
    pub amount: f64,
}

/// 总计与机构分成
///
/// 免费份额与净应收对扫描数和金额各自独立套用同一比例。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GrandTotals {
    pub gross_scans: i64,
    pub gross_amount: f64,
    pub free_share_scans: f64,
    pub net_scans: f64,
    pub free_share_amount: f64,
    pub net_amount: f64,
}

impl GrandTotals {
    fn from_parts(gross_scans: i64, gross_amount: f64) -> Self {
        let free_share_scans = gross_scans as f64 * FREE_SHARE_RATIO;
        let free_share_amount = gross_amount * FREE_SHARE_RATIO;
        Self {
            gross_scans,
            gross_amount,
            free_share_scans,
            net_scans: gross_scans as f64 - free_share_scans,
            free_share_amount,
            net_amount: gross_amount - free_share_amount,
        }
    }
}

/// 报表行集合
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportRows {
    Detail(Vec<DetailRow>),
    Summary(Vec<SummaryRow>),
}

/// 一次报表请求的完整输出
///
/// 每次请求现算现用，构造后不再变更，渲染完即弃。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub report_date: NaiveDate,
    pub mode: ReportMode,
    pub rows: ReportRows,
    pub totals: GrandTotals,
    pub bill_label: String,
}

impl Report {
    /// 无匹配记录时为空，调用方必须渲染"无数据"提示而非空表壳
    pub fn is_empty(&self) -> bool {
        match &self.rows {
            ReportRows::Detail(rows) => rows.is_empty(),
            ReportRows::Summary(rows) => rows.is_empty(),
        }
    }
}

/// 构建报表
pub fn build_report(
    records: &[PatientRecord],
    catalog: &ScanCatalog,
    hospitals: &HospitalDirectory,
    mode: ReportMode,
    report_date: NaiveDate,
) -> Report {
    let rows = match mode {
        ReportMode::Detail => ReportRows::Detail(build_detail_rows(records, catalog, hospitals)),
        ReportMode::Summary => ReportRows::Summary(build_summary_rows(records, catalog, hospitals)),
    };

    let (gross_scans, gross_amount) = match &rows {
        ReportRows::Detail(rows) => rows
            .iter()
            .fold((0, 0.0), |(s, a), r| (s + r.total_scans, a + r.total_amount)),
        ReportRows::Summary(rows) => rows
            .iter()
            .fold((0, 0.0), |(s, a), r| (s + r.number_of_scans, a + r.amount)),
    };

    tracing::debug!(
        "built {:?} report: {} records, {} scans, amount {}",
        mode,
        records.len(),
        gross_scans,
        gross_amount
    );

    Report {
        report_date,
        mode,
        rows,
        totals: GrandTotals::from_parts(gross_scans, gross_amount),
        bill_label: bill::bill_label(report_date),
    }
}

/// 该次到访的扫描组合码：id 排序后以 `+` 连接
fn scan_code(record: &PatientRecord) -> String {
    let mut ids: Vec<i64> = record.selected_scans.iter().map(|s| s.scan_id).collect();
    ids.sort_unstable();
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("+")
}

fn scan_names(record: &PatientRecord, catalog: &ScanCatalog) -> Vec<String> {
    record
        .selected_scans
        .iter()
        .map(|s| catalog.name_of(s.scan_id))
        .collect()
}

fn build_detail_rows(
    records: &[PatientRecord],
    catalog: &ScanCatalog,
    hospitals: &HospitalDirectory,
) -> Vec<DetailRow> {
    let mut rows: Vec<DetailRow> = Vec::new();
    let mut index: HashMap<(i64, Category), usize> = HashMap::new();

    for record in records {
        let key = (record.hospital_id, record.category.clone());
        let row_index = *index.entry(key).or_insert_with(|| {
            rows.push(DetailRow {
                hospital: hospitals.name_of(record.hospital_id),
                category: record.category.clone(),
                patients: Vec::new(),
                total_scans: 0,
                total_amount: 0.0,
            });
            rows.len() - 1
        });

        let row = &mut rows[row_index];
        let scan_count = record.selected_scans.len() as i64;
        row.patients.push(DetailPatient {
            cro: record.cro.clone(),
            patient_name: record.patient_name.clone(),
            scan_names: scan_names(record, catalog),
            scan_count,
            amount: record.total_amount,
        });
        row.total_scans += scan_count;
        row.total_amount += record.total_amount;
    }

    rows
}

fn build_summary_rows(
    records: &[PatientRecord],
    catalog: &ScanCatalog,
    hospitals: &HospitalDirectory,
) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = Vec::new();
    let mut index: HashMap<(i64, Category, String), usize> = HashMap::new();

    for record in records {
        let code = scan_code(record);
        let key = (record.hospital_id, record.category.clone(), code.clone());
        let row_index = *index.entry(key).or_insert_with(|| {
            let mut sorted = record.selected_scans.clone();
            sorted.sort_unstable_by_key(|s| s.scan_id);
            rows.push(SummaryRow {
                hospital: hospitals.name_of(record.hospital_id),
                category: record.category.clone(),
                scan_code: code,
                scan_names: sorted.iter().map(|s| catalog.name_of(s.scan_id)).collect(),
                number_of_scans: 0,
                patient_count: 0,
                // 组合单价取该组合首见记录的总额
                rate: record.total_amount,
                amount: 0.0,
            });
            rows.len() - 1
        });

        let row = &mut rows[row_index];
        row.number_of_scans += record.selected_scans.len() as i64;
        row.patient_count += 1;
        row.amount += record.total_amount;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use vdc_core::{PatientStatus, ScanInfo, SelectedScan};

    fn catalog() -> ScanCatalog {
        let mut catalog = ScanCatalog::new();
        catalog.insert(
            3,
            ScanInfo {
                name: "CT HEAD".to_string(),
                charge: 1200.0,
                estimated_minutes: 10,
            },
        );
        catalog.insert(
            7,
            ScanInfo {
                name: "CT CHEST".to_string(),
                charge: 2500.0,
                estimated_minutes: 15,
            },
        );
        catalog
    }

    fn hospitals() -> HospitalDirectory {
        let mut dir = HospitalDirectory::new();
        dir.insert(1, "MG HOSPITAL");
        dir.insert(2, "CITY HOSPITAL");
        dir
    }

    fn record(
        cro: &str,
        hospital_id: i64,
        category: Category,
        scan_ids: &[i64],
        amount: f64,
    ) -> PatientRecord {
        let now = Utc::now();
        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        PatientRecord {
            id: Uuid::new_v4(),
            cro: cro.to_string(),
            patient_name: format!("Patient {}", cro),
            hospital_id,
            doctor_id: 1,
            registration_date: date,
            scan_date: date,
            category,
            selected_scans: scan_ids.iter().map(|&id| SelectedScan::new(id)).collect(),
            total_amount: amount,
            received_amount: amount,
            discount_amount: 0.0,
            due_amount: 0.0,
            status: PatientStatus::Complete,
            routed_at: None,
            exam_started_at: None,
            exam_stopped_at: None,
            examination_id: Some("EX-1".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()
    }

    #[test]
    fn test_summary_collapses_identical_combinations() {
        let records = vec![
            record("VDC/10-02-2024/1", 1, Category::GenPaid, &[7, 3], 3700.0),
            record("VDC/10-02-2024/2", 1, Category::GenPaid, &[3, 7], 3700.0),
        ];

        let report = build_report(
            &records,
            &catalog(),
            &hospitals(),
            ReportMode::Summary,
            date(),
        );
        let rows = match &report.rows {
            ReportRows::Summary(rows) => rows,
            _ => panic!("expected summary rows"),
        };

        // 相同医院/分类、相同排序组合 → 恰好折叠为一行
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].scan_code, "3+7");
        assert_eq!(rows[0].patient_count, 2);
        assert_eq!(rows[0].number_of_scans, 4);
        assert_eq!(rows[0].amount, 7400.0);
        assert_eq!(rows[0].rate, 3700.0);
        assert_eq!(rows[0].scan_names, vec!["CT HEAD", "CT CHEST"]);
    }

    #[test]
    fn test_summary_splits_on_hospital_and_combination() {
        let records = vec![
            record("VDC/10-02-2024/1", 1, Category::GenPaid, &[3], 1200.0),
            record("VDC/10-02-2024/2", 2, Category::GenPaid, &[3], 1200.0),
            record("VDC/10-02-2024/3", 1, Category::GenPaid, &[3, 7], 3700.0),
        ];

        let report = build_report(
            &records,
            &catalog(),
            &hospitals(),
            ReportMode::Summary,
            date(),
        );
        let rows = match &report.rows {
            ReportRows::Summary(rows) => rows,
            _ => panic!("expected summary rows"),
        };
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_detail_groups_by_hospital_and_category() {
        let records = vec![
            record("VDC/10-02-2024/1", 1, Category::GenPaid, &[3], 1200.0),
            record("VDC/10-02-2024/2", 1, Category::GenPaid, &[3, 7], 3700.0),
            record("VDC/10-02-2024/3", 1, Category::BplPoor, &[7], 2500.0),
        ];

        let report = build_report(
            &records,
            &catalog(),
            &hospitals(),
            ReportMode::Detail,
            date(),
        );
        let rows = match &report.rows {
            ReportRows::Detail(rows) => rows,
            _ => panic!("expected detail rows"),
        };

        assert_eq!(rows.len(), 2);
        let paid = &rows[0];
        assert_eq!(paid.hospital, "MG HOSPITAL");
        assert_eq!(paid.patients.len(), 2);
        assert_eq!(paid.total_scans, 3);
        assert_eq!(paid.total_amount, 4900.0);
        // 行内患者与其扫描名保持录入顺序
        assert_eq!(paid.patients[1].scan_names, vec!["CT HEAD", "CT CHEST"]);
    }

    #[test]
    fn test_net_receivable_split() {
        let records = vec![
            record("VDC/10-02-2024/1", 1, Category::GenPaid, &[3, 7], 3700.0),
            record("VDC/10-02-2024/2", 1, Category::GenPaid, &[3], 1200.0),
            record("VDC/10-02-2024/3", 2, Category::Rghs, &[7], 2500.0),
        ];

        let report = build_report(
            &records,
            &catalog(),
            &hospitals(),
            ReportMode::Summary,
            date(),
        );
        let totals = report.totals;

        assert_eq!(totals.gross_scans, 4);
        assert_eq!(totals.gross_amount, 7400.0);
        assert!((totals.net_amount - 7400.0 * 0.75).abs() < 0.005);
        assert!((totals.free_share_amount - 7400.0 * 0.25).abs() < 0.005);
        assert!((totals.net_scans - 3.0).abs() < 0.005);
        assert!((totals.free_share_scans - 1.0).abs() < 0.005);
    }

    #[test]
    fn test_empty_records_yield_empty_report() {
        let report = build_report(&[], &catalog(), &hospitals(), ReportMode::Detail, date());
        assert!(report.is_empty());
        assert_eq!(report.totals.gross_scans, 0);
        assert_eq!(report.totals.gross_amount, 0.0);
    }

    #[test]
    fn test_unknown_scan_gets_placeholder_name() {
        let records = vec![record(
            "VDC/10-02-2024/1",
            1,
            Category::GenPaid,
            &[99],
            500.0,
        )];
        let report = build_report(
            &records,
            &catalog(),
            &hospitals(),
            ReportMode::Summary,
            date(),
        );
        let rows = match &report.rows {
            ReportRows::Summary(rows) => rows,
            _ => panic!("expected summary rows"),
        };
        assert_eq!(rows[0].scan_names, vec!["SCAN-99"]);
    }
}
