//! 核心数据模型定义

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 扫描项目ID（外部目录维护）
pub type ScanId = i64;

/// 患者分类
///
/// 决定该患者在送往护士站/控制台前是否必须结清费用。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    GenPaid,       // GEN / Paid，自费
    BplPoor,       // BPL/POOR，免费
    SeniorCitizen, // Sn. CITIZEN，免费
    Rghs,          // RGHS，政府医保
    Aayushmaan,    // Aayushmaan，政府医保
    Other(String), // 目录外分类，保守按需付费处理
}

impl Category {
    /// 该分类在路由前是否要求付清费用
    pub fn requires_payment(&self) -> bool {
        match self {
            Category::GenPaid | Category::Other(_) => true,
            Category::BplPoor | Category::SeniorCitizen | Category::Rghs | Category::Aayushmaan => {
                false
            }
        }
    }

    /// 对外展示/存储用标签
    pub fn label(&self) -> &str {
        match self {
            Category::GenPaid => "GEN / Paid",
            Category::BplPoor => "BPL/POOR",
            Category::SeniorCitizen => "Sn. CITIZEN",
            Category::Rghs => "RGHS",
            Category::Aayushmaan => "Aayushmaan",
            Category::Other(label) => label,
        }
    }

    /// 从存储标签解析分类
    pub fn from_label(label: &str) -> Self {
        match label {
            "GEN / Paid" => Category::GenPaid,
            "BPL/POOR" => Category::BplPoor,
            "Sn. CITIZEN" => Category::SeniorCitizen,
            "RGHS" => Category::Rghs,
            "Aayushmaan" => Category::Aayushmaan,
            other => Category::Other(other.to_string()),
        }
    }
}

/// 患者状态
///
/// 旧系统以散落的小整数(0/2/3/4)编码，这里以命名枚举替代；
/// Complete 为终态，旧系统中以"全部扫描完成"表示而非编号状态。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PatientStatus {
    Awaiting,        // 前台等待 (0)
    InCorridorQueue, // 已送护士站/控制台 (2)
    Recall,          // 被召回前台 (3)
    Pending,         // 控制台搁置，尚有扫描未完成 (4)
    Complete,        // 全部扫描完成，终态
}

impl PatientStatus {
    /// 旧系统整数编码 → 状态（Complete 不由编码表示）
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(PatientStatus::Awaiting),
            2 => Some(PatientStatus::InCorridorQueue),
            3 => Some(PatientStatus::Recall),
            4 => Some(PatientStatus::Pending),
            _ => None,
        }
    }

    /// 状态 → 旧系统整数编码
    ///
    /// Complete 写回其最后一个编号状态(2)，读取端结合扫描完成情况还原。
    pub fn code(&self) -> i16 {
        match self {
            PatientStatus::Awaiting => 0,
            PatientStatus::InCorridorQueue | PatientStatus::Complete => 2,
            PatientStatus::Recall => 3,
            PatientStatus::Pending => 4,
        }
    }
}

/// 单个扫描项目的完成状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScanStatus {
    Pending,
    Complete,
}

/// 患者登记时选择的一个扫描项目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedScan {
    pub scan_id: ScanId,
    pub status: ScanStatus,
}

impl SelectedScan {
    pub fn new(scan_id: ScanId) -> Self {
        Self {
            scan_id,
            status: ScanStatus::Pending,
        }
    }
}

/// 患者登记记录
///
/// 由前台登记创建，前台可编辑，路由动作改写状态，
/// 控制台完成检查后封存。记录从不删除，只被状态变更覆盖。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: Uuid,
    pub cro: String, // 登记号，同一登记日期内唯一
    pub patient_name: String,
    pub hospital_id: i64,
    pub doctor_id: i64,
    pub registration_date: NaiveDate,
    pub scan_date: NaiveDate,
    pub category: Category,
    pub selected_scans: Vec<SelectedScan>,
    pub total_amount: f64,
    pub received_amount: f64,
    pub discount_amount: f64,
    pub due_amount: f64, // 不变式: due = total - received - discount
    pub status: PatientStatus,
    pub routed_at: Option<DateTime<Utc>>, // 进入护士站队列的时间戳
    pub exam_started_at: Option<DateTime<Utc>>,
    pub exam_stopped_at: Option<DateTime<Utc>>,
    pub examination_id: Option<String>, // 完成检查时操作员录入，非空
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientRecord {
    /// 全部扫描是否都已完成
    pub fn all_scans_complete(&self) -> bool {
        !self.selected_scans.is_empty()
            && self
                .selected_scans
                .iter()
                .all(|s| s.status == ScanStatus::Complete)
    }
}

/// 扫描目录条目（id → 名称、收费、预计时长）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanInfo {
    pub name: String,
    pub charge: f64,
    pub estimated_minutes: i64,
}

/// 扫描目录，外部维护，本核心只读
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanCatalog {
    entries: HashMap<ScanId, ScanInfo>,
}

impl ScanCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ScanId, info: ScanInfo) {
        self.entries.insert(id, info);
    }

    pub fn get(&self, id: ScanId) -> Option<&ScanInfo> {
        self.entries.get(&id)
    }

    /// 目录缺失时返回占位名称，不中断报表
    pub fn name_of(&self, id: ScanId) -> String {
        match self.entries.get(&id) {
            Some(info) => info.name.clone(),
            None => format!("SCAN-{}", id),
        }
    }
}

/// 医院目录（id → 展示名），外部维护，本核心只读
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HospitalDirectory {
    entries: HashMap<i64, String>,
}

impl HospitalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i64, name: impl Into<String>) {
        self.entries.insert(id, name.into());
    }

    pub fn name_of(&self, id: i64) -> String {
        match self.entries.get(&id) {
            Some(name) => name.clone(),
            None => format!("HOSPITAL-{}", id),
        }
    }
}
