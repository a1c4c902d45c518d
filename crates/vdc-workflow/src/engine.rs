//! 工作流引擎
//!
//! 协调登记号生成、扫描汇总、费用核算与患者状态机，
//! 对外提供前台与控制台动作的统一入口。

use crate::state_machine::{PatientEvent, PatientStateMachine};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use vdc_core::{
    Category, PatientRecord, PatientStatus, PatientStore, Result, ScanCatalog, ScanId, ScanStatus,
    SelectedScan, VdcError,
};
use vdc_registration::{aggregate_scans, fallback_cro, generate_cro, reconcile};

/// 前台登记请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegistration {
    pub patient_name: String,
    pub hospital_id: i64,
    pub doctor_id: i64,
    pub registration_date: NaiveDate,
    pub scan_date: NaiveDate,
    pub category: Category,
    pub scan_ids: Vec<ScanId>,
    pub received_amount: f64,
    pub discount_amount: f64,
    /// 操作员手工改价后的总额；None 时采用扫描汇总的默认值
    pub manual_total: Option<f64>,
}

/// 工作流引擎
pub struct WorkflowEngine {
    store: Arc<dyn PatientStore>,
    state_machine: PatientStateMachine,
}

impl WorkflowEngine {
    /// 创建新的工作流引擎
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self {
            store,
            state_machine: PatientStateMachine::new(),
        }
    }

    /// 获取状态机实例
    pub fn state_machine(&self) -> &PatientStateMachine {
        &self.state_machine
    }

    /// 前台登记新患者
    ///
    /// 登记号在唯一约束冲突时重试一次；计数不可得或重试仍冲突时
    /// 降级为占位登记号并告警，占位号不得被当作权威登记号。
    pub async fn register_patient(
        &self,
        registration: NewRegistration,
        catalog: &ScanCatalog,
    ) -> Result<PatientRecord> {
        if registration.scan_ids.is_empty() {
            return Err(VdcError::Validation(
                "registration requires at least one scan".to_string(),
            ));
        }

        let totals = aggregate_scans(&registration.scan_ids, catalog);
        let total_amount = registration.manual_total.unwrap_or(totals.amount);
        let due_amount = reconcile(
            total_amount,
            registration.received_amount,
            registration.discount_amount,
        );

        let now = Utc::now();
        let mut record = PatientRecord {
            id: Uuid::new_v4(),
            cro: String::new(),
            patient_name: registration.patient_name,
            hospital_id: registration.hospital_id,
            doctor_id: registration.doctor_id,
            registration_date: registration.registration_date,
            scan_date: registration.scan_date,
            category: registration.category,
            selected_scans: registration
                .scan_ids
                .iter()
                .map(|&id| SelectedScan::new(id))
                .collect(),
            total_amount,
            received_amount: registration.received_amount,
            discount_amount: registration.discount_amount,
            due_amount,
            status: PatientStatus::Awaiting,
            routed_at: None,
            exam_started_at: None,
            exam_stopped_at: None,
            examination_id: None,
            created_at: now,
            updated_at: now,
        };

        record.cro = self.assign_cro(&mut record).await?;
        tracing::info!(
            "registered patient {} with cro {} (due {})",
            record.patient_name,
            record.cro,
            record.due_amount
        );
        Ok(record)
    }

    /// 生成登记号并插入记录，处理冲突重试与降级
    async fn assign_cro(&self, record: &mut PatientRecord) -> Result<String> {
        let date = record.registration_date;

        let first = match generate_cro(date, self.store.as_ref()).await {
            Ok(cro) => cro,
            Err(e) => {
                tracing::warn!("cro count unavailable ({}), issuing fallback cro", e);
                return self.insert_with_fallback(record).await;
            }
        };

        record.cro = first.clone();
        match self.store.insert(record).await {
            Ok(()) => return Ok(first),
            Err(VdcError::DuplicateCro(cro)) => {
                tracing::warn!("cro {} raced with a concurrent registration, retrying", cro);
            }
            Err(e) => return Err(e),
        }

        // 并发冲突后重试一次，仍冲突则降级
        let second = generate_cro(date, self.store.as_ref()).await?;
        record.cro = second.clone();
        match self.store.insert(record).await {
            Ok(()) => Ok(second),
            Err(VdcError::DuplicateCro(_)) => self.insert_with_fallback(record).await,
            Err(e) => Err(e),
        }
    }

    async fn insert_with_fallback(&self, record: &mut PatientRecord) -> Result<String> {
        let cro = fallback_cro(record.registration_date);
        tracing::warn!("degraded registration: fallback cro {}", cro);
        record.cro = cro.clone();
        self.store.insert(record).await?;
        Ok(cro)
    }

    /// 前台"送护士站/控制台"
    ///
    /// 硬闸门：付费分类必须应收结清，否则拒绝且不改动任何持久状态。
    pub async fn send_to_console(&self, cro: &str) -> Result<PatientRecord> {
        let mut record = self.load(cro).await?;

        let next = self
            .state_machine
            .transition(&record.status, &PatientEvent::SendToConsole)?;

        if !PatientStateMachine::routing_allowed(&record.category, record.due_amount) {
            return Err(VdcError::TransitionRejected {
                from: format!("{:?}", record.status),
                event: format!("{:?}", PatientEvent::SendToConsole),
                reason: format!("due amount {} outstanding", record.due_amount),
            });
        }

        record.status = next;
        record.routed_at = Some(Utc::now());
        record.updated_at = Utc::now();
        self.store.update(&record).await?;

        tracing::info!("patient {} routed to console", record.cro);
        Ok(record)
    }

    /// 临床人员拒收，患者召回前台；本次到访不保留任何临床数据
    pub async fn send_back(&self, cro: &str) -> Result<PatientRecord> {
        let mut record = self.load(cro).await?;

        record.status = self
            .state_machine
            .transition(&record.status, &PatientEvent::SendBack)?;
        record.routed_at = None;
        record.updated_at = Utc::now();
        self.store.update(&record).await?;

        tracing::info!("patient {} sent back to reception", record.cro);
        Ok(record)
    }

    /// 被召回患者重新进入前台队列
    pub async fn re_register(&self, cro: &str) -> Result<PatientRecord> {
        let mut record = self.load(cro).await?;

        record.status = self
            .state_machine
            .transition(&record.status, &PatientEvent::ReRegister)?;
        record.updated_at = Utc::now();
        self.store.update(&record).await?;

        tracing::info!("patient {} re-entered reception queue", record.cro);
        Ok(record)
    }

    /// 控制台更新单个扫描项目的完成状态
    pub async fn update_scan_status(
        &self,
        cro: &str,
        scan_id: ScanId,
        status: ScanStatus,
    ) -> Result<PatientRecord> {
        let mut record = self.load(cro).await?;

        let scan = record
            .selected_scans
            .iter_mut()
            .find(|s| s.scan_id == scan_id)
            .ok_or_else(|| {
                VdcError::NotFound(format!("scan {} not selected for {}", scan_id, cro))
            })?;
        scan.status = status;
        record.updated_at = Utc::now();
        self.store.update(&record).await?;
        Ok(record)
    }

    /// 控制台结束检查
    ///
    /// 聚合闸门：每个扫描项目都完成才转 Complete，并盖起止时间与
    /// 检查编号(必填非空)；尚有未完成扫描则搁置为 Pending。
    pub async fn finalize(
        &self,
        cro: &str,
        examination_id: &str,
        started_at: DateTime<Utc>,
        stopped_at: DateTime<Utc>,
    ) -> Result<PatientRecord> {
        let mut record = self.load(cro).await?;

        // 形状校验：Finalize 只能从 InCorridorQueue / Pending 发起
        self.state_machine
            .transition(&record.status, &PatientEvent::Finalize)?;

        match PatientStateMachine::finalize_target(&record.selected_scans) {
            PatientStatus::Complete => {
                if examination_id.trim().is_empty() {
                    return Err(VdcError::Validation(
                        "examination id is required to complete a patient".to_string(),
                    ));
                }

                record.status = PatientStatus::Complete;
                record.exam_started_at = Some(started_at);
                record.exam_stopped_at = Some(stopped_at);
                record.examination_id = Some(examination_id.trim().to_string());
                record.updated_at = Utc::now();
                self.store.update(&record).await?;

                tracing::info!("patient {} complete, examination {}", cro, examination_id);
            }
            _ => {
                record.status = PatientStatus::Pending;
                record.updated_at = Utc::now();
                self.store.update(&record).await?;

                tracing::info!("patient {} parked pending, scans outstanding", cro);
            }
        }

        Ok(record)
    }

    async fn load(&self, cro: &str) -> Result<PatientRecord> {
        self.store
            .get_by_cro(cro)
            .await?
            .ok_or_else(|| VdcError::NotFound(format!("patient record {} not found", cro)))
    }
}
