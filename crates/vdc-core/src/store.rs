//! 患者记录存储契约
//!
//! 持久化本身是外部协作方，本核心只定义其数据契约：
//! 按登记号读写、按日期精确查询、按日期区间查询。

use crate::{PatientRecord, Result, VdcError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;

/// 患者记录存储接口
///
/// 登记号唯一性由存储层约束兜底，本核心不做串行化；
/// `insert` 在登记号冲突时必须返回 [`VdcError::DuplicateCro`]。
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// 统计某登记日期已存在的记录数（登记号序列的依据）
    async fn count_by_registration_date(&self, date: NaiveDate) -> Result<i64>;

    /// 插入新记录，登记号冲突返回 DuplicateCro
    async fn insert(&self, record: &PatientRecord) -> Result<()>;

    /// 按登记号整体更新记录
    async fn update(&self, record: &PatientRecord) -> Result<()>;

    /// 按登记号查找
    async fn get_by_cro(&self, cro: &str) -> Result<Option<PatientRecord>>;

    /// 某登记日期的全部记录
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<PatientRecord>>;

    /// 登记日期区间内的全部记录（含两端）
    async fn list_by_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<PatientRecord>>;
}

/// 内存实现，用于测试与演示
#[derive(Debug, Default)]
pub struct MemoryPatientStore {
    records: Mutex<Vec<PatientRecord>>,
}

impl MemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    async fn count_by_registration_date(&self, date: NaiveDate) -> Result<i64> {
        let records = self
            .records
            .lock()
            .map_err(|e| VdcError::Internal(e.to_string()))?;
        Ok(records
            .iter()
            .filter(|r| r.registration_date == date)
            .count() as i64)
    }

    async fn insert(&self, record: &PatientRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| VdcError::Internal(e.to_string()))?;
        if records.iter().any(|r| r.cro == record.cro) {
            return Err(VdcError::DuplicateCro(record.cro.clone()));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &PatientRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| VdcError::Internal(e.to_string()))?;
        match records.iter_mut().find(|r| r.cro == record.cro) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(VdcError::NotFound(format!(
                "patient record {} not found",
                record.cro
            ))),
        }
    }

    async fn get_by_cro(&self, cro: &str) -> Result<Option<PatientRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|e| VdcError::Internal(e.to_string()))?;
        Ok(records.iter().find(|r| r.cro == cro).cloned())
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<PatientRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|e| VdcError::Internal(e.to_string()))?;
        Ok(records
            .iter()
            .filter(|r| r.registration_date == date)
            .cloned()
            .collect())
    }

    async fn list_by_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<PatientRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|e| VdcError::Internal(e.to_string()))?;
        Ok(records
            .iter()
            .filter(|r| r.registration_date >= from && r.registration_date <= to)
            .cloned()
            .collect())
    }
}
