//! 扫描项目汇总
//!
//! 对所选扫描项目求总费用与预计总时长。结果只作为默认值
//! 填入登记单，操作员手工改价后不再以此为准。

use serde::{Deserialize, Serialize};
use vdc_core::{ScanCatalog, ScanId};

/// 扫描汇总结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanTotals {
    pub amount: f64,
    pub estimated_minutes: i64,
}

/// 汇总所选扫描项目
///
/// 目录由外部维护、可能滞后，未知 id 按零贡献处理并记录
/// 数据质量日志，不作为失败。
pub fn aggregate_scans(scan_ids: &[ScanId], catalog: &ScanCatalog) -> ScanTotals {
    let mut totals = ScanTotals {
        amount: 0.0,
        estimated_minutes: 0,
    };

    for &id in scan_ids {
        match catalog.get(id) {
            Some(info) => {
                totals.amount += info.charge;
                totals.estimated_minutes += info.estimated_minutes;
            }
            None => {
                tracing::warn!("scan id {} not in catalog, contributes zero", id);
            }
        }
    }

    totals
}
