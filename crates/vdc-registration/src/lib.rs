//! # VDC登记模块
//!
//! 前台登记环节的三个计算构件：
//! - 登记号(CRO)生成：按日期定序的唯一登记号，存储不可用时降级为占位号
//! - 扫描汇总：所选项目的总费用与预计总时长
//! - 费用核算：应收 = 总额 - 已收 - 折扣，同时是路由付费闸门的依据

pub mod cro;
pub mod payment;
pub mod scans;

pub use cro::{fallback_cro, generate_cro, is_fallback_cro};
pub use payment::{is_settled, reconcile};
pub use scans::{aggregate_scans, ScanTotals};
