//! # VDC报表模块
//!
//! 把平铺的患者/交易记录重组为按医院/分类（汇总模式下再按扫描组合）
//! 分组的发票式报表行，计算固定比例的机构分成，并为打印输出提供
//! 金额大写、账单号与列宽对齐等渲染辅助。

pub mod aggregator;
pub mod bill;
pub mod render;
pub mod words;

// 重新导出主要类型
pub use aggregator::{
    build_report, DetailPatient, DetailRow, GrandTotals, Report, ReportMode, ReportRows,
    SummaryRow, FREE_SHARE_RATIO,
};
pub use bill::{bill_label, bill_number, BILL_NUMBER_OFFSET};
pub use render::{format_amount, pad_names, scan_column_width, SUMMARY_PLACEHOLDER};
pub use words::to_words;
