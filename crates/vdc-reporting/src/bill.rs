//! 账单号推导
//!
//! 账单号由报表日期确定性推导：距固定纪元日期的整天数加固定偏移。
//! 当计算结果恰好等于偏移常数本身（即报表日就是纪元日）时，
//! 渲染为特殊标签 `"<offset> (A)"`，这是显式的例外分支而非舍入产物。

use chrono::NaiveDate;

/// 账单号固定偏移常数
pub const BILL_NUMBER_OFFSET: i64 = 443;

/// 账单号纪元日期
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 4, 1).expect("valid epoch date")
}

/// 报表日期 → 账单号
pub fn bill_number(report_date: NaiveDate) -> i64 {
    (report_date - epoch()).num_days() + BILL_NUMBER_OFFSET
}

/// 报表日期 → 账单号标签
pub fn bill_label(report_date: NaiveDate) -> String {
    let number = bill_number(report_date);
    if number == BILL_NUMBER_OFFSET {
        format!("{} (A)", number)
    } else {
        number.to_string()
    }
}
