//! 渲染边界辅助
//!
//! 报表行内部以任意长度的有序扫描名序列表示；定宽补齐推迟到
//! 渲染边界，列数取同批渲染的所有行中的最大长度，不是逐行定宽。
//! 本模块只产出单元格数据，不产出任何标记语言。

use chrono::NaiveDate;

/// 汇总模式短行的占位单元格
pub const SUMMARY_PLACEHOLDER: &str = "..";

/// 同批渲染的扫描名列数 = 所有行的最大列表长度
pub fn scan_column_width<'a, I>(lists: I) -> usize
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    lists.into_iter().map(|names| names.len()).max().unwrap_or(0)
}

/// 把一行的扫描名补齐到批宽
///
/// 汇总模式占位符用 [`SUMMARY_PLACEHOLDER`]，明细模式传空串。
pub fn pad_names(names: &[String], width: usize, placeholder: &str) -> Vec<String> {
    let mut cells: Vec<String> = names.to_vec();
    while cells.len() < width {
        cells.push(placeholder.to_string());
    }
    cells
}

/// 表格输出中的金额恒为两位小数
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// 对外输出中的日期恒为 DD-MM-YYYY
pub fn format_date(date: NaiveDate) -> String {
    vdc_core::utils::format_date_dmy(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_width_is_batch_maximum() {
        let rows = vec![
            names(&["CT HEAD"]),
            names(&["CT HEAD", "CT CHEST", "CT ABDOMEN"]),
            names(&["CT CHEST", "CT ABDOMEN"]),
        ];
        assert_eq!(scan_column_width(rows.iter()), 3);
    }

    #[test]
    fn test_empty_batch_has_zero_width() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(scan_column_width(rows.iter()), 0);
    }

    #[test]
    fn test_padding_with_summary_placeholder() {
        let cells = pad_names(&names(&["CT HEAD"]), 3, SUMMARY_PLACEHOLDER);
        assert_eq!(cells, vec!["CT HEAD", "..", ".."]);
    }

    #[test]
    fn test_padding_with_empty_cell_for_detail() {
        let cells = pad_names(&names(&["CT HEAD", "CT CHEST"]), 3, "");
        assert_eq!(cells, vec!["CT HEAD", "CT CHEST", ""]);
    }

    #[test]
    fn test_full_row_is_untouched() {
        let row = names(&["A", "B", "C"]);
        assert_eq!(pad_names(&row, 3, SUMMARY_PLACEHOLDER), row);
    }

    #[test]
    fn test_amount_two_decimals() {
        assert_eq!(format_amount(7400.0), "7400.00");
        assert_eq!(format_amount(1234.5), "1234.50");
        assert_eq!(format_amount(-200.0), "-200.00");
    }

    #[test]
    fn test_outward_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        assert_eq!(format_date(date), "05-02-2024");
    }
}
