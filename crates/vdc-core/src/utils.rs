//! 通用工具函数

use chrono::NaiveDate;

/// 对外日期格式统一为 DD-MM-YYYY
pub fn format_date_dmy(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// 解析存储层送来的金额字符串
///
/// 旧存储中金额/计数以字符串形式出现，在边界处一次性解析，
/// 解析失败按 0 处理并记录数据质量日志，绝不把原始字符串带入运算。
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("unparseable amount '{}' treated as 0", raw);
            0.0
        }
    }
}

/// 解析存储层送来的计数字符串，失败按 0 处理
pub fn parse_count(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("unparseable count '{}' treated as 0", raw);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_dmy() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date_dmy(date), "07-03-2024");
    }

    #[test]
    fn test_parse_amount_fallback() {
        assert_eq!(parse_amount("1250.50"), 1250.50);
        assert_eq!(parse_amount("  300 "), 300.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("n/a"), 0.0);
        assert_eq!(parse_amount("-150"), -150.0);
    }

    #[test]
    fn test_parse_count_fallback() {
        assert_eq!(parse_count("3"), 3);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(""), 0);
    }
}
