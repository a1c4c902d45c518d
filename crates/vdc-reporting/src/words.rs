//! 金额大写
//!
//! 把金额转换为英文大写，用于收据与汇总单打印。采用印度计数分组
//! （crore/lakh/thousand/hundred），不是西方的 billion/million 分组。
//! 对克若级以内的非负有限金额是纯函数。

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "Ten", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// 整数部分按印度分组递归展开
fn number_words(n: u64) -> String {
    if n < 20 {
        ONES[n as usize].to_string()
    } else if n < 100 {
        let tens = TENS[(n / 10) as usize];
        let rest = n % 10;
        if rest == 0 {
            tens.to_string()
        } else {
            format!("{} {}", tens, ONES[rest as usize])
        }
    } else if n < 1_000 {
        join_group(n, 100, "Hundred")
    } else if n < 100_000 {
        join_group(n, 1_000, "Thousand")
    } else if n < 10_000_000 {
        join_group(n, 100_000, "Lakh")
    } else {
        join_group(n, 10_000_000, "Crore")
    }
}

fn join_group(n: u64, unit: u64, unit_name: &str) -> String {
    let head = number_words(n / unit);
    let rest = n % unit;
    if rest == 0 {
        format!("{} {}", head, unit_name)
    } else {
        format!("{} {} {}", head, unit_name, number_words(rest))
    }
}

/// 金额 → 英文大写
///
/// 拆分为整卢比与两位小数的派萨；整卢比为零渲染为
/// "Zero Rupees"，派萨为零时不出现派萨从句，结尾恒为 "Only"。
/// 打印端按惯例再整体转大写。
pub fn to_words(amount: f64) -> String {
    let total_paise = (amount * 100.0).round() as u64;
    let rupees = total_paise / 100;
    let paise = total_paise % 100;

    let rupee_part = if rupees == 0 {
        "Zero Rupees".to_string()
    } else {
        format!("{} Rupees", number_words(rupees))
    };

    if paise == 0 {
        format!("{} Only", rupee_part)
    } else {
        format!("{} And {} Paisa Only", rupee_part, number_words(paise))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amount() {
        assert_eq!(to_words(0.0), "Zero Rupees Only");
    }

    #[test]
    fn test_whole_rupees_have_no_paisa_clause() {
        let words = to_words(100.0);
        assert_eq!(words, "One Hundred Rupees Only");
        assert!(!words.contains("Paisa"));
    }

    #[test]
    fn test_paisa_clause_when_nonzero() {
        assert_eq!(
            to_words(100.50),
            "One Hundred Rupees And Fifty Paisa Only"
        );
        assert_eq!(to_words(0.25), "Zero Rupees And Twenty Five Paisa Only");
    }

    #[test]
    fn test_teens_and_tens() {
        assert_eq!(to_words(14.0), "Fourteen Rupees Only");
        assert_eq!(to_words(40.0), "Forty Rupees Only");
        assert_eq!(to_words(99.0), "Ninety Nine Rupees Only");
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(to_words(1_000.0), "One Thousand Rupees Only");
        assert_eq!(
            to_words(12_345.0),
            "Twelve Thousand Three Hundred Forty Five Rupees Only"
        );
        assert_eq!(to_words(100_000.0), "One Lakh Rupees Only");
        assert_eq!(
            to_words(2_550_000.0),
            "Twenty Five Lakh Fifty Thousand Rupees Only"
        );
        assert_eq!(to_words(10_000_000.0), "One Crore Rupees Only");
        assert_eq!(
            to_words(12_345_678.0),
            "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight Rupees Only"
        );
    }

    #[test]
    fn test_hundred_with_remainder() {
        assert_eq!(to_words(305.0), "Three Hundred Five Rupees Only");
    }
}
