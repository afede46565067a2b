//! Human-facing number formatting shared by the console summaries and the
//! dashboards' first paint.

/// Groups the digits of a non-negative integer with commas: `1234567` →
/// `1,234,567`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Dollar amount with thousands separators and `decimals` fractional digits:
/// `money(1200.0, 2)` → `$1,200.00`.
pub fn money(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let grouped = int_part
        .parse::<u64>()
        .map(thousands)
        .unwrap_or_else(|_| int_part.to_string());
    match frac_part {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Ratio in `0..=1` rendered as a percentage: `percent(0.256, 1)` → `25.6%`.
pub fn percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn formats_money() {
        assert_eq!(money(1200.0, 2), "$1,200.00");
        assert_eq!(money(0.5, 2), "$0.50");
        assert_eq!(money(1_234_567.891, 0), "$1,234,568");
        assert_eq!(money(-42.0, 2), "-$42.00");
    }

    #[test]
    fn formats_percent() {
        assert_eq!(percent(0.256, 1), "25.6%");
        assert_eq!(percent(0.0, 1), "0.0%");
    }
}
