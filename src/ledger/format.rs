// src/ledger/format.rs — Money and chat text helpers

/// Render an amount as `$500` when whole, `$12.50` otherwise.
pub fn money(amount: f64) -> String {
    if (amount - amount.round()).abs() < 1e-9 {
        format!("${:.0}", amount.round())
    } else {
        format!("${amount:.2}")
    }
}

/// Render a profit/loss as `+$x`, `-$x` or `$0`.
pub fn signed_money(amount: f64) -> String {
    if amount.abs() < 1e-9 {
        "$0".to_string()
    } else if amount > 0.0 {
        format!("+{}", money(amount))
    } else {
        format!("-{}", money(-amount))
    }
}

/// Horizontal separator line.
pub fn rule(width: usize) -> String {
    "─".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_whole() {
        assert_eq!(money(500.0), "$500");
        assert_eq!(money(0.0), "$0");
    }

    #[test]
    fn test_money_fractional() {
        assert_eq!(money(12.5), "$12.50");
        assert_eq!(money(0.25), "$0.25");
    }

    #[test]
    fn test_signed_money() {
        assert_eq!(signed_money(1000.0), "+$1000");
        assert_eq!(signed_money(-500.0), "-$500");
        assert_eq!(signed_money(0.0), "$0");
        assert_eq!(signed_money(-0.0), "$0");
        assert_eq!(signed_money(-7.5), "-$7.50");
    }

    #[test]
    fn test_rule_width() {
        assert_eq!(rule(3), "───");
        assert_eq!(rule(30).chars().count(), 30);
    }
}
