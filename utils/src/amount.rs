//! Token amount display.

/// Insert `,` every three digits of an unsigned decimal string.
pub fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a raw on-chain amount using the registry's `decimals` and symbol.
///
/// The value is shifted exactly (no float rounding), trailing fractional
/// zeros are dropped and the integer part is grouped: `123456789` with 2
/// decimals and symbol `TOK` renders as `1,234,567.89 TOK`.
pub fn format_token_amount(raw: i128, decimals: u8, symbol: Option<&str>) -> String {
    let negative = raw < 0;
    let digits = raw.unsigned_abs().to_string();
    let decimals = usize::from(decimals);

    let (int_part, frac_part) = if decimals == 0 {
        (digits, String::new())
    } else if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{digits:0>decimals$}"))
    };
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(&int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    if let Some(symbol) = symbol.filter(|s| !s.is_empty()) {
        out.push(' ');
        out.push_str(symbol);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456789"), "123,456,789");
    }

    #[test]
    fn decimals_shift_exactly() {
        assert_eq!(format_token_amount(123_456_789, 2, Some("TOK")), "1,234,567.89 TOK");
        assert_eq!(format_token_amount(5, 8, None), "0.00000005");
        assert_eq!(format_token_amount(1_000, 3, None), "1");
    }

    #[test]
    fn negative_burn_is_visible() {
        assert_eq!(format_token_amount(-1_500, 0, Some("X")), "-1,500 X");
    }

    #[test]
    fn huge_supply_does_not_lose_precision() {
        let raw = i128::from(i64::MAX) * 4;
        assert_eq!(format_token_amount(raw, 0, None), group_thousands(&raw.to_string()));
    }
}
