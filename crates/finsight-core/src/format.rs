//! Display formatting for money

use rust_decimal::Decimal;

/// Default currency symbol for display and prompts
pub const DEFAULT_CURRENCY: &str = "₹";

/// Format an amount in whole currency units with thousands separators
///
/// Rounds half to even, so `₹2,500` for 2500.5 and `₹2,502` for 2501.5.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp(0);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let grouped = group_thousands(&digits);
    if negative {
        format!("-{}{}", symbol, grouped)
    } else {
        format!("{}{}", symbol, grouped)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
