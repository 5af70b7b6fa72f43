use rust_decimal::Decimal;
use serde::Serialize;

/// How a rendered insight should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Informational,
    Positive,
    Warning,
}

/// One rule-engine-derived statement about market conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub severity: Severity,
    pub text: String,
}

impl Insight {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

/// Renders a percentage change with an explicit sign and two decimals:
/// `+4.20%` for positive values, `-1.20%` for negative ones, and the
/// literal `0.00%` for zero.
pub fn signed_pct(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded.is_zero() {
        return "0.00%".to_string();
    }
    if rounded.is_sign_positive() {
        format!("+{rounded:.2}%")
    } else {
        format!("{rounded:.2}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_changes_carry_an_explicit_plus() {
        assert_eq!(signed_pct(dec!(4.2)), "+4.20%");
        assert_eq!(signed_pct(dec!(0.005)), "0.00%");
    }

    #[test]
    fn test_negative_changes_render_plainly() {
        assert_eq!(signed_pct(dec!(-1.2)), "-1.20%");
        assert_eq!(signed_pct(dec!(-0.004)), "0.00%");
    }

    #[test]
    fn test_zero_renders_as_the_literal() {
        assert_eq!(signed_pct(dec!(0)), "0.00%");
    }
}
