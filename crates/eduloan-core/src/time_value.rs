use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::EduLoanError;
use crate::types::{Money, Rate};
use crate::EduLoanResult;

/// Convert a percentage rate (10 = 10%) to a decimal rate (0.10).
pub fn percent_to_rate(percent: Decimal) -> Rate {
    percent / dec!(100)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Simple (non-compounding) interest on `amount` for `periods` periods.
/// `None` when the result does not fit in a Decimal.
pub fn simple_interest(amount: Money, rate: Rate, periods: u32) -> Option<Money> {
    amount.checked_mul(rate)?.checked_mul(Decimal::from(periods))
}

/// Level payment that fully amortises `principal` over `nper` periods.
///
/// Standard annuity formula `P·r·(1+r)^n / ((1+r)^n − 1)`, evaluated as
/// `P·r / (1 − (1+r)^-n)` so the intermediate product never exceeds the
/// Decimal range on long, high-rate terms. A zero rate falls back to
/// straight-line repayment `P / n`.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> EduLoanResult<Money> {
    if nper == 0 {
        return Err(EduLoanError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if rate < Decimal::ZERO {
        return Err(EduLoanError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate cannot be negative".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound(rate, nper);
    let annuity_denominator = Decimal::ONE - Decimal::ONE / factor;

    if annuity_denominator.is_zero() {
        return Err(EduLoanError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|scaled| scaled.checked_div(annuity_denominator))
        .ok_or_else(|| {
            EduLoanError::invalid("principal", "Level payment exceeds the supported range.")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_basic() {
        assert_eq!(compound(dec!(0.10), 2), dec!(1.21));
        assert_eq!(compound(dec!(0.05), 0), Decimal::ONE);
    }

    #[test]
    fn test_simple_interest() {
        // 250k at 10% for 4 years
        assert_eq!(simple_interest(dec!(250_000), dec!(0.10), 4), Some(dec!(100_000)));
    }

    #[test]
    fn test_simple_interest_overflow() {
        assert_eq!(simple_interest(Decimal::MAX, dec!(2), 1), None);
        assert_eq!(simple_interest(Decimal::MAX, dec!(0.5), 3), None);
    }

    #[test]
    fn test_level_payment_basic() {
        // 100k at 1% per month over 12 months ≈ 8884.88
        let pmt = level_payment(dec!(100_000), dec!(0.01), 12).unwrap();
        assert!((pmt - dec!(8884.88)).abs() < dec!(0.01));
    }

    #[test]
    fn test_level_payment_zero_rate_is_straight_line() {
        let pmt = level_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(pmt, dec!(100));
    }

    #[test]
    fn test_level_payment_zero_principal() {
        let pmt = level_payment(Decimal::ZERO, dec!(0.01), 120).unwrap();
        assert_eq!(pmt, Decimal::ZERO);
    }

    #[test]
    fn test_level_payment_zero_periods_rejected() {
        let err = level_payment(dec!(1000), dec!(0.01), 0).unwrap_err();
        match err {
            EduLoanError::InvalidInput { field, .. } => assert_eq!(field, "nper"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_percent_to_rate() {
        assert_eq!(percent_to_rate(dec!(10)), dec!(0.10));
    }
}
