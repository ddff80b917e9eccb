use eduloan_core::amortization::{self, LoanInput};
use eduloan_core::chart::chart_series;
use eduloan_core::summary::summary_rows;
use eduloan_core::EduLoanError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Worked example
// ===========================================================================

fn four_year_course() -> LoanInput {
    LoanInput {
        fees: vec![
            Some(dec!(250_000)),
            Some(dec!(350_000)),
            Some(dec!(350_000)),
            Some(dec!(350_000)),
        ],
        rate_percent: dec!(10),
        repayment_years: 10,
    }
}

#[test]
fn test_four_year_course_figures() {
    let out = amortization::calculate_loan(&four_year_course()).unwrap();
    let r = &out.result;

    assert_eq!(r.total_principal, dec!(1_300_000));
    // 100k + 105k + 70k + 35k
    assert_eq!(r.total_interest_during_study, dec!(310_000));
    assert_eq!(r.total_loan, dec!(1_610_000));
    assert_eq!(r.emi.round_dp(2), dec!(21276.27));
    assert_eq!(r.total_repayment.round_dp(0), dec!(2_553_152));
    assert_eq!(r.total_emi_interest.round_dp(0), dec!(943_152));
    assert_eq!(r.total_interest.round_dp(0), dec!(1_253_152));
}

#[test]
fn test_disbursement_breakdown() {
    let r = amortization::compute(&four_year_course().fees, dec!(10), 10).unwrap();
    let accruals: Vec<(u32, u32, Decimal)> = r
        .disbursements
        .iter()
        .map(|d| (d.period, d.periods_accruing, d.interest_accrued))
        .collect();
    assert_eq!(
        accruals,
        vec![
            (0, 4, dec!(100_000)),
            (1, 3, dec!(105_000)),
            (2, 2, dec!(70_000)),
            (3, 1, dec!(35_000)),
        ]
    );
}

#[test]
fn test_renderers_agree_with_result() {
    let r = amortization::compute(&four_year_course().fees, dec!(10), 10).unwrap();

    let rows = summary_rows(&r);
    assert_eq!(rows[0].formatted, "₹13,00,000.00");
    assert_eq!(rows[1].formatted, "₹3,10,000.00");
    assert_eq!(rows[2].formatted, "₹16,10,000.00");
    assert_eq!(rows[3].formatted, "₹21,276.27");

    let series = chart_series(&r);
    assert_eq!(series[0].value, r.total_principal);
    assert_eq!(series[1].value, r.total_interest_during_study);
    assert_eq!(series[2].value, r.total_emi_interest);
}

#[test]
fn test_invalid_parameters_surface_field() {
    let mut input = four_year_course();
    input.repayment_years = 0;
    match amortization::calculate_loan(&input).unwrap_err() {
        EduLoanError::InvalidInput { field, .. } => assert_eq!(field, "repayment_years"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_oversized_fees_are_rejected_without_panicking() {
    let mut input = four_year_course();
    input.fees[0] = Some(Decimal::MAX);
    match amortization::calculate_loan(&input).unwrap_err() {
        EduLoanError::InvalidInput { field, .. } => assert_eq!(field, "fees"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }

    // A single huge tranche at zero rate still fits.
    let input = LoanInput {
        fees: vec![Some(dec!(1_000_000_000_000_000_000_000_000_000))],
        rate_percent: Decimal::ZERO,
        repayment_years: 1,
    };
    let out = amortization::calculate_loan(&input).unwrap();
    assert_eq!(out.result.total_loan, dec!(1_000_000_000_000_000_000_000_000_000));
}

#[test]
fn test_empty_schedule_zero_rate_is_well_defined() {
    let input = LoanInput {
        fees: vec![None; 4],
        rate_percent: Decimal::ZERO,
        repayment_years: 10,
    };
    let out = amortization::calculate_loan(&input).unwrap();
    assert_eq!(out.result.total_principal, Decimal::ZERO);
    assert_eq!(out.result.total_loan, Decimal::ZERO);
    assert_eq!(out.result.emi, Decimal::ZERO);
    assert_eq!(out.warnings.len(), 2);
}

// ===========================================================================
// Invariants
// ===========================================================================

fn fee_schedule() -> impl Strategy<Value = Vec<Option<u64>>> {
    prop::collection::vec(prop::option::of(0u64..5_000_000), 4)
}

proptest! {
    #[test]
    fn prop_study_interest_matches_tranche_formula(
        fees in fee_schedule(),
        rate_tenths in 0u32..=300,
        years in 1u32..=30,
    ) {
        let fees: Vec<Option<Decimal>> = fees.into_iter().map(|f| f.map(Decimal::from)).collect();
        let rate = Decimal::new(rate_tenths as i64, 1);
        let r = amortization::compute(&fees, rate, years).unwrap();

        let positive: Vec<Decimal> = fees.iter().flatten().copied().filter(|a| *a > Decimal::ZERO).collect();
        let k = positive.len();
        let expected: Decimal = positive
            .iter()
            .enumerate()
            .map(|(i, a)| a * rate / dec!(100) * Decimal::from(k - i))
            .sum();

        prop_assert_eq!(r.course_duration as usize, k);
        prop_assert_eq!(r.total_interest_during_study, expected);
    }

    #[test]
    fn prop_result_identities_hold(
        fees in fee_schedule(),
        rate_tenths in 0u32..=300,
        years in 1u32..=30,
    ) {
        let fees: Vec<Option<Decimal>> = fees.into_iter().map(|f| f.map(Decimal::from)).collect();
        let rate = Decimal::new(rate_tenths as i64, 1);
        let r = amortization::compute(&fees, rate, years).unwrap();

        prop_assert_eq!(r.total_loan, r.total_principal + r.total_interest_during_study);
        prop_assert_eq!(r.total_repayment, r.emi * Decimal::from(years * 12));
        prop_assert_eq!(r.total_interest, r.total_interest_during_study + r.total_emi_interest);
        prop_assert!(r.emi >= Decimal::ZERO);
        // Repaying never costs less than the capitalised loan.
        prop_assert!(r.total_emi_interest >= dec!(-0.01));
    }
}
