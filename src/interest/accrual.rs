use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::interest::AccrualResult;
use crate::terms::{LoanTerms, RawLoanTerms};

/// fixed month length used for elapsed time, not calendar accurate
pub const DAYS_PER_MONTH: i64 = 30;

const MILLIS_PER_MONTH: i64 = DAYS_PER_MONTH * 24 * 60 * 60 * 1000;

/// simple (non-compounding) interest engine
///
/// Stateless: every call is an independent computation from its arguments,
/// so one engine can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccrualEngine;

impl AccrualEngine {
    pub fn new() -> Self {
        AccrualEngine
    }

    /// whole 30-day months from `start` to `now`, floored
    ///
    /// 29 days gives 0, 30 days gives 1 and a start 10 days in the future
    /// gives -1.
    pub fn months_elapsed(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let delta = now - start;
        // num_milliseconds truncates toward zero, so a sub-millisecond
        // remainder before the boundary still has to pull the floor down
        let months = delta.num_milliseconds().div_euclid(MILLIS_PER_MONTH);
        if delta < Duration::milliseconds(months * MILLIS_PER_MONTH) {
            months - 1
        } else {
            months
        }
    }

    /// derive every accrual figure for `terms` as of `evaluation_time`
    pub fn compute(&self, terms: &LoanTerms, evaluation_time: DateTime<Utc>) -> Result<AccrualResult> {
        let principal = terms.principal;

        let months = terms
            .tenor_months()
            .ok_or_else(|| out_of_range("period"))?;

        let interest_per_month = terms
            .rate_per_unit
            .monthly_interest(principal)
            .ok_or_else(|| out_of_range("principal"))?;

        let mut total_interest = interest_per_month
            .checked_times(months)
            .ok_or_else(|| out_of_range("period"))?;

        let total_amount = principal
            .checked_add(total_interest)
            .ok_or_else(|| out_of_range("principal"))?;

        let months_elapsed = self.months_elapsed(terms.start_date, evaluation_time);

        let interest_for_elapsed_months = interest_per_month
            .checked_times(months_elapsed)
            .ok_or_else(|| out_of_range("startDate"))?;

        let total_amount_for_elapsed_months = principal
            .checked_add(interest_for_elapsed_months)
            .ok_or_else(|| out_of_range("startDate"))?;

        // the payment is credited against full-tenor interest, never below zero
        let remaining_interest = if terms.partial_payment.is_positive() {
            total_interest = total_interest
                .checked_sub(terms.partial_payment)
                .ok_or_else(|| out_of_range("partialPayment"))?
                .max(Money::ZERO);
            total_interest
        } else {
            Money::ZERO
        };

        debug!(
            principal = %principal,
            rate = %terms.rate_per_unit,
            months,
            months_elapsed,
            total_interest = %total_interest,
            remaining_interest = %remaining_interest,
            "computed accrual"
        );

        Ok(AccrualResult {
            principal,
            interest_per_month,
            total_interest,
            total_amount,
            months_elapsed,
            interest_for_elapsed_months,
            total_amount_for_elapsed_months,
            partial_payment: terms.partial_payment,
            remaining_interest,
        })
    }

    /// parse loosely typed terms, then compute
    pub fn compute_raw(&self, raw: &RawLoanTerms, evaluation_time: DateTime<Utc>) -> Result<AccrualResult> {
        let terms = raw.parse()?;
        self.compute(&terms, evaluation_time)
    }
}

fn out_of_range(field: &'static str) -> LoanError {
    LoanError::invalid(field, "result is outside the representable range")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::decimal::{checked_total, Rate};
    use crate::types::PeriodType;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn evaluation_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn loan(principal_cents: i64, rate_hundredths: i64, period: i64, days_ago: i64) -> LoanTerms {
        LoanTerms::new(
            Money::from_decimal(Decimal::new(principal_cents, 2)),
            Rate::per_hundred(Decimal::new(rate_hundredths, 2)),
            period,
            PeriodType::Month,
            evaluation_time() - Duration::days(days_ago),
        )
    }

    proptest! {
        #[test]
        fn zero_payment_leaves_interest_untouched(
            principal in 0i64..100_000_000i64,
            rate in 0i64..2_000i64,
            period in 0i64..600i64,
            days_ago in -400i64..4_000i64,
        ) {
            let t = loan(principal, rate, period, days_ago);
            let result = AccrualEngine::new().compute(&t, evaluation_time()).unwrap();

            prop_assert_eq!(result.remaining_interest, Money::ZERO);
            prop_assert_eq!(
                Some(result.total_interest),
                result.interest_per_month.checked_times(period)
            );
        }

        #[test]
        fn amount_identities_hold(
            principal in 0i64..100_000_000i64,
            rate in 0i64..2_000i64,
            period in 0i64..600i64,
            days_ago in -400i64..4_000i64,
            payment in 0i64..1_000_000i64,
        ) {
            let t = loan(principal, rate, period, days_ago)
                .with_partial_payment(Money::from_major(payment), PeriodType::Month);
            let result = AccrualEngine::new().compute(&t, evaluation_time()).unwrap();

            let pre_credit = result.interest_per_month.checked_times(period).unwrap();
            prop_assert_eq!(Some(result.total_amount), result.principal.checked_add(pre_credit));
            prop_assert_eq!(
                Some(result.total_amount_for_elapsed_months),
                result.principal.checked_add(result.interest_for_elapsed_months)
            );
            prop_assert!(!result.total_interest.is_negative());
        }

        #[test]
        fn longer_tenor_never_lowers_interest(
            principal in 0i64..100_000_000i64,
            rate in 0i64..2_000i64,
            period in 0i64..600i64,
            extra in 0i64..600i64,
        ) {
            let engine = AccrualEngine::new();
            let shorter = engine.compute(&loan(principal, rate, period, 0), evaluation_time()).unwrap();
            let longer = engine.compute(&loan(principal, rate, period + extra, 0), evaluation_time()).unwrap();

            prop_assert!(longer.total_interest >= shorter.total_interest);
        }

        #[test]
        fn payment_covering_interest_floors_at_zero(
            principal in 1i64..100_000_000i64,
            rate in 0i64..2_000i64,
            period in 0i64..600i64,
            surplus in 0i64..1_000_000i64,
        ) {
            let engine = AccrualEngine::new();
            let base = loan(principal, rate, period, 0);
            let pre_credit = engine.compute(&base, evaluation_time()).unwrap().total_interest;

            let paid = base.with_partial_payment(
                checked_total([pre_credit, Money::from_major(surplus), Money::ONE]).unwrap(),
                PeriodType::Month,
            );
            let result = engine.compute(&paid, evaluation_time()).unwrap();

            prop_assert_eq!(result.total_interest, Money::ZERO);
            prop_assert_eq!(result.remaining_interest, Money::ZERO);
        }

        #[test]
        fn compute_is_idempotent(
            principal in 0i64..100_000_000i64,
            rate in 0i64..2_000i64,
            period in 0i64..600i64,
            days_ago in -400i64..4_000i64,
        ) {
            let engine = AccrualEngine::new();
            let t = loan(principal, rate, period, days_ago);

            let first = engine.compute(&t, evaluation_time()).unwrap();
            let second = engine.compute(&t, evaluation_time()).unwrap();

            prop_assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
            prop_assert_eq!(first, second);
        }
    }
}
