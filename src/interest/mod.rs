pub mod accrual;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::terms::LoanTerms;

pub use accrual::{AccrualEngine, DAYS_PER_MONTH};

/// figures derived from a loan's terms at one evaluation time
///
/// Never edited in place: when terms change, the whole result is recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccrualResult {
    pub principal: Money,
    pub interest_per_month: Money,
    /// full-tenor interest, less any partial payment (floored at zero)
    pub total_interest: Money,
    /// principal plus full-tenor interest before any partial payment
    pub total_amount: Money,
    /// whole 30-day months since the start date; negative for a future start
    pub months_elapsed: i64,
    pub interest_for_elapsed_months: Money,
    pub total_amount_for_elapsed_months: Money,
    pub partial_payment: Money,
    pub remaining_interest: Money,
}

/// compute the accrual for `terms` as of `evaluation_time`
pub fn compute(terms: &LoanTerms, evaluation_time: DateTime<Utc>) -> Result<AccrualResult> {
    AccrualEngine::new().compute(terms, evaluation_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::types::PeriodType;
    use chrono::TimeZone;

    #[test]
    fn test_result_serializes_with_document_field_names() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let terms = LoanTerms::new(
            Money::from_major(10_000),
            Rate::from_units(2),
            12,
            PeriodType::Month,
            now,
        );

        let result = compute(&terms, now).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["interestPerMonth"], "200");
        assert_eq!(json["totalAmountForElapsedMonths"], "10000");
        assert_eq!(json["monthsElapsed"], 0);

        let back: AccrualResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
