use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LoanError, Result};
use crate::interest::{AccrualEngine, AccrualResult};
use crate::terms::{LoanTerms, RawLoanTerms};
use crate::types::{Borrower, Lender, LoanId, LoanStatus, OwnerId};

/// a stored loan: its terms and the accrual last computed from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub owner: OwnerId,
    pub borrower: Borrower,
    pub lender: Lender,
    pub terms: LoanTerms,
    pub accrual: AccrualResult,
    /// evaluation time `accrual` was computed at
    pub computed_at: DateTime<Utc>,
    pub status: LoanStatus,
    pub is_archived: bool,
}

impl Loan {
    /// build an active loan, computing its accrual at `now`
    pub fn open(
        id: LoanId,
        owner: OwnerId,
        borrower: Borrower,
        lender: Lender,
        terms: LoanTerms,
        engine: &AccrualEngine,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let accrual = engine.compute(&terms, now)?;

        Ok(Self {
            id,
            owner,
            borrower,
            lender,
            terms,
            accrual,
            computed_at: now,
            status: LoanStatus::Active,
            is_archived: false,
        })
    }

    /// swap in new terms and their accrual; on error the loan is unchanged
    pub fn recompute(&mut self, terms: LoanTerms, engine: &AccrualEngine, now: DateTime<Utc>) -> Result<()> {
        let accrual = engine.compute(&terms, now)?;
        self.terms = terms;
        self.accrual = accrual;
        self.computed_at = now;
        Ok(())
    }

    /// true once elapsed months exceed the tenor plus `grace_months`
    pub fn is_past_tenor(&self, grace_months: i64) -> bool {
        match self.terms.tenor_months().and_then(|m| m.checked_add(grace_months)) {
            Some(limit) => self.accrual.months_elapsed > limit,
            None => false,
        }
    }

    pub fn is_returned(&self) -> bool {
        self.status == LoanStatus::Returned
    }

    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.owner == owner
    }
}

/// body of a create request, mirroring the flat form a client submits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoanRequest {
    pub borrower_name: Option<String>,
    pub borrower_phone_number: Option<String>,
    pub borrower_alternative_number: Option<String>,
    pub borrower_address: Option<String>,
    pub borrower_loan_document: Option<String>,
    pub lender_name: Option<String>,
    #[serde(flatten)]
    pub terms: RawLoanTerms,
}

impl NewLoanRequest {
    pub fn new(
        borrower_name: &str,
        borrower_phone_number: &str,
        borrower_address: &str,
        lender_name: &str,
        terms: RawLoanTerms,
    ) -> Self {
        Self {
            borrower_name: Some(borrower_name.to_string()),
            borrower_phone_number: Some(borrower_phone_number.to_string()),
            borrower_alternative_number: None,
            borrower_address: Some(borrower_address.to_string()),
            borrower_loan_document: None,
            lender_name: Some(lender_name.to_string()),
            terms,
        }
    }

    pub fn alternative_number(mut self, number: &str) -> Self {
        self.borrower_alternative_number = Some(number.to_string());
        self
    }

    pub fn loan_document(mut self, url: &str) -> Self {
        self.borrower_loan_document = Some(url.to_string());
        self
    }

    /// check the required party fields and split them out of the request
    pub fn parties(&self) -> Result<(Borrower, Lender)> {
        let borrower = Borrower {
            name: required(&self.borrower_name, "borrowerName")?,
            phone_number: required(&self.borrower_phone_number, "borrowerPhoneNumber")?,
            alternative_number: optional(&self.borrower_alternative_number),
            address: required(&self.borrower_address, "borrowerAddress")?,
            loan_document: optional(&self.borrower_loan_document),
        };
        let lender = Lender {
            name: required(&self.lender_name, "lenderName")?,
        };
        Ok((borrower, lender))
    }
}

/// body of an edit request; absent fields keep their stored values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLoanRequest {
    #[serde(flatten)]
    pub terms: RawLoanTerms,
}

impl UpdateLoanRequest {
    pub fn new(terms: RawLoanTerms) -> Self {
        Self { terms }
    }

    /// overlay the provided fields on `current`
    pub fn merged_with(&self, current: &LoanTerms) -> RawLoanTerms {
        let base = RawLoanTerms::from(current);
        let edit = self.terms.clone();

        RawLoanTerms {
            principal: edit.principal.or(base.principal),
            rate_per_unit: edit.rate_per_unit.or(base.rate_per_unit),
            period: edit.period.or(base.period),
            period_type: edit.period_type.or(base.period_type),
            start_date: edit.start_date.or(base.start_date),
            partial_payment: edit.partial_payment.or(base.partial_payment),
            interest_period_type: edit.interest_period_type.or(base.interest_period_type),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms == RawLoanTerms::default()
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(LoanError::MissingField { field }),
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::types::PeriodType;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn request() -> NewLoanRequest {
        NewLoanRequest::new(
            "Ravi",
            "+91 98450 00000",
            "12 MG Road",
            "Anita",
            RawLoanTerms::new()
                .principal("10000")
                .rate_per_unit("2")
                .period("12")
                .period_type("month")
                .start_date("2024-06-01"),
        )
    }

    fn open(request: &NewLoanRequest, at: DateTime<Utc>) -> Loan {
        let (borrower, lender) = request.parties().unwrap();
        Loan::open(
            Uuid::new_v4(),
            OwnerId::new("owner-1"),
            borrower,
            lender,
            request.terms.parse().unwrap(),
            &AccrualEngine::new(),
            at,
        )
        .unwrap()
    }

    #[test]
    fn test_parties_required() {
        let mut req = request();
        req.borrower_phone_number = Some("   ".to_string());
        assert_eq!(
            req.parties().unwrap_err(),
            LoanError::MissingField { field: "borrowerPhoneNumber" }
        );

        let mut req = request();
        req.lender_name = None;
        assert_eq!(req.parties().unwrap_err(), LoanError::MissingField { field: "lenderName" });
    }

    #[test]
    fn test_parties_optional_fields_trimmed() {
        let req = request().alternative_number(" 080 1234 ").loan_document("");
        let (borrower, _) = req.parties().unwrap();

        assert_eq!(borrower.alternative_number.as_deref(), Some("080 1234"));
        assert_eq!(borrower.loan_document, None);
    }

    #[test]
    fn test_request_deserializes_flat_body() {
        let json = r#"{
            "borrowerName": "Ravi",
            "borrowerPhoneNumber": "98450",
            "borrowerAddress": "12 MG Road",
            "lenderName": "Anita",
            "principal": 10000,
            "ratePerUnit": "2",
            "period": 1,
            "periodType": "year",
            "startDate": "2024-06-01"
        }"#;

        let req: NewLoanRequest = serde_json::from_str(json).unwrap();
        let terms = req.terms.parse().unwrap();

        assert_eq!(terms.period_type, PeriodType::Year);
        assert_eq!(terms.principal, Money::from_major(10_000));
    }

    #[test]
    fn test_open_computes_accrual() {
        let loan = open(&request(), now());

        assert_eq!(loan.status, LoanStatus::Active);
        assert!(!loan.is_archived);
        assert_eq!(loan.accrual.total_amount, Money::from_major(12_400));
        assert_eq!(loan.computed_at, now());
    }

    #[test]
    fn test_recompute_failure_leaves_loan_untouched() {
        let mut loan = open(&request(), now());
        let before = loan.clone();

        let bad = crate::terms::LoanTerms {
            principal: Money::from_decimal(rust_decimal::Decimal::MAX),
            ..loan.terms.clone()
        };
        assert!(loan.recompute(bad, &AccrualEngine::new(), now()).is_err());
        assert_eq!(loan, before);
    }

    #[test]
    fn test_update_merges_over_current_terms() {
        let loan = open(&request(), now());
        let update = UpdateLoanRequest::new(RawLoanTerms::new().partial_payment(500).interest_period_type("year"));

        let merged = update.merged_with(&loan.terms).parse().unwrap();

        assert_eq!(merged.principal, loan.terms.principal);
        assert_eq!(merged.period, 12);
        assert_eq!(merged.start_date, loan.terms.start_date);
        assert_eq!(merged.partial_payment, Money::from_major(500));
        assert_eq!(merged.interest_period_type, PeriodType::Year);
        assert!(UpdateLoanRequest::default().is_empty());
    }

    #[test]
    fn test_past_tenor_with_grace() {
        let late = open(&request(), now() + Duration::days(30 * 13));
        assert_eq!(late.accrual.months_elapsed, 13);
        assert!(late.is_past_tenor(0));
        assert!(!late.is_past_tenor(1));

        let on_time = open(&request(), now() + Duration::days(30 * 12));
        assert_eq!(on_time.accrual.months_elapsed, 12);
        assert!(!on_time.is_past_tenor(0));
    }
}
