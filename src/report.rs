//! Read-side views over stored loans.
//!
//! [`dashboard`] reproduces the per-lender rollup: principal summed per
//! (lender, borrower) pair, then per lender, with each lender's borrowers
//! listed largest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::decimal::{checked_total, Money, Rate};
use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::{Borrower, Lender, LoanId, LoanStatus, OwnerId, PeriodType};

/// principal lent to one borrower by one lender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerSummary {
    pub borrower_name: String,
    pub total_principal_amount: Money,
}

/// principal lent by one lender, broken down by borrower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderSummary {
    pub lender_name: String,
    pub total_principal: Money,
    pub borrowers: Vec<BorrowerSummary>,
}

/// roll up principal by lender and borrower
///
/// Lenders come out in name order. Borrowers are sorted by amount descending,
/// ties by name. A total that leaves Decimal's range is `AmountOverflow`.
pub fn dashboard(loans: &[Loan]) -> Result<Vec<LenderSummary>> {
    let mut by_lender: BTreeMap<&str, BTreeMap<&str, Money>> = BTreeMap::new();

    for loan in loans {
        let total = by_lender
            .entry(loan.lender.name.as_str())
            .or_default()
            .entry(loan.borrower.name.as_str())
            .or_default();
        *total = total
            .checked_add(loan.terms.principal)
            .ok_or(LoanError::AmountOverflow { context: "borrower principal total" })?;
    }

    by_lender
        .into_iter()
        .map(|(lender_name, borrowers)| {
            let mut borrowers: Vec<BorrowerSummary> = borrowers
                .into_iter()
                .map(|(name, amount)| BorrowerSummary {
                    borrower_name: name.to_string(),
                    total_principal_amount: amount,
                })
                .collect();
            borrowers.sort_by(|a, b| {
                b.total_principal_amount
                    .cmp(&a.total_principal_amount)
                    .then_with(|| a.borrower_name.cmp(&b.borrower_name))
            });

            let total_principal = checked_total(borrowers.iter().map(|b| b.total_principal_amount))
                .ok_or(LoanError::AmountOverflow { context: "lender principal total" })?;

            Ok(LenderSummary {
                lender_name: lender_name.to_string(),
                total_principal,
                borrowers,
            })
        })
        .collect()
}

/// flat view of a loan, laid out like the stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub id: LoanId,
    pub owner: OwnerId,
    pub borrower: Borrower,
    pub lender: Lender,
    pub principal: Money,
    pub rate_per_unit: Rate,
    pub period: i64,
    pub period_type: PeriodType,
    pub start_date: DateTime<Utc>,
    pub interest_per_month: Money,
    pub total_interest: Money,
    pub total_amount: Money,
    pub months_elapsed: i64,
    pub interest_for_elapsed_months: Money,
    pub total_amount_for_elapsed_months: Money,
    pub partial_payment: Money,
    pub interest_period_type: PeriodType,
    pub remaining_interest: Money,
    pub computed_at: DateTime<Utc>,
    pub status: LoanStatus,
    pub is_archived: bool,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        LoanView {
            id: loan.id,
            owner: loan.owner.clone(),
            borrower: loan.borrower.clone(),
            lender: loan.lender.clone(),
            principal: loan.terms.principal,
            rate_per_unit: loan.terms.rate_per_unit,
            period: loan.terms.period,
            period_type: loan.terms.period_type,
            start_date: loan.terms.start_date,
            interest_per_month: loan.accrual.interest_per_month,
            total_interest: loan.accrual.total_interest,
            total_amount: loan.accrual.total_amount,
            months_elapsed: loan.accrual.months_elapsed,
            interest_for_elapsed_months: loan.accrual.interest_for_elapsed_months,
            total_amount_for_elapsed_months: loan.accrual.total_amount_for_elapsed_months,
            partial_payment: loan.terms.partial_payment,
            interest_period_type: loan.terms.interest_period_type,
            remaining_interest: loan.accrual.remaining_interest,
            computed_at: loan.computed_at,
            status: loan.status,
            is_archived: loan.is_archived,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&Loan> for LoanView {
    fn from(loan: &Loan) -> Self {
        LoanView::from_loan(loan)
    }
}
