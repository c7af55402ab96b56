//! Loan terms as they arrive from a caller and as the calculator consumes them.
//!
//! Request bodies are loosely typed: a principal may come in as `10000`,
//! `"10000"` or `"1e4"`. [`RawLoanTerms`] accepts all of those and
//! [`RawLoanTerms::parse`] turns them into a typed [`LoanTerms`] in one
//! validation step, failing with [`LoanError::InvalidInput`] naming the field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::PeriodType;

/// a numeric field that may be sent as a json number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    /// parse to a decimal; decimals have no NaN or infinity so any success is finite
    pub fn to_decimal(&self, field: &'static str) -> Result<Decimal> {
        match self {
            NumericInput::Number(n) => parse_decimal(&n.to_string(), field),
            NumericInput::Text(s) => parse_decimal(s, field),
        }
    }

    /// true for an empty or whitespace-only string
    fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        NumericInput::Text(s.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(s: String) -> Self {
        NumericInput::Text(s)
    }
}

impl From<i32> for NumericInput {
    fn from(i: i32) -> Self {
        NumericInput::Number(i.into())
    }
}

impl From<i64> for NumericInput {
    fn from(i: i64) -> Self {
        NumericInput::Number(i.into())
    }
}

impl From<f64> for NumericInput {
    fn from(f: f64) -> Self {
        match serde_json::Number::from_f64(f) {
            Some(n) => NumericInput::Number(n),
            // NaN and infinities have no json form; keep them so parsing rejects them
            None => NumericInput::Text(f.to_string()),
        }
    }
}

impl From<Decimal> for NumericInput {
    fn from(d: Decimal) -> Self {
        NumericInput::Text(d.to_string())
    }
}

fn parse_decimal(text: &str, field: &'static str) -> Result<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LoanError::invalid(field, "expected a number, got an empty value"));
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LoanError::invalid(field, format!("'{}' is not a valid number", trimmed)))
}

/// parse a calendar date; a bare `YYYY-MM-DD` is midnight utc
pub fn parse_start_date(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(LoanError::invalid(
        "startDate",
        format!("'{}' is not a valid calendar date", trimmed),
    ))
}

/// typed loan terms, the calculator's input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub principal: Money,
    pub rate_per_unit: Rate,
    /// agreed tenor, counted in `period_type` units
    pub period: i64,
    pub period_type: PeriodType,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub partial_payment: Money,
    #[serde(default, alias = "paymentPeriodType")]
    pub interest_period_type: PeriodType,
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        rate_per_unit: Rate,
        period: i64,
        period_type: PeriodType,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            principal,
            rate_per_unit,
            period,
            period_type,
            start_date,
            partial_payment: Money::ZERO,
            interest_period_type: PeriodType::Month,
        }
    }

    /// record a payment already made toward interest
    pub fn with_partial_payment(mut self, amount: Money, interest_period_type: PeriodType) -> Self {
        self.partial_payment = amount;
        self.interest_period_type = interest_period_type;
        self
    }

    /// tenor normalized to months; `None` if it does not fit an i64
    pub fn tenor_months(&self) -> Option<i64> {
        self.period.checked_mul(self.period_type.months())
    }
}

/// loan terms exactly as a caller sent them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLoanTerms {
    pub principal: Option<NumericInput>,
    pub rate_per_unit: Option<NumericInput>,
    pub period: Option<NumericInput>,
    pub period_type: Option<String>,
    pub start_date: Option<String>,
    pub partial_payment: Option<NumericInput>,
    #[serde(alias = "paymentPeriodType")]
    pub interest_period_type: Option<String>,
}

impl RawLoanTerms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, value: impl Into<NumericInput>) -> Self {
        self.principal = Some(value.into());
        self
    }

    pub fn rate_per_unit(mut self, value: impl Into<NumericInput>) -> Self {
        self.rate_per_unit = Some(value.into());
        self
    }

    pub fn period(mut self, value: impl Into<NumericInput>) -> Self {
        self.period = Some(value.into());
        self
    }

    pub fn period_type(mut self, value: &str) -> Self {
        self.period_type = Some(value.to_string());
        self
    }

    pub fn start_date(mut self, value: &str) -> Self {
        self.start_date = Some(value.to_string());
        self
    }

    pub fn partial_payment(mut self, value: impl Into<NumericInput>) -> Self {
        self.partial_payment = Some(value.into());
        self
    }

    pub fn interest_period_type(mut self, value: &str) -> Self {
        self.interest_period_type = Some(value.to_string());
        self
    }

    /// parse with `month` as the default for both period types
    pub fn parse(&self) -> Result<LoanTerms> {
        self.parse_with_defaults(PeriodType::Month, PeriodType::Month)
    }

    /// parse, using the given period types when the caller sent none
    pub fn parse_with_defaults(
        &self,
        default_period_type: PeriodType,
        default_interest_period_type: PeriodType,
    ) -> Result<LoanTerms> {
        let principal = required(&self.principal, "principal")?.to_decimal("principal")?;
        let rate = required(&self.rate_per_unit, "ratePerUnit")?.to_decimal("ratePerUnit")?;
        let period = required(&self.period, "period")?.to_decimal("period")?;
        let period = period
            .trunc()
            .to_i64()
            .ok_or_else(|| LoanError::invalid("period", "period is out of range"))?;

        let start_date = match &self.start_date {
            Some(text) => parse_start_date(text)?,
            None => return Err(LoanError::invalid("startDate", "missing value")),
        };

        let partial_payment = match &self.partial_payment {
            None => Decimal::ZERO,
            Some(input) if input.is_blank() => Decimal::ZERO,
            Some(input) => input.to_decimal("partialPayment")?,
        };

        let period_type = self
            .period_type
            .as_deref()
            .map(PeriodType::parse_lenient)
            .unwrap_or(default_period_type);
        let interest_period_type = self
            .interest_period_type
            .as_deref()
            .map(PeriodType::parse_lenient)
            .unwrap_or(default_interest_period_type);

        Ok(LoanTerms {
            principal: Money::from_decimal(principal),
            rate_per_unit: Rate::per_hundred(rate),
            period,
            period_type,
            start_date,
            partial_payment: Money::from_decimal(partial_payment),
            interest_period_type,
        })
    }
}

impl From<&LoanTerms> for RawLoanTerms {
    fn from(terms: &LoanTerms) -> Self {
        RawLoanTerms {
            principal: Some(terms.principal.as_decimal().into()),
            rate_per_unit: Some(terms.rate_per_unit.as_per_hundred().into()),
            period: Some(terms.period.into()),
            period_type: Some(terms.period_type.to_string()),
            start_date: Some(terms.start_date.to_rfc3339()),
            partial_payment: Some(terms.partial_payment.as_decimal().into()),
            interest_period_type: Some(terms.interest_period_type.to_string()),
        }
    }
}

fn required<'a>(value: &'a Option<NumericInput>, field: &'static str) -> Result<&'a NumericInput> {
    value
        .as_ref()
        .ok_or_else(|| LoanError::invalid(field, "missing value"))
}
