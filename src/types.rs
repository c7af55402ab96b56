use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// opaque identity of the lender who owns a loan record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        OwnerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        OwnerId::new(s)
    }
}

/// unit a period count is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    #[default]
    Month,
    Year,
}

impl PeriodType {
    /// months in one period of this type
    pub fn months(&self) -> i64 {
        match self {
            PeriodType::Month => 1,
            PeriodType::Year => 12,
        }
    }

    /// `year` in any case selects years, everything else means months
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("year") {
            PeriodType::Year
        } else {
            PeriodType::Month
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodType::Month => f.write_str("month"),
            PeriodType::Year => f.write_str("year"),
        }
    }
}

/// loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// money is out and within its tenor
    #[default]
    Active,
    /// principal handed back to the lender
    Returned,
    /// tenor (plus grace) has run out without a return
    Overdue,
}

/// the person who took the loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub name: String,
    pub phone_number: String,
    pub alternative_number: Option<String>,
    pub address: String,
    /// reference to the signed loan document, e.g. an object-store url
    pub loan_document: Option<String>,
}

/// the person who gave the loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lender {
    pub name: String,
}
