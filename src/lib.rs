pub mod book;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod loan;
pub mod report;
pub mod store;
pub mod terms;
pub mod types;

// re-export key types
pub use book::LoanBook;
pub use config::BookConfig;
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use interest::{compute, AccrualEngine, AccrualResult, DAYS_PER_MONTH};
pub use loan::{Loan, NewLoanRequest, UpdateLoanRequest};
pub use report::{dashboard, BorrowerSummary, LenderSummary, LoanView};
pub use store::{InMemoryLoanStore, LoanStore};
pub use terms::{LoanTerms, NumericInput, RawLoanTerms};
pub use types::{Borrower, Lender, LoanId, LoanStatus, OwnerId, PeriodType};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
