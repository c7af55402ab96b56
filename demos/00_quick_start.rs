/// quick start - compute the figures for one loan
use loan_book_rs::{AccrualEngine, RawLoanTerms};
use loan_book_rs::chrono::Utc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 10,000 lent at 2 per 100 per month for one year, 1,000 already paid
    let terms = RawLoanTerms::new()
        .principal("10000")
        .rate_per_unit("2")
        .period("1")
        .period_type("year")
        .start_date("2024-01-01")
        .partial_payment("1000");

    let result = AccrualEngine::new().compute_raw(&terms, Utc::now())?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
