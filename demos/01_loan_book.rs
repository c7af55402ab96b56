/// loan book - owner-scoped records, edits and the lender dashboard
use loan_book_rs::{
    BookConfig, InMemoryLoanStore, LoanBook, LoanView, NewLoanRequest, OwnerId, RawLoanTerms,
    UpdateLoanRequest,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BookConfig::from_json(r#"{ "overdue_grace_months": 1 }"#)?;
    let mut book = LoanBook::new(InMemoryLoanStore::new(), config)?;
    let owner = OwnerId::new("lender-anita");

    let loan = book.create_loan_now(
        &owner,
        NewLoanRequest::new(
            "Ravi",
            "98450 12345",
            "4th Cross, Jayanagar",
            "Anita",
            RawLoanTerms::new()
                .principal(25_000)
                .rate_per_unit(1.5)
                .period(18)
                .start_date("2024-03-01"),
        ),
    )?;

    book.create_loan_now(
        &owner,
        NewLoanRequest::new(
            "Meena",
            "98860 54321",
            "MG Road",
            "Anita",
            RawLoanTerms::new()
                .principal("8000")
                .rate_per_unit("2")
                .period("1")
                .period_type("year")
                .start_date("2024-05-15"),
        ),
    )?;

    println!("=== loan as created ===");
    println!("{}\n", LoanView::from(&loan).to_json_pretty()?);

    // borrower paid six months of interest up front
    let edit = UpdateLoanRequest::new(
        RawLoanTerms::new()
            .partial_payment("2250")
            .interest_period_type("month"),
    );
    let loan = book.update_loan_now(&owner, loan.id, edit)?;
    println!("=== after partial payment ===");
    println!("remaining interest: {}\n", loan.accrual.remaining_interest);

    println!("=== dashboard ===");
    println!("{}", serde_json::to_string_pretty(&book.dashboard()?)?);

    println!("\n=== events ===");
    for event in book.events.take_events() {
        println!("{:?}", event);
    }

    Ok(())
}
