/// time control - deterministic accrual with a test clock
use chrono::{Duration, TimeZone, Utc};
use loan_book_rs::{LoanBook, NewLoanRequest, OwnerId, RawLoanTerms, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let mut book = LoanBook::in_memory();
    let owner = OwnerId::new("lender-1");

    let loan = book.create_loan(
        &owner,
        NewLoanRequest::new(
            "Kiran",
            "90000 11111",
            "Indiranagar",
            "Suresh",
            RawLoanTerms::new()
                .principal("50000")
                .rate_per_unit("1")
                .period("6")
                .start_date("2024-01-01"),
        ),
        &time,
    )?;
    println!("loan created on {}", time.now().format("%Y-%m-%d"));
    println!("total payable over tenor: {}", loan.accrual.total_amount);

    // step through the tenor 30 days at a time
    for _ in 0..8 {
        controller.advance(Duration::days(30));
        let refreshed = book.refresh(&owner, &time);
        let loan = &refreshed[0];
        println!(
            "{}: {} months elapsed, {} accrued, status {:?}",
            time.now().format("%Y-%m-%d"),
            loan.accrual.months_elapsed,
            loan.accrual.interest_for_elapsed_months,
            loan.status,
        );
    }

    let returned = book.mark_returned(&owner, loan.id, &time)?;
    println!("\nfinal status: {:?}", returned.status);

    Ok(())
}
