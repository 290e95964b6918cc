/// portfolio summary - dashboard cards across currencies
use chrono::{Duration, NaiveDate};
use loan_tracker_rs::{
    LedgerAction, Loan, LoanLedger, LoanStatus, Money, Payment, PaymentMethod, SafeTimeProvider,
    TimeSource, TrackerConfig,
};

fn loan(currency: &str, principal: i64, due: NaiveDate, paid: &[i64]) -> Loan {
    let mut loan = Loan::new(Money::from_major(principal), currency);
    loan.due_date = Some(due);
    loan.payments = paid
        .iter()
        .map(|amount| Payment::new(Money::from_major(*amount), None, PaymentMethod::Cash))
        .collect();
    loan
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let today = time.now().date_naive();

    let mut ledger = LoanLedger::new(TrackerConfig::default());
    ledger.dispatch(
        LedgerAction::LoadLoans(vec![
            loan("USD", 1_000, today + Duration::days(14), &[200, 200]),
            loan("USD", 2_500, today - Duration::days(3), &[500]),
            loan("USD", 800, today - Duration::days(40), &[800]),
            loan("KES", 150_000, today + Duration::days(60), &[]),
        ]),
        &time,
    )?;

    let summary = ledger.summary(&time);
    for (currency, totals) in &summary.by_currency {
        println!("{}:", currency);
        for status in LoanStatus::ALL {
            println!("   {:<8} {}", status.to_string(), totals.count(status));
        }
        println!("   principal    {}", totals.total_principal);
        println!("   repaid       {}", totals.total_repaid);
        println!("   outstanding  {}", totals.total_outstanding);
        println!("   overdue      {}", totals.overdue_outstanding);
        println!("   collected    {}", totals.collection_rate().round_half_up(2));
    }

    println!("\n{}", summary.to_json_pretty()?);
    Ok(())
}
