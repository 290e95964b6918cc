/// time control - deterministic status transitions with controlled time
use chrono::{Duration, TimeZone, Utc};
use loan_tracker_rs::{
    LedgerAction, Loan, LoanLedger, Money, Payment, PaymentMethod, RepaymentCycle, SafeTimeProvider,
    TimeSource, TrackerConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().ok_or("test time source required")?;

    // 3,000 repaid over 3 monthly installments
    let mut loan = Loan::new(Money::from_major(3_000), "USD");
    loan.borrower_name = Some("Joseph Okello".to_string());
    let schedule = loan.plan_installments(3, time.now().date_naive() + Duration::days(30), RepaymentCycle::Monthly);
    let loan_id = loan.id;

    let mut ledger = LoanLedger::new(TrackerConfig::default());
    ledger.dispatch(LedgerAction::LoadLoans(vec![loan]), &time)?;
    println!("1. loaded, due {:?}: {}", ledger.get(loan_id).and_then(|l| l.due_date), ledger.balance(loan_id, &time)?.status);

    // pay the first two installments on time
    for installment in schedule.installments.iter().take(2) {
        controller.advance(Duration::days(30));
        let payment = Payment::new(installment.amount, Some(time.now().date_naive()), PaymentMethod::BankTransfer);
        ledger.dispatch(LedgerAction::RecordPayment { loan_id, payment }, &time)?;
        let balance = ledger.balance(loan_id, &time)?;
        println!(
            "   paid #{}: remaining {}, status {}",
            installment.installment_number, balance.remaining_balance, balance.status
        );
    }

    // miss the last due date
    controller.advance(Duration::days(35));
    let balance = ledger.balance(loan_id, &time)?;
    println!("2. after missing the final due date: {} ({} days overdue)", balance.status, balance.days_overdue());

    // settle late
    let payment = Payment::new(balance.remaining_balance, Some(time.now().date_naive()), PaymentMethod::Cash);
    ledger.dispatch(LedgerAction::RecordPayment { loan_id, payment }, &time)?;
    println!("3. after settling: {}", ledger.balance(loan_id, &time)?.status);

    println!("\nevents:");
    for event in ledger.events.for_loan(loan_id) {
        println!("   {:?}", event);
    }

    Ok(())
}
