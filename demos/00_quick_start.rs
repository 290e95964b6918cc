/// quick start - preview a schedule and check a loan's balance
use chrono::{NaiveDate, Utc};
use loan_tracker_rs::{generate_schedule, resolve_balance, Loan, LoanTerms, Money, Payment, PaymentMethod, RepaymentCycle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let first_due = NaiveDate::from_ymd_opt(2023, 11, 26).ok_or("bad date")?;

    // 5,000 over 12 monthly installments
    let terms = LoanTerms::new(Money::from_major(5_000), 12, first_due, RepaymentCycle::Monthly);
    for installment in generate_schedule(&terms) {
        println!(
            "#{:>2}  {}  {}",
            installment.installment_number, installment.due_date, installment.amount
        );
    }

    // record two payments and look at the balance
    let mut loan = Loan::new(Money::from_major(5_000), "USD");
    loan.due_date = Some(first_due);
    let installment = Money::from_str_exact("416.67")?;
    loan.payments.push(Payment::new(installment, Some(first_due), PaymentMethod::Cash));
    loan.payments.push(Payment::new(installment, None, PaymentMethod::MobileMoney));

    let balance = resolve_balance(&loan, Utc::now());
    println!(
        "\npaid {} of {}, remaining {} ({}) -> {}",
        balance.total_paid,
        Money::from_major(5_000),
        balance.remaining_balance,
        balance.progress_percentage.round_half_up(2),
        balance.status
    );

    Ok(())
}
