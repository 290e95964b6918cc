use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dates::days_remaining;
use crate::decimal::{Money, Percentage};
use crate::loan::Loan;
use crate::status::LoanStatus;

/// derived repayment position of a loan at a point in time
///
/// never stored; recompute whenever payments or the loan record change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanBalance {
    pub total_paid: Money,
    /// principal minus total paid, negative when overpaid
    pub remaining_balance: Money,
    /// not capped at 100
    pub progress_percentage: Percentage,
    pub status: LoanStatus,
    /// whole days until the due date, `None` without a due date
    pub days_remaining: Option<i64>,
}

impl LoanBalance {
    /// resolve from plain loan data
    ///
    /// an absent principal degrades to a zero balance that is always `Active`.
    /// totals too large for a decimal degrade the same way.
    pub fn compute<I>(
        principal: Option<Money>,
        due_date: Option<NaiveDate>,
        payment_amounts: I,
        now: DateTime<Utc>,
    ) -> Self
    where
        I: IntoIterator<Item = Money>,
    {
        let days_remaining = due_date.map(|due| days_remaining(due, now));

        let Some(total_paid) = payment_amounts
            .into_iter()
            .try_fold(Money::ZERO, Money::checked_add)
        else {
            warn!("payment total out of range, resolving to an empty balance");
            return Self::unresolved(Money::ZERO, days_remaining);
        };

        let Some(principal) = principal else {
            return Self::unresolved(total_paid, days_remaining);
        };

        let Some(remaining_balance) = principal.checked_sub(total_paid) else {
            warn!(%principal, %total_paid, "remaining balance out of range, resolving to an empty balance");
            return Self::unresolved(total_paid, days_remaining);
        };
        let progress_percentage = total_paid.percentage_of(principal);
        let status = if !remaining_balance.is_positive() {
            LoanStatus::Paid
        } else {
            match days_remaining {
                Some(days) if days < 0 => LoanStatus::Overdue,
                _ => LoanStatus::Active,
            }
        };

        Self {
            total_paid,
            remaining_balance,
            progress_percentage,
            status,
            days_remaining,
        }
    }

    fn unresolved(total_paid: Money, days_remaining: Option<i64>) -> Self {
        Self {
            total_paid,
            remaining_balance: Money::ZERO,
            progress_percentage: Percentage::ZERO,
            status: LoanStatus::Active,
            days_remaining,
        }
    }

    /// paid more than the principal
    pub fn is_overpaid(&self) -> bool {
        self.remaining_balance.is_negative()
    }

    /// what was paid beyond the principal, zero otherwise
    pub fn overpayment(&self) -> Money {
        (-self.remaining_balance).max(Money::ZERO)
    }

    /// remaining balance floored at zero, for views that choose to hide overpayment
    pub fn outstanding(&self) -> Money {
        self.remaining_balance.max(Money::ZERO)
    }

    /// days past the due date while unpaid
    pub fn days_overdue(&self) -> u32 {
        match (self.status, self.days_remaining) {
            (LoanStatus::Overdue, Some(days)) => u32::try_from(-days).unwrap_or(u32::MAX),
            _ => 0,
        }
    }
}

/// total paid, remaining balance, progress and status of `loan` as of `now`
pub fn resolve_balance(loan: &Loan, now: DateTime<Utc>) -> LoanBalance {
    let balance = LoanBalance::compute(
        loan.principal,
        loan.due_date,
        loan.payments.iter().map(|p| p.amount),
        now,
    );
    debug!(
        loan_id = %loan.id,
        total_paid = %balance.total_paid,
        remaining = %balance.remaining_balance,
        status = %balance.status,
        "resolved loan balance"
    );
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::loan::Payment;
    use crate::types::PaymentMethod;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 14, 0, 0).unwrap()
    }

    fn loan(principal: Money, due_in_days: Option<i64>, payments: &[Money]) -> Loan {
        let mut loan = Loan::new(principal, "USD");
        loan.due_date = due_in_days.map(|d| now().date_naive() + Duration::days(d));
        loan.payments = payments
            .iter()
            .map(|amount| Payment::new(*amount, Some(now().date_naive()), PaymentMethod::Cash))
            .collect();
        loan
    }

    #[test]
    fn test_no_payments() {
        let balance = resolve_balance(&loan(Money::from_major(5000), Some(30), &[]), now());

        assert_eq!(balance.total_paid, Money::ZERO);
        assert_eq!(balance.remaining_balance, Money::from_major(5000));
        assert_eq!(balance.progress_percentage, Percentage::ZERO);
        assert_eq!(balance.status, LoanStatus::Active);
        assert_eq!(balance.days_remaining, Some(30));
    }

    #[test]
    fn test_partial_payments_past_due_are_overdue() {
        let installment = Money::from_decimal(dec!(416.67));
        let balance = resolve_balance(
            &loan(Money::from_major(5000), Some(-1), &[installment; 5]),
            now(),
        );

        assert_eq!(balance.total_paid.as_decimal(), dec!(2083.35));
        assert_eq!(balance.remaining_balance.as_decimal(), dec!(2916.65));
        assert_eq!(balance.progress_percentage.round_half_up(2).as_decimal(), dec!(41.67));
        assert_eq!(balance.status, LoanStatus::Overdue);
        assert_eq!(balance.days_overdue(), 1);
    }

    #[test]
    fn test_full_payment_before_due_is_paid() {
        let balance = resolve_balance(
            &loan(Money::from_major(1000), Some(7), &[Money::from_major(1000)]),
            now(),
        );

        assert_eq!(balance.status, LoanStatus::Paid);
        assert!(balance.remaining_balance.is_zero());
        assert!(balance.progress_percentage.is_complete());
    }

    #[test]
    fn test_paid_wins_over_past_due_date() {
        let balance = resolve_balance(
            &loan(Money::from_major(1000), Some(-90), &[Money::from_major(600), Money::from_major(400)]),
            now(),
        );
        assert_eq!(balance.status, LoanStatus::Paid);
        assert_eq!(balance.days_overdue(), 0);
    }

    #[test]
    fn test_due_today_is_active() {
        let balance = resolve_balance(&loan(Money::from_major(1000), Some(0), &[]), now());
        assert_eq!(balance.days_remaining, Some(0));
        assert_eq!(balance.status, LoanStatus::Active);
    }

    #[test]
    fn test_missing_due_date_is_never_overdue() {
        let balance = resolve_balance(&loan(Money::from_major(1000), None, &[]), now());
        assert_eq!(balance.status, LoanStatus::Active);
        assert_eq!(balance.days_remaining, None);
        assert_eq!(balance.days_overdue(), 0);
    }

    #[test]
    fn test_overpayment_leaves_negative_balance() {
        let balance = resolve_balance(
            &loan(Money::from_major(1000), Some(10), &[Money::from_major(1200)]),
            now(),
        );

        assert_eq!(balance.remaining_balance, Money::from_major(-200));
        assert_eq!(balance.progress_percentage.as_decimal(), dec!(120));
        assert!(balance.is_overpaid());
        assert_eq!(balance.overpayment(), Money::from_major(200));
        assert_eq!(balance.outstanding(), Money::ZERO);
        assert_eq!(balance.status, LoanStatus::Paid);
    }

    #[test]
    fn test_zero_principal_guards_progress() {
        let balance = resolve_balance(&loan(Money::ZERO, Some(-5), &[]), now());

        assert_eq!(balance.progress_percentage, Percentage::ZERO);
        assert!(balance.remaining_balance.is_zero());
        assert_eq!(balance.status, LoanStatus::Paid);

        let with_payment =
            LoanBalance::compute(Some(Money::ZERO), None, [Money::from_major(10)], now());
        assert_eq!(with_payment.progress_percentage, Percentage::ZERO);
        assert_eq!(with_payment.remaining_balance, Money::from_major(-10));
    }

    #[test]
    fn test_absent_principal_degrades_to_active() {
        let mut record = loan(Money::from_major(1000), Some(-5), &[Money::from_major(50)]);
        record.principal = None;

        let balance = resolve_balance(&record, now());
        assert_eq!(balance.total_paid, Money::from_major(50));
        assert_eq!(balance.remaining_balance, Money::ZERO);
        assert_eq!(balance.progress_percentage, Percentage::ZERO);
        assert_eq!(balance.status, LoanStatus::Active);
    }

    #[test]
    fn test_date_progression_moves_active_to_overdue() {
        let mut record = loan(Money::from_major(500), Some(3), &[Money::from_major(100)]);
        record.due_date = Some(now().date_naive());

        assert_eq!(resolve_balance(&record, now()).status, LoanStatus::Active);
        let later = now() + Duration::days(1);
        assert_eq!(resolve_balance(&record, later).status, LoanStatus::Overdue);

        record.payments.push(Payment::new(Money::from_major(400), None, PaymentMethod::Unspecified));
        assert_eq!(resolve_balance(&record, later).status, LoanStatus::Paid);
    }

    #[test]
    fn test_totals_beyond_decimal_range_degrade() {
        let max = Money::from_decimal(Decimal::MAX);

        let balance = LoanBalance::compute(Some(Money::ONE), Some(now().date_naive()), [max, max], now());
        assert_eq!(balance.total_paid, Money::ZERO);
        assert_eq!(balance.remaining_balance, Money::ZERO);
        assert_eq!(balance.progress_percentage, Percentage::ZERO);
        assert_eq!(balance.status, LoanStatus::Active);
        assert_eq!(balance.days_remaining, Some(0));

        let balance = LoanBalance::compute(Some(-max), None, [max], now());
        assert_eq!(balance.total_paid, max);
        assert_eq!(balance.remaining_balance, Money::ZERO);
        assert_eq!(balance.status, LoanStatus::Active);

        // a single large payment still resolves normally
        let balance = resolve_balance(&loan(Money::ONE, Some(5), &[max]), now());
        assert_eq!(balance.total_paid, max);
        assert_eq!(balance.status, LoanStatus::Paid);
        assert_eq!(balance.progress_percentage, Percentage::ZERO);
    }
}
