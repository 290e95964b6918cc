//! serializable projections for the dashboard

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::decimal::{Money, Percentage};
use crate::loan::Loan;
use crate::payments::{resolve_balance, LoanBalance};
use crate::status::LoanStatus;
use crate::types::LoanId;

/// serializable view of a loan's state
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub borrower_name: Option<String>,
    pub currency: String,
    pub principal: Option<Money>,
    pub disbursement_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub balance: LoanBalance,
    /// status in the configured vocabulary
    pub status_label: String,
    pub payments: Vec<PaymentLine>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentLine {
    pub amount: Money,
    pub date: Option<NaiveDate>,
    pub method: String,
}

impl LoanView {
    pub fn from_loan(loan: &Loan, now: DateTime<Utc>, config: &TrackerConfig) -> Self {
        let dp = config.display_decimal_places;
        let mut balance = resolve_balance(loan, now);
        balance.total_paid = balance.total_paid.round_half_up(dp);
        balance.remaining_balance = balance.remaining_balance.round_half_up(dp);
        balance.progress_percentage = balance.progress_percentage.round_half_up(dp);

        LoanView {
            id: loan.id,
            borrower_name: loan.borrower_name.clone(),
            currency: loan.currency.clone(),
            principal: loan.principal,
            disbursement_date: loan.disbursement_date,
            due_date: loan.due_date,
            status_label: balance.status.label(config.status_vocabulary).to_string(),
            balance,
            payments: loan
                .payments
                .iter()
                .map(|p| PaymentLine {
                    amount: p.amount.round_half_up(dp),
                    date: p.date,
                    method: p.method.to_string(),
                })
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// totals for one currency, clamped at the decimal bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencySummary {
    pub loan_count: usize,
    pub active_count: usize,
    pub overdue_count: usize,
    pub paid_count: usize,
    pub total_principal: Money,
    pub total_repaid: Money,
    /// positive remaining balances only
    pub total_outstanding: Money,
    pub overdue_outstanding: Money,
    /// loans whose principal is unknown are left out of the principal total
    pub unknown_principal_count: usize,
}

impl CurrencySummary {
    fn add(&mut self, loan: &Loan, balance: &LoanBalance) {
        self.loan_count += 1;
        match balance.status {
            LoanStatus::Active => self.active_count += 1,
            LoanStatus::Overdue => {
                self.overdue_count += 1;
                self.overdue_outstanding =
                    self.overdue_outstanding.saturating_add(balance.outstanding());
            }
            LoanStatus::Paid => self.paid_count += 1,
        }

        match loan.principal {
            Some(principal) => {
                self.total_principal = self.total_principal.saturating_add(principal);
            }
            None => self.unknown_principal_count += 1,
        }
        self.total_repaid = self.total_repaid.saturating_add(balance.total_paid);
        self.total_outstanding = self.total_outstanding.saturating_add(balance.outstanding());
    }

    /// share of principal collected so far
    pub fn collection_rate(&self) -> Percentage {
        self.total_repaid.percentage_of(self.total_principal)
    }

    pub fn count(&self, status: LoanStatus) -> usize {
        match status {
            LoanStatus::Active => self.active_count,
            LoanStatus::Overdue => self.overdue_count,
            LoanStatus::Paid => self.paid_count,
        }
    }
}

/// portfolio totals grouped by currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub as_of: Option<DateTime<Utc>>,
    pub by_currency: BTreeMap<String, CurrencySummary>,
}

impl PortfolioSummary {
    pub fn from_loans<'a, I>(loans: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Loan>,
    {
        let mut by_currency: BTreeMap<String, CurrencySummary> = BTreeMap::new();
        for loan in loans {
            let balance = resolve_balance(loan, now);
            by_currency
                .entry(loan.currency.clone())
                .or_default()
                .add(loan, &balance);
        }

        Self {
            as_of: Some(now),
            by_currency,
        }
    }

    pub fn currency(&self, code: &str) -> Option<&CurrencySummary> {
        self.by_currency.get(code)
    }

    /// number of loans across currencies
    pub fn loan_count(&self) -> usize {
        self.by_currency.values().map(|s| s.loan_count).sum()
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    use crate::loan::Payment;
    use crate::status::StatusVocabulary;
    use crate::types::PaymentMethod;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn loan(currency: &str, principal: i64, due_in: i64, paid: &[Money]) -> Loan {
        let mut loan = Loan::new(Money::from_major(principal), currency);
        loan.due_date = Some(now().date_naive() + Duration::days(due_in));
        loan.payments = paid
            .iter()
            .map(|a| Payment::new(*a, None, PaymentMethod::Cash))
            .collect();
        loan
    }

    #[test]
    fn test_loan_view_rounds_for_display() {
        let mut config = TrackerConfig::default();
        config.status_vocabulary = StatusVocabulary::Repayment;

        let record = loan("USD", 3, -1, &[Money::ONE]);
        let view = LoanView::from_loan(&record, now(), &config);

        assert_eq!(view.status_label, "Late");
        assert_eq!(view.balance.status, LoanStatus::Overdue);
        assert_eq!(view.balance.progress_percentage.as_decimal(), dec!(33.33));
        assert_eq!(view.payments[0].method, "Cash");

        let json = view.to_json_pretty().unwrap();
        assert!(json.contains("\"status_label\": \"Late\""));
    }

    #[test]
    fn test_summary_per_currency() {
        let loans = vec![
            loan("USD", 1000, 10, &[Money::from_major(250)]),
            loan("USD", 500, -3, &[Money::from_major(100)]),
            loan("USD", 200, -30, &[Money::from_major(250)]),
            loan("KES", 40_000, 5, &[]),
        ];

        let summary = PortfolioSummary::from_loans(&loans, now());
        assert_eq!(summary.loan_count(), 4);

        let usd = summary.currency("USD").unwrap();
        assert_eq!(usd.loan_count, 3);
        assert_eq!(usd.count(LoanStatus::Active), 1);
        assert_eq!(usd.count(LoanStatus::Overdue), 1);
        assert_eq!(usd.count(LoanStatus::Paid), 1);
        assert_eq!(usd.total_principal, Money::from_major(1700));
        assert_eq!(usd.total_repaid, Money::from_major(600));
        // the 50 overpaid on the third loan does not offset the others
        assert_eq!(usd.total_outstanding, Money::from_major(1150));
        assert_eq!(usd.overdue_outstanding, Money::from_major(400));

        let kes = summary.currency("KES").unwrap();
        assert_eq!(kes.total_outstanding, Money::from_major(40_000));
        assert_eq!(kes.collection_rate(), Percentage::ZERO);
    }

    #[test]
    fn test_summary_counts_unknown_principal() {
        let mut unknown = loan("USD", 0, 5, &[Money::from_major(20)]);
        unknown.principal = None;

        let summary = PortfolioSummary::from_loans([&unknown], now());
        let usd = summary.currency("USD").unwrap();
        assert_eq!(usd.unknown_principal_count, 1);
        assert_eq!(usd.total_principal, Money::ZERO);
        assert_eq!(usd.active_count, 1);
        assert_eq!(usd.total_outstanding, Money::ZERO);
    }

    #[test]
    fn test_summary_totals_clamp() {
        let max = Money::from_decimal(rust_decimal::Decimal::MAX);
        let mut big = loan("USD", 1, 5, &[]);
        big.principal = Some(max);

        let summary = PortfolioSummary::from_loans([&big, &big], now());
        let usd = summary.currency("USD").unwrap();
        assert_eq!(usd.total_principal, max);
        assert_eq!(usd.total_outstanding, max);
        assert_eq!(usd.active_count, 2);
    }
}
