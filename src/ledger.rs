use std::collections::BTreeMap;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::info;

use crate::config::TrackerConfig;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::loan::{Loan, Payment};
use crate::payments::{resolve_balance, LoanBalance};
use crate::status::LoanStatus;
use crate::types::{LoanId, PaymentId, PaymentMethod};
use crate::views::{LoanView, PortfolioSummary};

/// changes the ledger accepts
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerAction {
    /// loans fetched from the backend; existing ids are replaced
    LoadLoans(Vec<Loan>),
    RecordPayment {
        loan_id: LoanId,
        payment: Payment,
    },
    AmendPayment {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        date: Option<NaiveDate>,
        method: PaymentMethod,
    },
    RemovePayment {
        loan_id: LoanId,
        payment_id: PaymentId,
    },
    RemoveLoan(LoanId),
}

/// single owner of every loan the application shows
///
/// balances are derived on read, so nothing here goes stale when time passes.
pub struct LoanLedger {
    pub config: TrackerConfig,
    loans: BTreeMap<LoanId, Loan>,
    pub events: EventStore,
}

impl LoanLedger {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            loans: BTreeMap::new(),
            events: EventStore::new(),
        }
    }

    /// apply one action
    pub fn dispatch(&mut self, action: LedgerAction, time_provider: &SafeTimeProvider) -> Result<()> {
        match action {
            LedgerAction::LoadLoans(loans) => {
                self.load_loans(loans, time_provider);
                Ok(())
            }
            LedgerAction::RecordPayment { loan_id, payment } => {
                self.record_payment(loan_id, payment, time_provider)
            }
            LedgerAction::AmendPayment {
                loan_id,
                payment_id,
                amount,
                date,
                method,
            } => self.amend_payment(loan_id, payment_id, amount, date, method, time_provider),
            LedgerAction::RemovePayment { loan_id, payment_id } => {
                self.remove_payment(loan_id, payment_id, time_provider)
            }
            LedgerAction::RemoveLoan(loan_id) => self.remove_loan(loan_id, time_provider),
        }
    }

    fn load_loans(&mut self, loans: Vec<Loan>, time_provider: &SafeTimeProvider) {
        let now = time_provider.now();
        info!(count = loans.len(), "loading loans into ledger");

        for loan in loans {
            let loan_id = loan.id;
            let principal = loan.principal;
            let payment_count = loan.payments.len();

            if self.loans.insert(loan_id, loan).is_some() {
                self.events.emit(Event::LoanReplaced {
                    loan_id,
                    timestamp: now,
                });
            } else {
                self.events.emit(Event::LoanLoaded {
                    loan_id,
                    principal,
                    payment_count,
                    timestamp: now,
                });
            }
        }
    }

    fn record_payment(
        &mut self,
        loan_id: LoanId,
        payment: Payment,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        payment.validate()?;
        let now = time_provider.now();

        let (payment_id, amount) = (payment.id, payment.amount);
        self.update_loan(loan_id, time_provider, |loan| {
            if loan.payment(payment_id).is_some() {
                return Err(LoanError::DuplicatePayment { loan_id, payment_id });
            }
            loan.payments.push(payment);
            Ok(())
        })?;

        info!(loan_id = %loan_id, amount = %amount, "payment recorded");
        self.events.emit(Event::PaymentRecorded {
            loan_id,
            payment_id,
            amount,
            timestamp: now,
        });
        Ok(())
    }

    fn amend_payment(
        &mut self,
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        date: Option<NaiveDate>,
        method: PaymentMethod,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidPaymentAmount { amount });
        }
        let now = time_provider.now();

        let old_amount = self.update_loan(loan_id, time_provider, |loan| {
            let payment = loan
                .payment_mut(payment_id)
                .ok_or(LoanError::PaymentNotFound { loan_id, payment_id })?;
            let old_amount = payment.amount;
            payment.amount = amount;
            payment.date = date;
            payment.method = method;
            Ok(old_amount)
        })?;

        info!(loan_id = %loan_id, payment_id = %payment_id, old = %old_amount, new = %amount, "payment amended");
        self.events.emit(Event::PaymentAmended {
            loan_id,
            payment_id,
            old_amount,
            new_amount: amount,
            timestamp: now,
        });
        Ok(())
    }

    fn remove_payment(
        &mut self,
        loan_id: LoanId,
        payment_id: PaymentId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();

        let removed = self.update_loan(loan_id, time_provider, |loan| {
            let index = loan
                .payments
                .iter()
                .position(|p| p.id == payment_id)
                .ok_or(LoanError::PaymentNotFound { loan_id, payment_id })?;
            Ok(loan.payments.remove(index))
        })?;

        info!(loan_id = %loan_id, payment_id = %payment_id, "payment removed");
        self.events.emit(Event::PaymentRemoved {
            loan_id,
            payment_id,
            amount: removed.amount,
            timestamp: now,
        });
        Ok(())
    }

    fn remove_loan(&mut self, loan_id: LoanId, time_provider: &SafeTimeProvider) -> Result<()> {
        self.loans
            .remove(&loan_id)
            .ok_or(LoanError::LoanNotFound { id: loan_id })?;

        info!(loan_id = %loan_id, "loan removed");
        self.events.emit(Event::LoanRemoved {
            loan_id,
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    /// run `change` against a loan and emit a status change if it caused one
    fn update_loan<T, F>(
        &mut self,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
        change: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut Loan) -> Result<T>,
    {
        let now = time_provider.now();
        let loan = self
            .loans
            .get_mut(&loan_id)
            .ok_or(LoanError::LoanNotFound { id: loan_id })?;

        let old_status = resolve_balance(&*loan, now).status;
        let output = change(&mut *loan)?;
        let new_status = resolve_balance(&*loan, now).status;

        if old_status != new_status {
            info!(loan_id = %loan_id, from = %old_status, to = %new_status, "loan status changed");
            self.events.emit(Event::StatusChanged {
                loan_id,
                old_status,
                new_status,
                timestamp: now,
            });
        }
        Ok(output)
    }

    pub fn get(&self, loan_id: LoanId) -> Option<&Loan> {
        self.loans.get(&loan_id)
    }

    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values()
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// current balance of one loan
    pub fn balance(&self, loan_id: LoanId, time_provider: &SafeTimeProvider) -> Result<LoanBalance> {
        let loan = self
            .loans
            .get(&loan_id)
            .ok_or(LoanError::LoanNotFound { id: loan_id })?;
        Ok(resolve_balance(loan, time_provider.now()))
    }

    /// loans currently in `status`
    pub fn loans_with_status(&self, status: LoanStatus, time_provider: &SafeTimeProvider) -> Vec<&Loan> {
        let now = time_provider.now();
        self.loans
            .values()
            .filter(|loan| resolve_balance(loan, now).status == status)
            .collect()
    }

    /// view of one loan using the configured status vocabulary
    pub fn view(&self, loan_id: LoanId, time_provider: &SafeTimeProvider) -> Result<LoanView> {
        let loan = self
            .loans
            .get(&loan_id)
            .ok_or(LoanError::LoanNotFound { id: loan_id })?;
        Ok(LoanView::from_loan(loan, time_provider.now(), &self.config))
    }

    /// dashboard totals across every loan
    pub fn summary(&self, time_provider: &SafeTimeProvider) -> PortfolioSummary {
        PortfolioSummary::from_loans(self.loans.values(), time_provider.now())
    }
}
