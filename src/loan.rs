use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::payments::{resolve_balance, InstallmentSchedule, LoanBalance, LoanTerms};
use crate::types::{LoanId, PaymentId, PaymentMethod, RepaymentCycle};

/// a repayment recorded against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub amount: Money,
    pub date: Option<NaiveDate>,
    pub method: PaymentMethod,
}

impl Payment {
    pub fn new(amount: Money, date: Option<NaiveDate>, method: PaymentMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date,
            method,
        }
    }

    /// payments must move money towards the loan
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LoanError::InvalidPaymentAmount {
                amount: self.amount,
            });
        }
        if !self.amount.is_within_range() {
            return Err(LoanError::AmountOutOfRange {
                amount: self.amount,
            });
        }
        Ok(())
    }
}

/// a loan as the backend reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower_name: Option<String>,
    /// `None` when the backend record carried no amount
    pub principal: Option<Money>,
    pub currency: String,
    pub disbursement_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub payments: Vec<Payment>,
}

impl Loan {
    /// create new loan with no payments or dates
    pub fn new(principal: Money, currency: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            borrower_name: None,
            principal: Some(principal),
            currency: currency.to_string(),
            disbursement_date: None,
            due_date: None,
            payments: Vec::new(),
        }
    }

    /// principal, zero when unknown
    pub fn principal_or_zero(&self) -> Money {
        self.principal.unwrap_or(Money::ZERO)
    }

    /// current balance and status
    pub fn balance(&self, now: DateTime<Utc>) -> LoanBalance {
        resolve_balance(self, now)
    }

    pub fn payment(&self, payment_id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == payment_id)
    }

    pub fn payment_mut(&mut self, payment_id: PaymentId) -> Option<&mut Payment> {
        self.payments.iter_mut().find(|p| p.id == payment_id)
    }

    /// most recent dated payment
    pub fn last_payment(&self) -> Option<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.date.is_some())
            .max_by_key(|p| p.date)
    }

    /// installment plan for this loan's principal; the plan's last date
    /// becomes the loan's due date when none was set
    pub fn plan_installments(
        &mut self,
        installment_count: i64,
        first_due_date: NaiveDate,
        cycle: RepaymentCycle,
    ) -> InstallmentSchedule {
        let terms = LoanTerms::new(self.principal_or_zero(), installment_count, first_due_date, cycle);
        let schedule = InstallmentSchedule::generate(&terms);
        if self.due_date.is_none() {
            self.due_date = schedule.final_due_date();
        }
        schedule
    }
}
