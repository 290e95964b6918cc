use thiserror::Error;

use crate::decimal::Money;
use crate::types::{LoanId, PaymentId};

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid principal: {amount}")]
    InvalidPrincipal {
        amount: Money,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("amount out of range: {amount}")]
    AmountOutOfRange {
        amount: Money,
    },

    #[error("payment amount missing on loan {loan_id}")]
    MissingPaymentAmount {
        loan_id: LoanId,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("payment {payment_id} not found on loan {loan_id}")]
    PaymentNotFound {
        loan_id: LoanId,
        payment_id: PaymentId,
    },

    #[error("duplicate payment {payment_id} on loan {loan_id}")]
    DuplicatePayment {
        loan_id: LoanId,
        payment_id: PaymentId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoanError>;
