pub mod config;
pub mod dates;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod loan;
pub mod payments;
pub mod records;
pub mod status;
pub mod types;
pub mod views;

// re-export key types
pub use config::TrackerConfig;
pub use decimal::{Money, Percentage};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use ledger::{LedgerAction, LoanLedger};
pub use loan::{Loan, Payment};
pub use payments::{
    generate_schedule, resolve_balance, Installment, InstallmentSchedule, LoanBalance, LoanTerms,
    ScheduleDraft, MAX_INSTALLMENTS,
};
pub use records::{parse_loan, parse_loans, LoanRecord, PaymentRecord};
pub use status::{LoanStatus, StatusVocabulary};
pub use types::{LoanId, PaymentId, PaymentMethod, RepaymentCycle};
pub use views::{CurrencySummary, LoanView, PortfolioSummary};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
