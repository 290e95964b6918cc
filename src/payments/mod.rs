pub mod balance;
pub mod schedule;

pub use balance::{resolve_balance, LoanBalance};
pub use schedule::{
    generate_schedule, Installment, InstallmentSchedule, Installments, LoanTerms, ScheduleDraft,
    MAX_INSTALLMENTS,
};
