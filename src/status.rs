use serde::{Deserialize, Serialize};
use std::fmt;

/// the one loan status every view derives its label from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoanStatus {
    /// balance outstanding, due date not yet passed (or unknown)
    Active,
    /// balance outstanding past the due date
    Overdue,
    /// remaining balance at or below zero
    Paid,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 3] = [LoanStatus::Active, LoanStatus::Overdue, LoanStatus::Paid];

    /// paid loans never move again
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Paid)
    }

    /// still owes money
    pub fn is_outstanding(&self) -> bool {
        !self.is_terminal()
    }

    /// label for a particular view
    pub fn label(&self, vocabulary: StatusVocabulary) -> &'static str {
        match (vocabulary, self) {
            (StatusVocabulary::Canonical, LoanStatus::Active) => "Active",
            (StatusVocabulary::Canonical, LoanStatus::Overdue) => "Overdue",
            (StatusVocabulary::Canonical, LoanStatus::Paid) => "Paid",

            (StatusVocabulary::Portfolio, LoanStatus::Active | LoanStatus::Overdue) => "active",
            (StatusVocabulary::Portfolio, LoanStatus::Paid) => "completed",

            (StatusVocabulary::Repayment, LoanStatus::Active) => "Pending",
            (StatusVocabulary::Repayment, LoanStatus::Overdue) => "Late",
            (StatusVocabulary::Repayment, LoanStatus::Paid) => "Paid",

            (StatusVocabulary::Lifecycle, LoanStatus::Active) => "active",
            (StatusVocabulary::Lifecycle, LoanStatus::Overdue) => "defaulted",
            (StatusVocabulary::Lifecycle, LoanStatus::Paid) => "completed",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(StatusVocabulary::Canonical))
    }
}

/// naming scheme a view uses when it shows a loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusVocabulary {
    /// Active / Overdue / Paid
    #[default]
    Canonical,
    /// loan list: active / completed
    Portfolio,
    /// repayment tables: Pending / Late / Paid
    Repayment,
    /// lender dashboards: active / defaulted / completed
    Lifecycle,
}
