use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::dates::{add_days, parse_calendar_date};
use crate::decimal::{Money, CURRENCY_DP};
use crate::types::RepaymentCycle;

/// longest plan a schedule is generated for
pub const MAX_INSTALLMENTS: i64 = 10_000;

/// terms an installment plan is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// signed so half-filled forms (0, -1) are representable
    pub installment_count: i64,
    pub first_due_date: Option<NaiveDate>,
    pub cycle_length_days: u32,
}

/// one scheduled repayment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub installment_number: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
}

/// raw values of a loan-creation or loan-request form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub principal: String,
    pub installment_count: String,
    pub first_due_date: String,
    pub cycle: String,
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        installment_count: i64,
        first_due_date: NaiveDate,
        cycle: RepaymentCycle,
    ) -> Self {
        Self {
            principal,
            installment_count,
            first_due_date: Some(first_due_date),
            cycle_length_days: cycle.days(),
        }
    }

    /// read terms from form input without failing
    ///
    /// unreadable fields become values that produce an empty schedule; a blank
    /// cycle falls back to the configured default.
    pub fn from_draft(draft: &ScheduleDraft, config: &TrackerConfig) -> Self {
        let principal = match draft.principal.trim() {
            "" => Money::ZERO,
            raw => Money::from_str_exact(raw).unwrap_or_else(|_| {
                warn!(principal = raw, "unreadable principal in schedule draft");
                Money::ZERO
            }),
        };

        let installment_count = draft.installment_count.trim().parse::<i64>().unwrap_or(0);
        if installment_count > MAX_INSTALLMENTS {
            warn!(
                installment_count,
                max = MAX_INSTALLMENTS,
                "installment count in schedule draft exceeds the maximum"
            );
        }

        let cycle = if draft.cycle.trim().is_empty() {
            config.default_cycle
        } else {
            RepaymentCycle::parse(&draft.cycle).unwrap_or_else(|| {
                warn!(cycle = %draft.cycle, "unreadable cycle in schedule draft, using default");
                config.default_cycle
            })
        };

        Self {
            principal,
            installment_count,
            first_due_date: parse_calendar_date(&draft.first_due_date),
            cycle_length_days: cycle.days(),
        }
    }

    /// terms that can produce a schedule
    pub fn is_schedulable(&self) -> bool {
        self.principal.is_positive()
            && (1..=MAX_INSTALLMENTS).contains(&self.installment_count)
            && self.first_due_date.is_some()
    }

    /// amount charged on every installment, the exact share rounded once to cents
    pub fn installment_amount(&self) -> Option<Money> {
        if !self.is_schedulable() {
            return None;
        }
        let share = self
            .principal
            .as_decimal()
            .checked_div(Decimal::from(self.installment_count))?;
        Some(Money::from_decimal(share.round_dp_with_strategy(
            CURRENCY_DP,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }

    /// lazily walk the schedule; calling again starts over
    pub fn installments(&self) -> Installments {
        let (first_due_date, amount, count) = match (self.first_due_date, self.installment_amount()) {
            (Some(date), Some(amount)) => (date, amount, self.installment_count as u64),
            _ => (NaiveDate::MIN, Money::ZERO, 0),
        };

        Installments {
            first_due_date,
            amount,
            cycle_length_days: i64::from(self.cycle_length_days),
            count,
            next: 1,
        }
    }
}

/// iterator over a plan's installments
#[derive(Debug, Clone)]
pub struct Installments {
    first_due_date: NaiveDate,
    amount: Money,
    cycle_length_days: i64,
    count: u64,
    next: u64,
}

impl Iterator for Installments {
    type Item = Installment;

    fn next(&mut self) -> Option<Installment> {
        if self.next > self.count {
            return None;
        }

        let number = self.next;
        let offset = (number as i64 - 1).checked_mul(self.cycle_length_days);
        let due_date = offset.and_then(|days| add_days(self.first_due_date, days));
        let (Some(due_date), Ok(installment_number)) = (due_date, u32::try_from(number)) else {
            warn!(installment = number, "schedule ran past the representable date range");
            self.next = self.count + 1;
            return None;
        };

        self.next += 1;
        Some(Installment {
            installment_number,
            amount: self.amount,
            due_date,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count + 1).saturating_sub(self.next);
        (0, usize::try_from(left).ok())
    }
}

/// split a principal into equal installments, one every `cycle_length_days`
///
/// returns an empty list when the terms are incomplete: a non-positive
/// principal, a count outside `1..=MAX_INSTALLMENTS`, or no first due date.
pub fn generate_schedule(terms: &LoanTerms) -> Vec<Installment> {
    let installments: Vec<Installment> = terms.installments().collect();
    debug!(
        principal = %terms.principal,
        requested = terms.installment_count,
        generated = installments.len(),
        "generated installment schedule"
    );
    installments
}

/// installment plan with its totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    pub terms: LoanTerms,
    pub installments: Vec<Installment>,
    pub total_scheduled: Money,
    /// total_scheduled minus principal; left unreconciled
    pub rounding_remainder: Money,
}

impl InstallmentSchedule {
    /// build the schedule for these terms
    pub fn generate(terms: &LoanTerms) -> Self {
        let installments = generate_schedule(terms);
        let total_scheduled: Money = installments.iter().map(|i| i.amount).sum();
        let rounding_remainder = if installments.is_empty() {
            Money::ZERO
        } else {
            total_scheduled - terms.principal
        };

        Self {
            terms: terms.clone(),
            installments,
            total_scheduled,
            rounding_remainder,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    /// get installment by its 1-based number
    pub fn installment(&self, installment_number: u32) -> Option<&Installment> {
        let index = installment_number.checked_sub(1)?;
        self.installments.get(index as usize)
    }

    /// due date of the last installment
    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.installments.last().map(|i| i.due_date)
    }

    /// first installment falling due on or after `date`
    pub fn next_due_on_or_after(&self, date: NaiveDate) -> Option<&Installment> {
        self.installments.iter().find(|i| i.due_date >= date)
    }

    /// amount scheduled to be due by `date`, inclusive
    pub fn scheduled_through(&self, date: NaiveDate) -> Money {
        self.installments
            .iter()
            .take_while(|i| i.due_date <= date)
            .map(|i| i.amount)
            .sum()
    }
}
