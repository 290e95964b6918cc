use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::status::LoanStatus;
use crate::types::{LoanId, PaymentId};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // loan events
    LoanLoaded {
        loan_id: LoanId,
        principal: Option<Money>,
        payment_count: usize,
        timestamp: DateTime<Utc>,
    },
    LoanReplaced {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanRemoved {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentAmended {
        loan_id: LoanId,
        payment_id: PaymentId,
        old_amount: Money,
        new_amount: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentRemoved {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn loan_id(&self) -> LoanId {
        match self {
            Event::LoanLoaded { loan_id, .. }
            | Event::LoanReplaced { loan_id, .. }
            | Event::LoanRemoved { loan_id, .. }
            | Event::PaymentRecorded { loan_id, .. }
            | Event::PaymentAmended { loan_id, .. }
            | Event::PaymentRemoved { loan_id, .. }
            | Event::StatusChanged { loan_id, .. } => *loan_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// events concerning one loan, oldest first
    pub fn for_loan(&self, loan_id: LoanId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.loan_id() == loan_id)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
