use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{LoanId, LoanStatus, OwnerId};

/// all events that can be emitted by the loan book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LoanCreated {
        loan_id: LoanId,
        owner: OwnerId,
        principal: Money,
        total_amount: Money,
        timestamp: DateTime<Utc>,
    },
    LoanUpdated {
        loan_id: LoanId,
        owner: OwnerId,
        old_total_interest: Money,
        new_total_interest: Money,
        timestamp: DateTime<Utc>,
    },
    LoanDeleted {
        loan_id: LoanId,
        owner: OwnerId,
    },
    AccrualRefreshed {
        loan_id: LoanId,
        months_elapsed: i64,
        interest_for_elapsed_months: Money,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    LoanArchived {
        loan_id: LoanId,
    },
    LoanUnarchived {
        loan_id: LoanId,
    },
}

impl Event {
    pub fn loan_id(&self) -> LoanId {
        match self {
            Event::LoanCreated { loan_id, .. }
            | Event::LoanUpdated { loan_id, .. }
            | Event::LoanDeleted { loan_id, .. }
            | Event::AccrualRefreshed { loan_id, .. }
            | Event::StatusChanged { loan_id, .. }
            | Event::LoanArchived { loan_id }
            | Event::LoanUnarchived { loan_id } => *loan_id,
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

    /// events that concern one loan, in emission order
    pub fn for_loan(&self, loan_id: LoanId) -> Vec<&Event> {
        self.events.iter().filter(|e| e.loan_id() == loan_id).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
