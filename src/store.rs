use parking_lot::RwLock;
use std::collections::HashMap;

use crate::loan::Loan;
use crate::types::{LoanId, OwnerId};

/// persistence port for loan records
///
/// The loan book only stores and fetches whole records; it never asks the
/// store to compute anything. Implementations must be shareable across
/// threads.
pub trait LoanStore: Send + Sync {
    /// insert or overwrite the record with `loan.id`
    fn save(&self, loan: Loan);

    fn get(&self, id: LoanId) -> Option<Loan>;

    /// records of one owner, oldest start date first
    fn list_by_owner(&self, owner: &OwnerId) -> Vec<Loan>;

    /// every record regardless of owner, oldest start date first
    fn list_all(&self) -> Vec<Loan>;

    fn remove(&self, id: LoanId) -> Option<Loan>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// in-memory store backed by a hash map
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    loans: RwLock<HashMap<LoanId, Loan>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut loans: Vec<Loan>) -> Vec<Loan> {
    loans.sort_by(|a, b| {
        a.terms
            .start_date
            .cmp(&b.terms.start_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    loans
}

impl LoanStore for InMemoryLoanStore {
    fn save(&self, loan: Loan) {
        self.loans.write().insert(loan.id, loan);
    }

    fn get(&self, id: LoanId) -> Option<Loan> {
        self.loans.read().get(&id).cloned()
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Vec<Loan> {
        let loans = self
            .loans
            .read()
            .values()
            .filter(|loan| loan.is_owned_by(owner))
            .cloned()
            .collect();
        sorted(loans)
    }

    fn list_all(&self) -> Vec<Loan> {
        sorted(self.loans.read().values().cloned().collect())
    }

    fn remove(&self, id: LoanId) -> Option<Loan> {
        self.loans.write().remove(&id)
    }

    fn len(&self) -> usize {
        self.loans.read().len()
    }
}
