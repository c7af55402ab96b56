use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::BookConfig;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::interest::AccrualEngine;
use crate::loan::{Loan, NewLoanRequest, UpdateLoanRequest};
use crate::report::{self, LenderSummary};
use crate::store::{InMemoryLoanStore, LoanStore};
use crate::types::{LoanId, LoanStatus, OwnerId};

/// owner-scoped loan bookkeeping on top of a [`LoanStore`]
///
/// Every loan belongs to the owner that created it. Asking for somebody
/// else's loan gives the same `LoanNotFound` as asking for a missing one.
/// Derived figures are only ever produced by the accrual engine; the book
/// recomputes them whenever terms change or `refresh` is called.
pub struct LoanBook<S: LoanStore = InMemoryLoanStore> {
    store: S,
    config: BookConfig,
    engine: AccrualEngine,
    pub events: EventStore,
}

impl LoanBook<InMemoryLoanStore> {
    /// book over a fresh in-memory store with default configuration
    pub fn in_memory() -> Self {
        Self {
            store: InMemoryLoanStore::new(),
            config: BookConfig::default(),
            engine: AccrualEngine::new(),
            events: EventStore::new(),
        }
    }
}

impl<S: LoanStore> LoanBook<S> {
    pub fn new(store: S, config: BookConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            engine: AccrualEngine::new(),
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// register a new loan for `owner`, computing its figures as of now
    pub fn create_loan(
        &mut self,
        owner: &OwnerId,
        request: NewLoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let now = time_provider.now();

        let (borrower, lender) = request.parties().map_err(|e| {
            warn!(owner = %owner, error = %e, "rejected loan request");
            e
        })?;
        let terms = request
            .terms
            .parse_with_defaults(
                self.config.default_period_type,
                self.config.default_interest_period_type,
            )
            .map_err(|e| {
                warn!(owner = %owner, error = %e, "rejected loan terms");
                e
            })?;

        let mut loan = Loan::open(
            Uuid::new_v4(),
            owner.clone(),
            borrower,
            lender,
            terms,
            &self.engine,
            now,
        )?;

        self.events.emit(Event::LoanCreated {
            loan_id: loan.id,
            owner: owner.clone(),
            principal: loan.terms.principal,
            total_amount: loan.accrual.total_amount,
            timestamp: now,
        });
        info!(loan_id = %loan.id, owner = %owner, principal = %loan.terms.principal, "loan created");

        // a backdated loan can already be past its tenor
        self.reconcile_status(&mut loan, now);
        self.store.save(loan.clone());

        Ok(loan)
    }

    /// create with system time
    pub fn create_loan_now(&mut self, owner: &OwnerId, request: NewLoanRequest) -> Result<Loan> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.create_loan(owner, request, &time)
    }

    pub fn list_loans(&self, owner: &OwnerId) -> Vec<Loan> {
        self.store.list_by_owner(owner)
    }

    pub fn get_loan(&self, owner: &OwnerId, id: LoanId) -> Result<Loan> {
        self.store
            .get(id)
            .filter(|loan| loan.is_owned_by(owner))
            .ok_or(LoanError::LoanNotFound { id })
    }

    /// edit terms and recompute every derived figure from the merged terms
    pub fn update_loan(
        &mut self,
        owner: &OwnerId,
        id: LoanId,
        request: UpdateLoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let now = time_provider.now();
        let mut loan = self.get_loan(owner, id)?;
        let old_total_interest = loan.accrual.total_interest;

        let terms = request.merged_with(&loan.terms).parse()?;
        loan.recompute(terms, &self.engine, now)?;
        self.reconcile_status(&mut loan, now);

        self.store.save(loan.clone());
        self.events.emit(Event::LoanUpdated {
            loan_id: id,
            owner: owner.clone(),
            old_total_interest,
            new_total_interest: loan.accrual.total_interest,
            timestamp: now,
        });
        info!(loan_id = %id, owner = %owner, "loan updated");

        Ok(loan)
    }

    /// update with system time
    pub fn update_loan_now(&mut self, owner: &OwnerId, id: LoanId, request: UpdateLoanRequest) -> Result<Loan> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.update_loan(owner, id, request, &time)
    }

    pub fn delete_loan(&mut self, owner: &OwnerId, id: LoanId) -> Result<Loan> {
        // ownership check before touching the store
        self.get_loan(owner, id)?;
        let loan = self.store.remove(id).ok_or(LoanError::LoanNotFound { id })?;

        self.events.emit(Event::LoanDeleted {
            loan_id: id,
            owner: owner.clone(),
        });
        info!(loan_id = %id, owner = %owner, "loan deleted");

        Ok(loan)
    }

    /// record that the principal has been handed back
    pub fn mark_returned(
        &mut self,
        owner: &OwnerId,
        id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let mut loan = self.get_loan(owner, id)?;
        if loan.is_returned() {
            return Err(LoanError::LoanClosed { id });
        }

        self.change_status(&mut loan, LoanStatus::Returned, "principal returned", time_provider.now());
        self.store.save(loan.clone());

        Ok(loan)
    }

    pub fn archive(&mut self, owner: &OwnerId, id: LoanId) -> Result<Loan> {
        self.set_archived(owner, id, true)
    }

    pub fn unarchive(&mut self, owner: &OwnerId, id: LoanId) -> Result<Loan> {
        self.set_archived(owner, id, false)
    }

    fn set_archived(&mut self, owner: &OwnerId, id: LoanId, archived: bool) -> Result<Loan> {
        let mut loan = self.get_loan(owner, id)?;
        if loan.is_archived == archived {
            return Ok(loan);
        }

        loan.is_archived = archived;
        self.store.save(loan.clone());
        self.events.emit(if archived {
            Event::LoanArchived { loan_id: id }
        } else {
            Event::LoanUnarchived { loan_id: id }
        });
        debug!(loan_id = %id, archived, "archive flag changed");

        Ok(loan)
    }

    /// recompute every open, unarchived loan of `owner` as of now
    ///
    /// Active loans that have run past their tenor plus the configured grace
    /// become overdue. Returned and archived loans are left as they are. A
    /// loan whose figures can no longer be represented keeps its last stored
    /// accrual and is left out of the result.
    pub fn refresh(&mut self, owner: &OwnerId, time_provider: &SafeTimeProvider) -> Vec<Loan> {
        let now = time_provider.now();
        let mut refreshed = Vec::new();

        for mut loan in self.store.list_by_owner(owner) {
            if loan.is_archived || loan.is_returned() {
                continue;
            }

            let terms = loan.terms.clone();
            if let Err(e) = loan.recompute(terms, &self.engine, now) {
                warn!(loan_id = %loan.id, owner = %owner, error = %e, "skipped loan on refresh");
                continue;
            }
            self.events.emit(Event::AccrualRefreshed {
                loan_id: loan.id,
                months_elapsed: loan.accrual.months_elapsed,
                interest_for_elapsed_months: loan.accrual.interest_for_elapsed_months,
                timestamp: now,
            });
            self.reconcile_status(&mut loan, now);

            self.store.save(loan.clone());
            refreshed.push(loan);
        }

        debug!(owner = %owner, count = refreshed.len(), "refreshed loans");
        refreshed
    }

    /// refresh with system time
    pub fn refresh_now(&mut self, owner: &OwnerId) -> Vec<Loan> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.refresh(owner, &time)
    }

    /// principal rolled up by lender and borrower across the whole store
    pub fn dashboard(&self) -> Result<Vec<LenderSummary>> {
        report::dashboard(&self.store.list_all())
    }

    /// move between active and overdue to match the current accrual
    fn reconcile_status(&mut self, loan: &mut Loan, now: DateTime<Utc>) {
        let past_tenor = loan.is_past_tenor(self.config.overdue_grace_months);

        match loan.status {
            LoanStatus::Active if past_tenor => {
                self.change_status(loan, LoanStatus::Overdue, "tenor elapsed", now);
            }
            LoanStatus::Overdue if !past_tenor => {
                self.change_status(loan, LoanStatus::Active, "tenor extended", now);
            }
            _ => {}
        }
    }

    fn change_status(&mut self, loan: &mut Loan, new_status: LoanStatus, reason: &str, now: DateTime<Utc>) {
        let old_status = loan.status;
        loan.status = new_status;

        self.events.emit(Event::StatusChanged {
            loan_id: loan.id,
            old_status,
            new_status,
            reason: reason.to_string(),
            timestamp: now,
        });
        info!(loan_id = %loan.id, ?old_status, ?new_status, reason, "loan status changed");
    }
}
