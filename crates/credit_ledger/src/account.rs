//! CreditAccount: the aggregate root over a tenant's credit batches.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::CreditError;
use crate::movement::Movement;
use crate::transaction::CreditTransaction;

/// Aggregate over a tenant's credit batches. Owns `batches` exclusively;
/// batches are only ever appended, never removed.
///
/// `id` equals the tenant/company id in this domain — there is no
/// separate surrogate key.
#[derive(Debug, Clone)]
pub struct CreditAccount {
    id: Uuid,
    reference_date: NaiveDate,
    batches: Vec<CreditTransaction>,
}

impl CreditAccount {
    /// A brand-new account with no batches yet.
    pub fn new(id: Uuid, reference_date: NaiveDate) -> Self {
        Self {
            id,
            reference_date,
            batches: Vec::new(),
        }
    }

    /// Rehydrates an account from previously persisted batches.
    pub fn restore(id: Uuid, reference_date: NaiveDate, batches: Vec<CreditTransaction>) -> Self {
        Self {
            id,
            reference_date,
            batches,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Moves the account's notion of "now". Exists so callers (tests,
    /// batch jobs) can advance past a batch's expiration without waiting
    /// on the wall clock.
    pub fn set_reference_date(&mut self, at: NaiveDate) {
        self.reference_date = at;
    }

    pub fn batches(&self) -> &[CreditTransaction] {
        &self.batches
    }

    pub fn batches_mut(&mut self) -> &mut [CreditTransaction] {
        &mut self.batches
    }

    /// Batches a repository has not yet assigned a persistent id to.
    pub fn pending_batches(&self) -> impl Iterator<Item = &CreditTransaction> {
        self.batches.iter().filter(|b| b.id().is_none())
    }

    /// `(batch_id, movement)` pairs not yet assigned a persistent id —
    /// the set a repository must flush on the next `persist_*` call.
    pub fn pending_movements(&self) -> impl Iterator<Item = (Option<Uuid>, &Movement)> {
        self.batches.iter().flat_map(|b| {
            b.movements()
                .iter()
                .filter(|m| m.id().is_none())
                .map(move |m| (b.id(), m))
        })
    }

    /// Creates a new batch at `reference_date` and appends one ADD
    /// movement. ADD always creates a batch; it never tops up an
    /// existing one. Returns the operation id shared by every movement
    /// this call produces (here, exactly one).
    pub fn add(
        &mut self,
        amount: u64,
        description: &str,
        kind_label: &str,
        contracted_service_id: Option<Uuid>,
    ) -> Uuid {
        let operation_id = Uuid::new_v4();
        let mut batch = CreditTransaction::new(
            self.id,
            kind_label,
            self.reference_date,
            contracted_service_id,
            self.reference_date,
        );
        batch.register_add(amount, description, operation_id);
        tracing::info!(
            account_id = %self.id,
            amount,
            kind_label,
            "credit batch added"
        );
        self.batches.push(batch);
        operation_id
    }

    /// Consumes `amount` across batches, newest-insertion first (§9.1 —
    /// equivalent to FIFO-on-remaining-capacity for tenants whose batches
    /// all expire monthly, since older batches expire and are skipped
    /// first). Fails atomically: on `InsufficientBalance` the account is
    /// left unchanged.
    pub fn consume(
        &mut self,
        amount: u64,
        description: &str,
        consumed_at: Option<NaiveDate>,
        target_type: Option<&str>,
        target_id: Option<&str>,
    ) -> Result<Uuid, CreditError> {
        if amount == 0 || amount as i64 > self.balance(None) {
            return Err(CreditError::InsufficientBalance);
        }

        let operation_id = Uuid::new_v4();
        let ref_date = consumed_at.unwrap_or(self.reference_date);
        let target_type = target_type.unwrap_or("");
        let target_id = target_id.unwrap_or("");
        let mut remaining_demand = amount;

        for batch in self.batches.iter_mut().rev() {
            if remaining_demand == 0 {
                break;
            }
            if batch.remaining_value() < 1 || batch.is_expired(self.reference_date) {
                continue;
            }
            remaining_demand = batch.consume(
                remaining_demand,
                ref_date,
                target_type,
                target_id,
                description,
                operation_id,
                false,
            )?;
        }

        tracing::info!(account_id = %self.id, amount, "credits consumed");
        Ok(operation_id)
    }

    /// Expires every batch whose expiration date has passed. Idempotent.
    ///
    /// `at` is accepted for interface symmetry with the other mutators
    /// but, matching the source this domain was distilled from, expiry
    /// is always evaluated against `reference_date` rather than an
    /// ad-hoc override.
    pub fn expire(&mut self, at: Option<NaiveDate>) {
        let _ = at;
        let operation_id = Uuid::new_v4();
        for batch in self.batches.iter_mut() {
            batch.expire(self.reference_date, operation_id);
        }
    }

    /// Refunds `(target_type, target_id)` across every batch it touched.
    /// The same target can be refunded across several batches (a large
    /// consume may have spanned them) but never twice within one batch.
    pub fn refund(&mut self, target_type: &str, target_id: &str) {
        let operation_id = Uuid::new_v4();
        for batch in self.batches.iter_mut() {
            batch.refund(target_type, target_id, operation_id);
        }
    }

    /// Renews every expired batch that has not already produced a
    /// successor in this session. Equality for the double-renew guard is
    /// `creation_date` identity, since a freshly-renewed successor has no
    /// persistent id yet.
    pub fn renew(&mut self) {
        let operation_id = Uuid::new_v4();
        let successors: Vec<CreditTransaction> = self
            .batches
            .iter()
            .filter(|b| b.is_expired(self.reference_date))
            .map(|b| b.renew(operation_id))
            .collect();

        for successor in successors {
            if self
                .batches
                .iter()
                .any(|b| b.creation_date() == successor.creation_date())
            {
                continue;
            }
            tracing::debug!(
                account_id = %self.id,
                creation_date = %successor.creation_date(),
                "credit batch renewed"
            );
            self.batches.push(successor);
        }
    }

    /// Σ remaining_value of every non-expired batch at `at` (default
    /// `reference_date`).
    pub fn balance(&self, at: Option<NaiveDate>) -> i64 {
        let at = at.unwrap_or(self.reference_date);
        self.batches
            .iter()
            .filter(|b| !b.is_expired(at))
            .map(CreditTransaction::remaining_value)
            .sum()
    }

    /// Σ remaining_value of every expired batch, as of `reference_date`.
    pub fn count_expired(&self) -> i64 {
        self.batches
            .iter()
            .filter(|b| b.is_expired(self.reference_date))
            .map(CreditTransaction::remaining_value)
            .sum()
    }
}
