//! Repository port (§4.5) and an in-memory reference adapter.
//!
//! The port is the only contract the core depends on for persistence; a
//! relational adapter is out of scope (§1). `InMemoryRepository` is
//! reference/test infrastructure in the same spirit as the original's
//! `InMemoryCreditAccountRepository` — it exists so the use-case layer
//! and this crate's own tests can run without a real database, not as
//! the production persistence adapter.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::account::CreditAccount;
use crate::error::CreditError;
use crate::movement::MovementKind;
use crate::transaction::CreditTransaction;

/// Contract the aggregate is saved and loaded through. Every
/// `persist_*` call must be atomic with respect to other writers to the
/// same account (§5) — a guarantee this trait assumes of its
/// implementations rather than enforces.
pub trait Repository {
    /// Loads the live view of a tenant's account: batches whose
    /// expiration date has not yet passed `reference_date` (§6c). `None`
    /// if the tenant has no account yet.
    fn load_account_by_tenant(
        &self,
        tenant_id: Uuid,
    ) -> Result<Option<CreditAccount>, CreditError>;

    /// Persists a brand-new, batch-less account and assigns it whatever
    /// identity the adapter uses going forward.
    fn create_account(&mut self, account: &mut CreditAccount) -> Result<(), CreditError>;

    /// Flushes pending ADD movements (and the batches they created).
    fn persist_adds(&mut self, account: &mut CreditAccount) -> Result<(), CreditError>;

    /// Flushes pending CONSUME movements.
    fn persist_consumes(&mut self, account: &mut CreditAccount) -> Result<(), CreditError>;

    /// Flushes pending REFUND movements.
    fn persist_refunds(&mut self, account: &mut CreditAccount) -> Result<(), CreditError>;

    /// Flushes pending EXPIRE movements and any RENEW successor batches
    /// created alongside them (see DESIGN.md for why RENEW rides with
    /// EXPIRE rather than getting its own `persist_renews`).
    fn persist_expires(&mut self, account: &mut CreditAccount) -> Result<(), CreditError>;
}

/// In-memory `Repository` implementation for tests and local
/// development. Stores one `Vec<CreditTransaction>` per tenant; no
/// separate `CreditAccountRow`/`CreditRow`/`CreditLog` split since there
/// is no relational schema to denormalize into.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    accounts: HashMap<Uuid, Vec<CreditTransaction>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Historical reconstruction with no expiration-date filter (§6c),
    /// for audit views built from [`crate::history::OperationHistory`].
    pub fn load_full_history(&self, tenant_id: Uuid, at: NaiveDate) -> Option<CreditAccount> {
        self.accounts
            .get(&tenant_id)
            .map(|batches| CreditAccount::restore(tenant_id, at, batches.clone()))
    }

    fn assign_pending_ids(&self, account: &mut CreditAccount, kinds: &[MovementKind]) {
        for batch in account.batches_mut() {
            let has_pending = batch
                .movements()
                .iter()
                .any(|m| m.id().is_none() && kinds.contains(&m.kind()));
            if !has_pending {
                continue;
            }
            if batch.id().is_none() {
                batch.set_id(Uuid::new_v4());
            }
            for movement in batch.movements_mut() {
                if movement.id().is_none() && kinds.contains(&movement.kind()) {
                    movement.set_id(Uuid::new_v4());
                }
            }
        }
    }

    fn snapshot(&mut self, account: &CreditAccount) {
        self.accounts
            .insert(account.id(), account.batches().to_vec());
    }
}

impl Repository for InMemoryRepository {
    fn load_account_by_tenant(
        &self,
        tenant_id: Uuid,
    ) -> Result<Option<CreditAccount>, CreditError> {
        let Some(batches) = self.accounts.get(&tenant_id) else {
            return Ok(None);
        };
        let today = Utc::now().date_naive();
        let live: Vec<CreditTransaction> = batches
            .iter()
            .filter(|b| b.expiration_date() >= today)
            .cloned()
            .collect();
        Ok(Some(CreditAccount::restore(tenant_id, today, live)))
    }

    fn create_account(&mut self, account: &mut CreditAccount) -> Result<(), CreditError> {
        if self.accounts.contains_key(&account.id()) {
            return Err(CreditError::RepositoryFailure(format!(
                "account {} already exists",
                account.id()
            )));
        }
        self.snapshot(account);
        Ok(())
    }

    fn persist_adds(&mut self, account: &mut CreditAccount) -> Result<(), CreditError> {
        self.assign_pending_ids(account, &[MovementKind::Add]);
        self.snapshot(account);
        Ok(())
    }

    fn persist_consumes(&mut self, account: &mut CreditAccount) -> Result<(), CreditError> {
        self.assign_pending_ids(account, &[MovementKind::Consume]);
        self.snapshot(account);
        Ok(())
    }

    fn persist_refunds(&mut self, account: &mut CreditAccount) -> Result<(), CreditError> {
        self.assign_pending_ids(account, &[MovementKind::Refund]);
        self.snapshot(account);
        Ok(())
    }

    fn persist_expires(&mut self, account: &mut CreditAccount) -> Result<(), CreditError> {
        self.assign_pending_ids(account, &[MovementKind::Expire, MovementKind::Renew]);
        self.snapshot(account);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn create_then_load_round_trips_an_empty_account() {
        let mut repo = InMemoryRepository::new();
        let tenant_id = Uuid::new_v4();
        let mut account = CreditAccount::new(tenant_id, d(2022, 10, 1));
        repo.create_account(&mut account).unwrap();

        let loaded = repo.load_account_by_tenant(tenant_id).unwrap().unwrap();
        assert_eq!(loaded.id(), tenant_id);
        assert!(loaded.batches().is_empty());
    }

    #[test]
    fn persist_adds_assigns_ids_and_clears_pending() {
        let mut repo = InMemoryRepository::new();
        let tenant_id = Uuid::new_v4();
        let mut account = CreditAccount::new(tenant_id, d(2022, 10, 1));
        repo.create_account(&mut account).unwrap();

        account.add(10, "sub", "subscription", None);
        assert_eq!(account.pending_movements().count(), 1);
        repo.persist_adds(&mut account).unwrap();
        assert_eq!(account.pending_movements().count(), 0);
        assert!(account.batches()[0].id().is_some());
    }

    #[test]
    fn create_account_twice_fails() {
        let mut repo = InMemoryRepository::new();
        let tenant_id = Uuid::new_v4();
        let mut account = CreditAccount::new(tenant_id, d(2022, 10, 1));
        repo.create_account(&mut account).unwrap();
        let mut dup = CreditAccount::new(tenant_id, d(2022, 10, 1));
        let err = repo.create_account(&mut dup).unwrap_err();
        assert!(matches!(err, CreditError::RepositoryFailure(_)));
    }

    #[test]
    fn load_account_by_tenant_filters_expired_batches_live_view() {
        let mut repo = InMemoryRepository::new();
        let tenant_id = Uuid::new_v4();
        let mut account = CreditAccount::new(tenant_id, d(2000, 1, 1));
        repo.create_account(&mut account).unwrap();
        account.add(10, "sub", "subscription", None);
        repo.persist_adds(&mut account).unwrap();

        // a batch created in the year 2000 is long expired by "today".
        let loaded = repo.load_account_by_tenant(tenant_id).unwrap().unwrap();
        assert!(loaded.batches().is_empty());

        let full_history = repo
            .load_full_history(tenant_id, Utc::now().date_naive())
            .unwrap();
        assert_eq!(full_history.batches().len(), 1);
    }
}
