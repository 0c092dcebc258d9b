use uuid::Uuid;

use crate::cache::CacheInvalidator;
use crate::error::CreditError;
use crate::repository::Repository;

pub struct RefundCreditInput {
    pub tenant_id: Uuid,
    pub owner_id: Uuid,
    pub target_type: String,
    pub target_id: String,
}

pub struct RefundCreditOutput {
    pub account_id: Uuid,
    pub new_balance: i64,
}

/// Reverses every settled CONSUME recorded against `(target_type,
/// target_id)`. Idempotent: refunding a target twice is a no-op the
/// second time (P3).
pub struct RefundCreditUseCase<'a, R: Repository, C: CacheInvalidator> {
    repository: &'a mut R,
    cache: &'a C,
}

impl<'a, R: Repository, C: CacheInvalidator> RefundCreditUseCase<'a, R, C> {
    pub fn new(repository: &'a mut R, cache: &'a C) -> Self {
        Self { repository, cache }
    }

    pub fn execute(&mut self, input: RefundCreditInput) -> Result<RefundCreditOutput, CreditError> {
        let mut account = self
            .repository
            .load_account_by_tenant(input.tenant_id)?
            .ok_or_else(|| CreditError::InvalidInput(format!("unknown tenant {}", input.tenant_id)))?;

        account.refund(&input.target_type, &input.target_id);
        self.repository.persist_refunds(&mut account)?;
        self.cache.invalidate(input.tenant_id, None);

        tracing::info!(
            account_id = %input.tenant_id,
            owner_id = %input.owner_id,
            target_type = %input.target_type,
            target_id = %input.target_id,
            "credit refunded"
        );

        Ok(RefundCreditOutput {
            account_id: input.tenant_id,
            new_balance: account.balance(None),
        })
    }
}
