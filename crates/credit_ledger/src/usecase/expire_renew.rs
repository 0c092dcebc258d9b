use uuid::Uuid;

use crate::cache::CacheInvalidator;
use crate::error::CreditError;
use crate::repository::Repository;

pub struct ExpireRenewInput {
    pub tenant_id: Uuid,
    pub owner_id: Uuid,
    /// When true, a renewed successor batch is created for every batch
    /// that just expired (mirrors running `renew` immediately after
    /// `expire` in the same session, as the original's scheduled job
    /// does for tenants with an active subscription).
    pub renew_expired: bool,
}

pub struct ExpireRenewOutput {
    pub account_id: Uuid,
    pub new_balance: i64,
    pub expired_value: i64,
}

/// Scheduled-job use case (§4.4/§4.5's `persist_expires`): expires every
/// batch past its expiration date and, optionally, renews it in the same
/// pass. Both `expire` and `renew` are idempotent, so re-running this
/// use case for the same tenant twice in a day is safe.
pub struct ExpireRenewUseCase<'a, R: Repository, C: CacheInvalidator> {
    repository: &'a mut R,
    cache: &'a C,
}

impl<'a, R: Repository, C: CacheInvalidator> ExpireRenewUseCase<'a, R, C> {
    pub fn new(repository: &'a mut R, cache: &'a C) -> Self {
        Self { repository, cache }
    }

    pub fn execute(&mut self, input: ExpireRenewInput) -> Result<ExpireRenewOutput, CreditError> {
        let mut account = self
            .repository
            .load_account_by_tenant(input.tenant_id)?
            .ok_or_else(|| CreditError::InvalidInput(format!("unknown tenant {}", input.tenant_id)))?;

        account.expire(None);
        if input.renew_expired {
            account.renew();
        }
        self.repository.persist_expires(&mut account)?;
        self.cache.invalidate(input.tenant_id, None);

        tracing::info!(
            account_id = %input.tenant_id,
            owner_id = %input.owner_id,
            renewed = input.renew_expired,
            "credit expiration pass complete"
        );

        Ok(ExpireRenewOutput {
            account_id: input.tenant_id,
            new_balance: account.balance(None),
            expired_value: account.count_expired(),
        })
    }
}
