use chrono::NaiveDate;
use uuid::Uuid;

use crate::cache::CacheInvalidator;
use crate::error::CreditError;
use crate::repository::Repository;

pub struct ConsumeCreditInput {
    pub tenant_id: Uuid,
    pub amount: u64,
    pub owner_id: Uuid,
    pub description: String,
    pub consumed_at: Option<NaiveDate>,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
}

pub struct ConsumeCreditOutput {
    pub account_id: Uuid,
    pub operation_id: Uuid,
    pub new_balance: i64,
}

/// Spends credit against a tenant's account. Fails with
/// [`CreditError::InvalidInput`] if the tenant has no account yet —
/// unlike `add`, consume never provisions one implicitly.
pub struct ConsumeCreditUseCase<'a, R: Repository, C: CacheInvalidator> {
    repository: &'a mut R,
    cache: &'a C,
}

impl<'a, R: Repository, C: CacheInvalidator> ConsumeCreditUseCase<'a, R, C> {
    pub fn new(repository: &'a mut R, cache: &'a C) -> Self {
        Self { repository, cache }
    }

    pub fn execute(
        &mut self,
        input: ConsumeCreditInput,
    ) -> Result<ConsumeCreditOutput, CreditError> {
        let mut account = self
            .repository
            .load_account_by_tenant(input.tenant_id)?
            .ok_or_else(|| CreditError::InvalidInput(format!("unknown tenant {}", input.tenant_id)))?;

        let operation_id = account.consume(
            input.amount,
            &input.description,
            input.consumed_at,
            input.target_type.as_deref(),
            input.target_id.as_deref(),
        )?;
        self.repository.persist_consumes(&mut account)?;
        self.cache.invalidate(input.tenant_id, None);

        tracing::info!(
            account_id = %input.tenant_id,
            owner_id = %input.owner_id,
            operation_id = %operation_id,
            amount = input.amount,
            "credit consumed"
        );

        Ok(ConsumeCreditOutput {
            account_id: input.tenant_id,
            operation_id,
            new_balance: account.balance(None),
        })
    }
}
