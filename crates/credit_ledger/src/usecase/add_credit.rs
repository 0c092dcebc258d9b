use uuid::Uuid;

use crate::account::CreditAccount;
use crate::cache::CacheInvalidator;
use crate::config::AccountConfig;
use crate::error::CreditError;
use crate::repository::Repository;

pub struct AddCreditInput {
    pub tenant_id: Uuid,
    pub amount: u64,
    pub owner_id: Uuid,
    pub description: String,
    pub kind_label: Option<String>,
    pub contracted_service_id: Option<Uuid>,
}

pub struct AddCreditOutput {
    pub account_id: Uuid,
    pub operation_id: Uuid,
    pub new_balance: i64,
}

/// Adds a credit batch to a tenant's account, creating the account first
/// if this is its first credit (mirrors `AddCreditUseCase` in the
/// original: create-on-first-use rather than a separate provisioning
/// step).
pub struct AddCreditUseCase<'a, R: Repository, C: CacheInvalidator> {
    repository: &'a mut R,
    cache: &'a C,
    config: &'a AccountConfig,
}

impl<'a, R: Repository, C: CacheInvalidator> AddCreditUseCase<'a, R, C> {
    pub fn new(repository: &'a mut R, cache: &'a C, config: &'a AccountConfig) -> Self {
        Self {
            repository,
            cache,
            config,
        }
    }

    pub fn execute(&mut self, input: AddCreditInput) -> Result<AddCreditOutput, CreditError> {
        if input.amount == 0 {
            return Err(CreditError::InvalidInput(
                "add amount must be positive".to_string(),
            ));
        }
        if self.config.max_movement_amount > 0 && input.amount > self.config.max_movement_amount {
            return Err(CreditError::InvalidInput(format!(
                "add amount {} exceeds configured maximum {}",
                input.amount, self.config.max_movement_amount
            )));
        }

        let mut account = match self.repository.load_account_by_tenant(input.tenant_id)? {
            Some(account) => account,
            None => {
                let mut fresh = CreditAccount::new(input.tenant_id, today());
                self.repository.create_account(&mut fresh)?;
                fresh
            }
        };

        let kind_label = input
            .kind_label
            .unwrap_or_else(|| self.config.default_kind_label.clone());
        let operation_id = account.add(
            input.amount,
            &input.description,
            &kind_label,
            input.contracted_service_id,
        );
        self.repository.persist_adds(&mut account)?;
        self.cache.invalidate(input.tenant_id, None);

        tracing::info!(
            account_id = %input.tenant_id,
            owner_id = %input.owner_id,
            operation_id = %operation_id,
            amount = input.amount,
            "add credit recorded"
        );

        Ok(AddCreditOutput {
            account_id: input.tenant_id,
            operation_id,
            new_balance: account.balance(None),
        })
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}
