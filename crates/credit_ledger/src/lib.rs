//! Prepaid credit account ledger.
//!
//! `CreditAccount` is the aggregate root over a tenant's credit
//! batches (`CreditTransaction`), each an append-only list of signed
//! `Movement`s. Credit is added in batches that expire on a calendar
//! anchor day one month out, consumed newest-batch-first, and can be
//! refunded or renewed; `OperationHistory` reconstructs an audit view
//! from the movements already on an account. The `usecase` module wires
//! the aggregate to a `Repository` and a `CacheInvalidator` the way a
//! real service would call it.

pub mod account;
pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod movement;
pub mod repository;
pub mod transaction;
pub mod usecase;

pub use account::CreditAccount;
pub use cache::{CacheInvalidator, LoggingCacheInvalidator, NoopCacheInvalidator};
pub use config::AccountConfig;
pub use error::CreditError;
pub use history::{Operation, OperationHistory};
pub use movement::{Movement, MovementKind};
pub use repository::{InMemoryRepository, Repository};
pub use transaction::CreditTransaction;
