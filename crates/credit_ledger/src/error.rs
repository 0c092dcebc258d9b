//! Crate-wide error type.
//!
//! Mirrors the teacher contract's flat `Error` enum with grouped numeric
//! codes, expressed through `thiserror` rather than `#[contracterror]`
//! since there is no host environment to serialize error codes across.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreditError {
    /// `consume` requested more than the account's current balance, or a
    /// non-positive amount.
    #[error("requested consume amount exceeds available balance")]
    InsufficientBalance,

    /// A consume was attempted against a batch outside the replay path
    /// while the batch was already expired. Unreachable in normal flow
    /// because `CreditAccount::consume` skips expired batches.
    #[error("cannot consume from an expired credit batch")]
    ExpiredBatch,

    /// Negative amounts, malformed ids, or an operation addressed at an
    /// unknown tenant.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Wraps a failure surfaced by a `Repository` implementation.
    #[error("repository operation failed: {0}")]
    RepositoryFailure(String),
}

impl CreditError {
    /// Stable numeric code for callers that want to report errors across
    /// a wire boundary without downcasting the error type.
    pub const fn to_code(&self) -> u32 {
        match self {
            CreditError::InsufficientBalance => 402,
            CreditError::ExpiredBatch => 410,
            CreditError::InvalidInput(_) => 400,
            CreditError::RepositoryFailure(_) => 500,
        }
    }
}
