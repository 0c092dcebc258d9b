//! Application layer: one use case per operation exposed at the crate's
//! boundary, each following load -> mutate -> persist -> invalidate-cache
//! (grounded in the original's `add_credit_uc.py`/`consume_credit_uc.py`,
//! and split into per-concern files the way the teacher splits
//! `admin.rs`/`merchant.rs`).

mod add_credit;
mod consume_credit;
mod expire_renew;
mod refund_credit;

pub use add_credit::{AddCreditInput, AddCreditOutput, AddCreditUseCase};
pub use consume_credit::{ConsumeCreditInput, ConsumeCreditOutput, ConsumeCreditUseCase};
pub use expire_renew::{ExpireRenewInput, ExpireRenewOutput, ExpireRenewUseCase};
pub use refund_credit::{RefundCreditInput, RefundCreditOutput, RefundCreditUseCase};
