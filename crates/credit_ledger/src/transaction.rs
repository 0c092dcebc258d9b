//! CreditTransaction: a single credit batch and its movement history.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::error::CreditError;
use crate::movement::{Movement, MovementKind};

/// A batch of credit issued once (by ADD or RENEW) with a single
/// expiration date, plus the append-only list of movements against it.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditTransaction {
    id: Option<Uuid>,
    account_id: Uuid,
    kind_label: String,
    creation_date: NaiveDate,
    contract_service_id: Option<Uuid>,
    contract_service_creation_date: NaiveDate,
    movements: Vec<Movement>,
}

impl CreditTransaction {
    pub fn new(
        account_id: Uuid,
        kind_label: impl Into<String>,
        creation_date: NaiveDate,
        contract_service_id: Option<Uuid>,
        contract_service_creation_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            account_id,
            kind_label: kind_label.into(),
            creation_date,
            contract_service_id,
            contract_service_creation_date,
            movements: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    pub fn account_id(&self) -> Uuid {
        self.account_id
    }

    pub fn kind_label(&self) -> &str {
        &self.kind_label
    }

    pub fn creation_date(&self) -> NaiveDate {
        self.creation_date
    }

    pub fn contract_service_id(&self) -> Option<Uuid> {
        self.contract_service_id
    }

    pub fn contract_service_creation_date(&self) -> NaiveDate {
        self.contract_service_creation_date
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn movements_mut(&mut self) -> &mut [Movement] {
        &mut self.movements
    }

    /// Appends the single ADD movement a batch is seeded with at
    /// creation. Not exposed as `pub` outside the crate: `CreditAccount`
    /// is the only caller, since ADD always happens as part of creating
    /// a new batch (§4.3).
    pub(crate) fn register_add(&mut self, amount: u64, description: &str, operation_id: Uuid) {
        self.movements.push(Movement::new(
            MovementKind::Add,
            amount,
            description,
            None,
            operation_id,
        ));
    }

    /// Σ signed_delta of every movement recorded against this batch.
    pub fn remaining_value(&self) -> i64 {
        self.movements.iter().map(Movement::signed_delta).sum()
    }

    /// The last day of `(year, month)`, used to clamp the anchor day.
    fn last_day_of_month(year: i32, month: u32) -> u32 {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .expect("valid calendar date")
            .pred_opt()
            .expect("valid calendar date")
            .day()
    }

    /// Deterministic, calendar-only expiration date computation (§4.2):
    /// advance `creation_date` one calendar month, landing on
    /// `contract_service_creation_date`'s anchor day, clamped to the
    /// target month's length.
    pub fn expiration_date(&self) -> NaiveDate {
        let anchor_day = self.contract_service_creation_date.day();
        let base = self.creation_date;
        let (candidate_year, candidate_month) = if base.month() == 12 {
            (base.year() + 1, 1)
        } else {
            (base.year(), base.month() + 1)
        };
        let day = anchor_day.min(Self::last_day_of_month(candidate_year, candidate_month));
        NaiveDate::from_ymd_opt(candidate_year, candidate_month, day).expect("valid calendar date")
    }

    fn has_expire_movement(&self) -> bool {
        self.movements
            .iter()
            .any(|m| m.kind() == MovementKind::Expire)
    }

    /// `ref_date >= expiration_date()` OR the batch already carries an
    /// EXPIRE movement — the EXPIRE movement is absorbing: once set, the
    /// batch stays expired regardless of date math.
    pub fn is_expired(&self, ref_date: NaiveDate) -> bool {
        ref_date >= self.expiration_date() || self.has_expire_movement()
    }

    /// Consumes up to `amount` from this batch. Returns the portion of
    /// `amount` this batch could not cover (0 if fully settled here).
    ///
    /// Fails with [`CreditError::ExpiredBatch`] if the batch is expired
    /// and `allow_expired` is false (the replay/override path used when
    /// a repository rehydrates historical state passes `true`).
    #[allow(clippy::too_many_arguments)]
    pub fn consume(
        &mut self,
        amount: u64,
        ref_date: NaiveDate,
        target_type: &str,
        target_id: &str,
        description: &str,
        operation_id: Uuid,
        allow_expired: bool,
    ) -> Result<u64, CreditError> {
        if self.is_expired(ref_date) && !allow_expired {
            return Err(CreditError::ExpiredBatch);
        }

        let remaining = self.remaining_value().max(0) as u64;
        let settled = remaining.min(amount);
        if settled > 0 {
            self.movements.push(Movement::new(
                MovementKind::Consume,
                settled,
                description,
                Some((target_type.to_string(), target_id.to_string())),
                operation_id,
            ));
        }
        Ok(amount - settled)
    }

    fn can_refund(&self, target_type: &str, target_id: &str) -> bool {
        !self.movements.iter().any(|m| {
            m.kind() == MovementKind::Refund
                && m.target_type() == target_type
                && m.target_id() == target_id
        })
    }

    /// Refunds every settled CONSUME against `(target_type, target_id)`
    /// in this batch with a single REFUND movement. No-op if the target
    /// is untargeted, nothing was consumed against it, or it was already
    /// refunded in this batch (idempotent per §4.2/P3).
    pub fn refund(&mut self, target_type: &str, target_id: &str, operation_id: Uuid) {
        if target_type.is_empty() && target_id.is_empty() {
            return;
        }
        if !self.can_refund(target_type, target_id) {
            return;
        }
        let total: u64 = self
            .movements
            .iter()
            .filter(|m| {
                m.kind() == MovementKind::Consume
                    && m.target_type() == target_type
                    && m.target_id() == target_id
            })
            .map(Movement::amount)
            .sum();
        if total == 0 {
            return;
        }
        self.movements.push(Movement::new(
            MovementKind::Refund,
            total,
            "credits refunded",
            Some((target_type.to_string(), target_id.to_string())),
            operation_id,
        ));
    }

    /// No-op if already expired (the EXPIRE movement is absorbing) or if
    /// `at` has not yet reached the expiration date. Otherwise drains the
    /// batch to zero with a single EXPIRE movement (idempotent, P4).
    pub fn expire(&mut self, at: NaiveDate, operation_id: Uuid) {
        if self.has_expire_movement() {
            return;
        }
        if !self.is_expired(at) {
            return;
        }
        let remaining = self.remaining_value().max(0) as u64;
        self.movements.push(Movement::new(
            MovementKind::Expire,
            remaining,
            "credits expired",
            None,
            operation_id,
        ));
    }

    /// Produces a successor batch seeded with a RENEW movement equal to
    /// the sum of this batch's ADD+RENEW movements — the original
    /// subscription quantum, not the remaining balance.
    pub fn renew(&self, operation_id: Uuid) -> CreditTransaction {
        let add_equivalent: u64 = self
            .movements
            .iter()
            .filter(|m| matches!(m.kind(), MovementKind::Add | MovementKind::Renew))
            .map(Movement::amount)
            .sum();

        let mut successor = CreditTransaction::new(
            self.account_id,
            self.kind_label.clone(),
            self.expiration_date(),
            self.contract_service_id,
            self.contract_service_creation_date,
        );
        successor.movements.push(Movement::new(
            MovementKind::Renew,
            add_equivalent,
            "credits renewed",
            None,
            operation_id,
        ));
        successor
    }

    /// Alias of [`Self::remaining_value`], named to match the domain
    /// vocabulary used by callers outside this module.
    pub fn get_remaining_value(&self) -> i64 {
        self.remaining_value()
    }

    /// CONSUME movements settled against this batch.
    pub fn get_consumed_movements(&self) -> Vec<&Movement> {
        self.movements
            .iter()
            .filter(|m| m.kind() == MovementKind::Consume)
            .collect()
    }

    /// Σ magnitude of settled CONSUME movements.
    pub fn get_consumed_value(&self) -> u64 {
        self.get_consumed_movements()
            .iter()
            .map(|m| m.amount())
            .sum()
    }
}
