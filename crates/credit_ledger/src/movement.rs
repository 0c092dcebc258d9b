//! Movement: an atomic signed change to one credit batch.

use uuid::Uuid;

/// The five kinds of movement a batch can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKind {
    Add,
    Consume,
    Expire,
    Refund,
    Renew,
}

impl MovementKind {
    /// `+1` for value-increasing kinds, `-1` for value-decreasing kinds.
    fn sign(self) -> i64 {
        match self {
            MovementKind::Add | MovementKind::Refund | MovementKind::Renew => 1,
            MovementKind::Consume | MovementKind::Expire => -1,
        }
    }
}

/// A single, immutable-once-appended change to a batch's remaining value.
///
/// `amount` is always the non-negative magnitude; `signed_delta` carries
/// the direction implied by `kind`. Construction normalizes both from
/// whatever magnitude the caller passes in, so callers never need to
/// pre-negate amounts for CONSUME/EXPIRE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    id: Option<Uuid>,
    kind: MovementKind,
    amount: u64,
    signed_delta: i64,
    description: String,
    target_type: String,
    target_id: String,
    operation_id: Uuid,
}

impl Movement {
    /// Builds a movement. `target` is `None` for untargeted movements
    /// (ADD, EXPIRE, RENEW); CONSUME and REFUND pass `Some((type, id))`.
    pub fn new(
        kind: MovementKind,
        amount: u64,
        description: impl Into<String>,
        target: Option<(String, String)>,
        operation_id: Uuid,
    ) -> Self {
        let (target_type, target_id) = target.unwrap_or_default();
        Self {
            id: None,
            kind,
            amount,
            signed_delta: kind.sign() * amount as i64,
            description: description.into(),
            target_type,
            target_id,
            operation_id,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn signed_delta(&self) -> i64 {
        self.signed_delta
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// True when neither half of the target key is set — an untargeted
    /// movement can never participate in a refund.
    pub fn is_untargeted(&self) -> bool {
        self.target_type.is_empty() && self.target_id.is_empty()
    }

    pub fn operation_id(&self) -> Uuid {
        self.operation_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_normalizes_to_positive_delta() {
        let m = Movement::new(MovementKind::Add, 10, "add", None, Uuid::new_v4());
        assert_eq!(m.amount(), 10);
        assert_eq!(m.signed_delta(), 10);
    }

    #[test]
    fn consume_normalizes_to_negative_delta() {
        let m = Movement::new(
            MovementKind::Consume,
            7,
            "consume",
            Some(("booking".into(), "B1".into())),
            Uuid::new_v4(),
        );
        assert_eq!(m.amount(), 7);
        assert_eq!(m.signed_delta(), -7);
        assert!(!m.is_untargeted());
    }

    #[test]
    fn untargeted_movement_has_empty_target() {
        let m = Movement::new(MovementKind::Expire, 3, "expire", None, Uuid::new_v4());
        assert!(m.is_untargeted());
    }
}
