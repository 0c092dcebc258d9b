//! OperationHistory: a read-only audit projection grouped by kind.
//!
//! Reconstructed on load; does not drive the aggregate. Mirrors the
//! operation/movement split in Design Note 9.3: one logical `Operation`
//! (identified by `operation_id`) can fan out to many `Movement`s across
//! batches.

use std::collections::HashMap;

use uuid::Uuid;

use crate::account::CreditAccount;
use crate::movement::{Movement, MovementKind};

/// One logical call to the aggregate and every movement it produced.
#[derive(Debug, Clone)]
pub struct Operation {
    pub operation_id: Uuid,
    pub kind: MovementKind,
    pub movements: Vec<Movement>,
}

/// Map from movement kind to the operations of that kind, built once
/// from an account's current batches.
#[derive(Debug, Default)]
pub struct OperationHistory {
    by_kind: HashMap<MovementKind, Vec<Operation>>,
}

impl OperationHistory {
    /// Groups every movement across `account`'s batches by
    /// `operation_id`, then indexes the resulting operations by kind.
    pub fn build(account: &CreditAccount) -> Self {
        let mut grouped: HashMap<Uuid, Vec<Movement>> = HashMap::new();
        for batch in account.batches() {
            for movement in batch.movements() {
                grouped
                    .entry(movement.operation_id())
                    .or_default()
                    .push(movement.clone());
            }
        }

        let mut by_kind: HashMap<MovementKind, Vec<Operation>> = HashMap::new();
        for (operation_id, movements) in grouped {
            let kind = movements[0].kind();
            by_kind.entry(kind).or_default().push(Operation {
                operation_id,
                kind,
                movements,
            });
        }

        Self { by_kind }
    }

    /// The distinct movement kinds present in this history.
    pub fn kinds(&self) -> impl Iterator<Item = &MovementKind> {
        self.by_kind.keys()
    }

    /// Every operation of a given kind, in no particular order.
    pub fn operations_of(&self, kind: MovementKind) -> &[Operation] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if `needle` appears, by value, in any recorded operation.
    pub fn contains_movement(&self, needle: &Movement) -> bool {
        self.iter().any(|op| op.movements.contains(needle))
    }

    /// Iterates every operation across all kinds.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.by_kind.values().flatten()
    }
}

impl<'a> IntoIterator for &'a OperationHistory {
    type Item = &'a Operation;
    type IntoIter = Box<dyn Iterator<Item = &'a Operation> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
