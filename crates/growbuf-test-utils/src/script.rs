//! Random operation scripts and a reference model to check them against.
//!
//! - [`Op`] — one buffer operation with its arguments.
//! - [`ops`] — proptest strategy producing scripts of [`Op`]s.
//! - [`ReferenceModel`] — `Vec<i32>`-backed model of the expected contents
//!   and of which operations a buffer must accept or reject.

use proptest::prelude::*;

/// A single buffer operation.
///
/// Indices are drawn from a small range so that scripts exercise both
/// accepted and rejected requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Push(i32),
    Pop,
    Insert(usize, i32),
    Remove(usize),
    Erase(usize, usize),
    Reserve(usize),
    Resize(usize),
    ShrinkToFit,
    Clear,
}

/// Strategy producing a single [`Op`], weighted towards pushes so buffers
/// actually fill up.
pub fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => any::<i32>().prop_map(Op::Push),
        2 => Just(Op::Pop),
        3 => (0usize..24, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        2 => (0usize..24).prop_map(Op::Remove),
        2 => (0usize..24, 0usize..12).prop_map(|(i, n)| Op::Erase(i, n)),
        1 => (0usize..48).prop_map(Op::Reserve),
        1 => (0usize..48).prop_map(Op::Resize),
        1 => Just(Op::ShrinkToFit),
        1 => Just(Op::Clear),
    ]
}

/// Strategy producing scripts of up to `max_len` operations.
pub fn ops(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op(), 0..=max_len)
}

/// Expected buffer contents after each [`Op`].
#[derive(Clone, Debug, Default)]
pub struct ReferenceModel {
    items: Vec<i32>,
}

impl ReferenceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `op` and report whether a conforming buffer accepts it.
    ///
    /// Rejected operations leave the model unchanged.
    pub fn apply(&mut self, op: &Op) -> bool {
        let len = self.items.len();
        match *op {
            Op::Push(v) => {
                self.items.push(v);
                true
            }
            Op::Pop => self.items.pop().is_some(),
            Op::Insert(i, v) => {
                if i >= len {
                    return false;
                }
                self.items.insert(i, v);
                true
            }
            Op::Remove(i) => {
                if i >= len {
                    return false;
                }
                self.items.remove(i);
                true
            }
            Op::Erase(i, n) => {
                let in_bounds = i < len && i.checked_add(n).is_some_and(|end| end <= len);
                if !in_bounds {
                    return false;
                }
                self.items.drain(i..i + n);
                true
            }
            Op::Reserve(_) | Op::ShrinkToFit => true,
            Op::Resize(n) => {
                self.items.truncate(n);
                true
            }
            Op::Clear => {
                self.items.clear();
                true
            }
        }
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
