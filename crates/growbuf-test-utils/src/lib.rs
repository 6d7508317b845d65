//! Test utilities and reference models for growbuf development.
//!
//! Provides a drop-counting element type ([`DropLedger`] / [`Tracked`]) for
//! leak and double-drop detection, and an operation [`script`] with a
//! `Vec`-backed [`ReferenceModel`] to replay random scripts against.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub mod script;

pub use script::{ops, Op, ReferenceModel};

#[derive(Default)]
struct Counts {
    created: Cell<usize>,
    dropped: Cell<usize>,
}

/// Shared counter of [`Tracked`] creations and drops.
///
/// Every `Tracked` minted by [`track`](DropLedger::track) (or cloned from
/// one) counts as created; every drop is recorded. A container that leaks
/// shows up as `live() > 0` after it is gone, a double drop as
/// `dropped() > created()`.
#[derive(Clone, Default)]
pub struct DropLedger {
    counts: Rc<Counts>,
}

impl DropLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a tracked element carrying `id`.
    pub fn track(&self, id: u64) -> Tracked {
        self.counts.created.set(self.counts.created.get() + 1);
        Tracked {
            id,
            counts: Rc::clone(&self.counts),
        }
    }

    pub fn created(&self) -> usize {
        self.counts.created.get()
    }

    pub fn dropped(&self) -> usize {
        self.counts.dropped.get()
    }

    /// Tracked elements created but not yet dropped.
    ///
    /// # Panics
    ///
    /// Panics if more elements were dropped than created.
    pub fn live(&self) -> usize {
        self.created()
            .checked_sub(self.dropped())
            .expect("more drops than creations: double drop")
    }
}

/// An element that reports its drop to a [`DropLedger`].
pub struct Tracked {
    id: u64,
    counts: Rc<Counts>,
}

impl Tracked {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.counts.created.set(self.counts.created.get() + 1);
        Self {
            id: self.id,
            counts: Rc::clone(&self.counts),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counts.dropped.set(self.counts.dropped.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.id)
    }
}
