//! Streaming traversal results to consumers.
//!
//! Traversals hand each result to a [`Visitor`] instead of building an
//! intermediate collection. A visitor can be [forked](Visitor::fork) so that one
//! traversal's results can be split across parallel consumers; forks never
//! share mutable state with the visitor they came from.

use indexmap::IndexSet;
use rayon::prelude::*;

use crate::PinId;

/// A consumer of traversal results.
pub trait Visitor<T> {
    /// Delivers one result.
    fn visit(&mut self, item: T);

    /// Called when a breadth-first traversal finishes one level.
    fn level_finished(&mut self) {}

    /// Returns an independent visitor of the same kind.
    ///
    /// The fork must not share mutable state with `self`.
    fn fork(&self) -> Self
    where
        Self: Sized;
}

/// Collects visited pins into an ordered set.
///
/// This is the default consumer for callers that want a container
/// rather than a stream.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PinCollector {
    pins: IndexSet<PinId>,
    levels: usize,
}

impl PinCollector {
    /// Creates an empty collector.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The pins collected so far, in visit order.
    #[inline]
    pub fn pins(&self) -> &IndexSet<PinId> {
        &self.pins
    }

    /// Consumes the collector, returning the collected pins.
    #[inline]
    pub fn into_pins(self) -> IndexSet<PinId> {
        self.pins
    }

    /// The number of completed traversal levels observed.
    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Appends the pins of another collector (typically a fork) to this one.
    pub fn absorb(&mut self, other: PinCollector) {
        self.pins.extend(other.pins);
        self.levels = self.levels.max(other.levels);
    }
}

impl Visitor<PinId> for PinCollector {
    fn visit(&mut self, pin: PinId) {
        self.pins.insert(pin);
    }

    fn level_finished(&mut self) {
        self.levels += 1;
    }

    fn fork(&self) -> Self {
        Self::new()
    }
}

/// Adapts a cloneable closure into a [`Visitor`].
///
/// Forking clones the closure, so each fork owns its own copy of whatever the
/// closure captured by value.
#[derive(Debug, Clone)]
pub struct FnVisitor<F>(pub F);

impl<T, F: FnMut(T) + Clone> Visitor<T> for FnVisitor<F> {
    fn visit(&mut self, item: T) {
        (self.0)(item)
    }

    fn fork(&self) -> Self {
        self.clone()
    }
}

/// Visits `items` in parallel, giving each worker chunk its own fork of `visitor`.
///
/// Returns the forks in chunk order so the caller can merge their results.
/// Within a chunk, items are visited in slice order.
pub fn par_visit<T, V>(items: &[T], visitor: &V) -> Vec<V>
where
    T: Copy + Sync,
    V: Visitor<T> + Send + Sync,
{
    let chunk = items.len().div_ceil(rayon::current_num_threads()).max(1);
    items
        .par_chunks(chunk)
        .map(|chunk| {
            let mut fork = visitor.fork();
            for item in chunk {
                fork.visit(*item);
            }
            fork
        })
        .collect()
}
