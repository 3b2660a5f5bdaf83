//! Memoized driver sets.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;
use tracing::trace;

use crate::network::Network;
use crate::visit::Visitor;
use crate::{NetId, PinId};

/// Caches the leaf driver pins of each net.
///
/// Entries are published whole under the write lock, so a reader sees either
/// no entry or a complete driver set. Any structural edit must [clear](Self::clear)
/// the cache; edits take `&mut` access to the network, so no reader can hold an
/// entry across one.
#[derive(Debug, Default)]
pub struct DriverCache {
    entries: RwLock<HashMap<NetId, Arc<IndexSet<PinId>>>>,
}

impl DriverCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached driver set.
    pub fn clear(&mut self) {
        let entries = self.entries.get_mut();
        if !entries.is_empty() {
            trace!(entries = entries.len(), "clearing driver cache");
            entries.clear();
        }
    }

    /// The number of nets with a cached driver set.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns `true` if the drivers of `net` are cached.
    pub fn contains(&self, net: NetId) -> bool {
        self.entries.read().contains_key(&net)
    }

    pub(crate) fn get(&self, net: NetId) -> Option<Arc<IndexSet<PinId>>> {
        self.entries.read().get(&net).cloned()
    }

    /// Publishes `drivers` for `net` unless another reader got there first.
    ///
    /// Returns the set that ends up cached.
    pub(crate) fn publish(&self, net: NetId, drivers: IndexSet<PinId>) -> Arc<IndexSet<PinId>> {
        self.entries
            .write()
            .entry(net)
            .or_insert_with(|| Arc::new(drivers))
            .clone()
    }
}

/// Keeps the driver pins it is shown.
struct DriverVisitor<'a, N: ?Sized> {
    network: &'a N,
    drivers: IndexSet<PinId>,
}

impl<N: Network + ?Sized> Visitor<PinId> for DriverVisitor<'_, N> {
    fn visit(&mut self, pin: PinId) {
        if self.network.is_driver(pin) {
            self.drivers.insert(pin);
        }
    }

    fn fork(&self) -> Self {
        Self {
            network: self.network,
            drivers: IndexSet::new(),
        }
    }
}

pub(crate) fn drivers<N: Network + ?Sized>(network: &N, net: NetId) -> Arc<IndexSet<PinId>> {
    let cache = network.driver_cache();
    if let Some(drivers) = cache.get(net) {
        trace!(%net, "driver cache hit");
        return drivers;
    }
    trace!(%net, "driver cache miss");
    let mut visitor = DriverVisitor {
        network,
        drivers: IndexSet::new(),
    };
    network.visit_connected_pins(net, &mut visitor);
    cache.publish(net, visitor.drivers)
}

pub(crate) fn pin_drivers<N: Network + ?Sized>(
    network: &N,
    pin: PinId,
) -> Option<Arc<IndexSet<PinId>>> {
    let net = network
        .pin_net(pin)
        .or_else(|| network.pin_term(pin).map(|term| network.term_net(term)))?;
    Some(drivers(network, net))
}
