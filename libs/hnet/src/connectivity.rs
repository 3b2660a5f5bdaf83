//! Connectivity across hierarchy boundaries.
//!
//! Nets are joined through hierarchical pins: the pin sits on a net at its own
//! level, and its term continues into a net inside the instance. Every walk
//! here is a breadth-first worklist over nets with an explicit visited set, so
//! cyclic net graphs terminate.

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::network::Network;
use crate::visit::{PinCollector, Visitor};
use crate::{LogicValue, NetId, PinId};

/// The nets a pin touches: its own net and the net below its term.
fn pin_seeds<N: Network + ?Sized>(network: &N, pin: PinId) -> Vec<NetId> {
    network
        .pin_net(pin)
        .into_iter()
        .chain(network.pin_term(pin).map(|term| network.term_net(term)))
        .collect()
}

/// Explores every net reachable from `seeds`, streaming each distinct pin to `visitor`.
///
/// Returns the visited nets in discovery order.
fn walk<N, V>(network: &N, seeds: &[NetId], visitor: &mut V) -> IndexSet<NetId>
where
    N: Network + ?Sized,
    V: Visitor<PinId>,
{
    let mut visited: IndexSet<NetId> = seeds.iter().copied().collect();
    let mut pins = HashSet::new();
    let mut level: Vec<NetId> = visited.iter().copied().collect();

    while !level.is_empty() {
        let mut next = Vec::new();
        for &net in &level {
            // Down through hierarchical pins on this net.
            for pin in network.net_pins(net) {
                if pins.insert(pin) {
                    visitor.visit(pin);
                }
                if let Some(term) = network.pin_term(pin) {
                    let below = network.term_net(term);
                    if visited.insert(below) {
                        next.push(below);
                    }
                }
            }
            // Up through the pins this net is the inside of.
            for term in network.net_terms(net) {
                let pin = network.term_pin(term);
                match network.pin_net(pin) {
                    Some(above) => {
                        if visited.insert(above) {
                            next.push(above);
                        }
                    }
                    // Top-level ports have nothing above them.
                    None => {
                        if pins.insert(pin) {
                            visitor.visit(pin);
                        }
                    }
                }
            }
        }
        visitor.level_finished();
        level = next;
    }
    visited
}

/// Discards everything it is given.
struct Ignore;

impl<T> Visitor<T> for Ignore {
    fn visit(&mut self, _: T) {}

    fn fork(&self) -> Self {
        Ignore
    }
}

pub(crate) fn connected_nets<N: Network + ?Sized>(network: &N, net: NetId) -> IndexSet<NetId> {
    walk(network, &[net], &mut Ignore)
}

pub(crate) fn connected_nets_of_pin<N: Network + ?Sized>(
    network: &N,
    pin: PinId,
) -> IndexSet<NetId> {
    walk(network, &pin_seeds(network, pin), &mut Ignore)
}

pub(crate) fn is_connected<N: Network + ?Sized>(network: &N, net: NetId, pin: PinId) -> bool {
    let nets = connected_nets(network, net);
    pin_seeds(network, pin)
        .iter()
        .any(|seed| nets.contains(seed))
}

pub(crate) fn is_connected_nets<N: Network + ?Sized>(
    network: &N,
    net1: NetId,
    net2: NetId,
) -> bool {
    net1 == net2 || connected_nets(network, net1).contains(&net2)
}

pub(crate) fn visit_connected_pins<N, V>(network: &N, net: NetId, visitor: &mut V)
where
    N: Network + ?Sized,
    V: Visitor<PinId>,
{
    walk(network, &[net], visitor);
}

/// Like [`visit_connected_pins`], seeded from both sides of `pin`.
///
/// A pin with neither a net nor a term is only connected to itself.
pub(crate) fn visit_connected_pins_of_pin<N, V>(network: &N, pin: PinId, visitor: &mut V)
where
    N: Network + ?Sized,
    V: Visitor<PinId>,
{
    let seeds = pin_seeds(network, pin);
    if seeds.is_empty() {
        visitor.visit(pin);
        visitor.level_finished();
    } else {
        walk(network, &seeds, visitor);
    }
}

pub(crate) fn connected_pins<N: Network + ?Sized>(network: &N, net: NetId) -> IndexSet<PinId> {
    let mut collector = PinCollector::new();
    walk(network, &[net], &mut collector);
    collector.into_pins()
}

pub(crate) fn highest_net_above<N: Network + ?Sized>(network: &N, net: NetId) -> NetId {
    let mut curr = net;
    // Each step moves one level up the instance tree, so this terminates.
    while let Some(above) = network
        .net_terms(curr)
        .find_map(|term| network.pin_net(network.term_pin(term)))
    {
        curr = above;
    }
    curr
}

pub(crate) fn highest_connected_net<N: Network + ?Sized>(network: &N, net: NetId) -> NetId {
    connected_nets(network, net)
        .into_iter()
        .min_by_key(|&n| {
            (
                network.hierarchy_level(network.net_instance(n)),
                network.net_path_name(n),
            )
        })
        .unwrap_or(net)
}

pub(crate) fn constant_pins<N: Network + ?Sized>(network: &N) -> Vec<(PinId, LogicValue)> {
    let mut pins = Vec::new();
    for (net, value) in network.constant_nets() {
        pins.extend(
            connected_pins(network, net)
                .into_iter()
                .filter(|&pin| network.is_leaf_pin(pin))
                .map(|pin| (pin, value)),
        );
    }
    pins
}
