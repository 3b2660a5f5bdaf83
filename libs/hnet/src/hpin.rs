//! Leaf drivers and loads through hierarchical pins.
//!
//! A [`HierTraversal`] walks the hierarchical net graph breadth first from a
//! net or from a hierarchical pin and records, for every leaf driver and leaf
//! load it reaches, the hierarchical pins crossed on the way. Breadth-first
//! order means each recorded path crosses as few hierarchy boundaries as
//! possible.

use std::collections::{HashMap, VecDeque};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::network::Network;
use crate::{NetId, PinId};

/// Which side of the query pin a result was found on.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Side {
    /// On the net the pin connects to at its own level.
    Above,
    /// Inside the pin's instance, past its term.
    Below,
}

/// The results of one hierarchical traversal.
#[derive(Debug, Clone, Default)]
pub struct HierTraversal {
    hier_pin: Option<PinId>,
    drivers: IndexMap<PinId, Vec<PinId>>,
    loads: IndexMap<PinId, Vec<PinId>>,
    hier_pins: IndexSet<PinId>,
    sides: HashMap<PinId, Side>,
}

/// A net queued for exploration, with the hierarchical pins crossed to reach it.
struct Frontier {
    net: NetId,
    path: Vec<PinId>,
    side: Option<Side>,
}

impl HierTraversal {
    /// Traverses everything connected to `net`.
    pub fn from_net<N: Network + ?Sized>(network: &N, net: NetId) -> Self {
        let mut traversal = Self::default();
        traversal.run(
            network,
            vec![Frontier {
                net,
                path: Vec::new(),
                side: None,
            }],
        );
        traversal
    }

    /// Traverses everything connected through `hier_pin`, on both of its sides.
    ///
    /// `hier_pin` is the last element of every driver path and the first element
    /// of every load path.
    pub fn from_hier_pin<N: Network + ?Sized>(network: &N, hier_pin: PinId) -> Self {
        let mut traversal = Self {
            hier_pin: Some(hier_pin),
            ..Self::default()
        };
        traversal.hier_pins.insert(hier_pin);
        let above = network.pin_net(hier_pin).map(|net| Frontier {
            net,
            path: vec![hier_pin],
            side: Some(Side::Above),
        });
        let below = network.pin_term(hier_pin).map(|term| Frontier {
            net: network.term_net(term),
            path: vec![hier_pin],
            side: Some(Side::Below),
        });
        traversal.run(network, above.into_iter().chain(below).collect());
        traversal
    }

    fn run<N: Network + ?Sized>(&mut self, network: &N, seeds: Vec<Frontier>) {
        let mut visited: IndexSet<NetId> = seeds.iter().map(|seed| seed.net).collect();
        let mut queue: VecDeque<Frontier> = seeds.into();

        while let Some(Frontier { net, path, side }) = queue.pop_front() {
            for pin in network.net_pins(net) {
                if Some(pin) == self.hier_pin {
                    continue;
                }
                match network.pin_term(pin) {
                    Some(term) => {
                        self.hier_pins.insert(pin);
                        let below = network.term_net(term);
                        if visited.insert(below) {
                            queue.push_back(Frontier {
                                net: below,
                                path: extend(&path, pin),
                                side,
                            });
                        }
                    }
                    None => self.reach(network, pin, &path, side),
                }
            }
            for term in network.net_terms(net) {
                let pin = network.term_pin(term);
                if Some(pin) == self.hier_pin {
                    continue;
                }
                match network.pin_net(pin) {
                    Some(above) => {
                        self.hier_pins.insert(pin);
                        if visited.insert(above) {
                            queue.push_back(Frontier {
                                net: above,
                                path: extend(&path, pin),
                                side,
                            });
                        }
                    }
                    None => self.reach(network, pin, &path, side),
                }
            }
        }
    }

    /// Records a pin with no further hierarchy to cross.
    ///
    /// `path` runs from the query point to the pin.
    fn reach<N: Network + ?Sized>(
        &mut self,
        network: &N,
        pin: PinId,
        path: &[PinId],
        side: Option<Side>,
    ) {
        let mut recorded = false;
        if network.is_driver(pin) && !self.drivers.contains_key(&pin) {
            self.drivers
                .insert(pin, path.iter().rev().copied().collect());
            recorded = true;
        }
        if network.is_load(pin) && !self.loads.contains_key(&pin) {
            self.loads.insert(pin, path.to_vec());
            recorded = true;
        }
        if let (true, Some(side)) = (recorded, side) {
            self.sides.entry(pin).or_insert(side);
        }
    }

    /// The hierarchical pin this traversal started from, if any.
    #[inline]
    pub fn query_pin(&self) -> Option<PinId> {
        self.hier_pin
    }

    /// Every reached leaf driver, with the hierarchical pins from the driver to the query point.
    #[inline]
    pub fn drivers(&self) -> &IndexMap<PinId, Vec<PinId>> {
        &self.drivers
    }

    /// Every reached leaf load, with the hierarchical pins from the query point to the load.
    #[inline]
    pub fn loads(&self) -> &IndexMap<PinId, Vec<PinId>> {
        &self.loads
    }

    /// Every hierarchical pin the traversal crossed.
    #[inline]
    pub fn hier_pins(&self) -> &IndexSet<PinId> {
        &self.hier_pins
    }

    /// The side of the query pin a driver or load was found on.
    ///
    /// Always [`None`] for traversals that started from a net.
    #[inline]
    pub fn side(&self, pin: PinId) -> Option<Side> {
        self.sides.get(&pin).copied()
    }
}

fn extend(path: &[PinId], pin: PinId) -> Vec<PinId> {
    let mut path = path.to_vec();
    path.push(pin);
    path
}

/// A driver and a load connected through hierarchy.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HierDrvrLoad {
    /// The hierarchical pin the pair was found through, for pin queries.
    pub hier_pin: Option<PinId>,
    /// The leaf driver.
    pub driver: PinId,
    /// The leaf load.
    pub load: PinId,
    /// Hierarchical pins crossed from the driver to the query point.
    pub driver_hier_pins: Vec<PinId>,
    /// Hierarchical pins crossed from the query point to the load.
    pub load_hier_pins: Vec<PinId>,
}

/// Calls `f` for every driver and load on opposite sides of `hier_pin`.
pub fn visit_drvr_loads_thru_hier_pin<N, F>(network: &N, hier_pin: PinId, mut f: F)
where
    N: Network + ?Sized,
    F: FnMut(HierDrvrLoad),
{
    let traversal = HierTraversal::from_hier_pin(network, hier_pin);
    for (&driver, driver_path) in traversal.drivers() {
        for (&load, load_path) in traversal.loads() {
            if traversal.side(driver) != traversal.side(load) {
                f(HierDrvrLoad {
                    hier_pin: Some(hier_pin),
                    driver,
                    load,
                    driver_hier_pins: driver_path.clone(),
                    load_hier_pins: load_path.clone(),
                });
            }
        }
    }
}

/// Calls `f` for every pair of distinct driver and load pins connected to `net`.
pub fn visit_drvr_loads_thru_net<N, F>(network: &N, net: NetId, mut f: F)
where
    N: Network + ?Sized,
    F: FnMut(HierDrvrLoad),
{
    let traversal = HierTraversal::from_net(network, net);
    for (&driver, driver_path) in traversal.drivers() {
        for (&load, load_path) in traversal.loads() {
            if driver != load {
                f(HierDrvrLoad {
                    hier_pin: None,
                    driver,
                    load,
                    driver_hier_pins: driver_path.clone(),
                    load_hier_pins: load_path.clone(),
                });
            }
        }
    }
}
