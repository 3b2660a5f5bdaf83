//! Instance tree navigation built on the adapter primitives.

use itertools::Itertools;

use crate::network::Network;
use crate::{InstanceId, NetId, PinId};

/// The instances from `instance` up to, but excluding, the top instance.
pub(crate) fn instance_path<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
) -> Vec<InstanceId> {
    let mut path = Vec::new();
    let mut curr = instance;
    while let Some(parent) = network.parent(curr) {
        path.push(curr);
        curr = parent;
    }
    path
}

pub(crate) fn instance_path_name<N: Network + ?Sized>(network: &N, instance: InstanceId) -> String {
    instance_path(network, instance)
        .into_iter()
        .rev()
        .map(|inst| network.instance_name(inst))
        .join(network.path_divider().encode_utf8(&mut [0; 4]))
}

/// Joins an instance path name and a local name.
fn qualify<N: Network + ?Sized>(network: &N, instance: InstanceId, name: &str) -> String {
    if network.is_top_instance(instance) {
        name.to_string()
    } else {
        format!(
            "{}{}{}",
            instance_path_name(network, instance),
            network.path_divider(),
            name
        )
    }
}

pub(crate) fn pin_path_name<N: Network + ?Sized>(network: &N, pin: PinId) -> String {
    qualify(
        network,
        network.pin_instance(pin),
        network.port_name(network.pin_port(pin)),
    )
}

pub(crate) fn net_path_name<N: Network + ?Sized>(network: &N, net: NetId) -> String {
    qualify(network, network.net_instance(net), network.net_name(net))
}

pub(crate) fn is_inside<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    hier_instance: InstanceId,
) -> bool {
    let mut curr = Some(instance);
    while let Some(inst) = curr {
        if inst == hier_instance {
            return true;
        }
        curr = network.parent(inst);
    }
    false
}

/// Every instance below `instance`, in depth-first pre-order.
pub(crate) fn descendants<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
) -> Vec<InstanceId> {
    let mut found = Vec::new();
    let mut stack: Vec<InstanceId> = network.children(instance).collect();
    stack.reverse();
    while let Some(inst) = stack.pop() {
        found.push(inst);
        let mark = stack.len();
        stack.extend(network.children(inst));
        stack[mark..].reverse();
    }
    found
}

/// Iterates over the leaf instances below an instance, depth first.
pub struct LeafInstances<'a, N: ?Sized> {
    network: &'a N,
    stack: Vec<InstanceId>,
}

impl<'a, N: Network + ?Sized> LeafInstances<'a, N> {
    pub(crate) fn new(network: &'a N, instance: InstanceId) -> Self {
        let mut stack: Vec<InstanceId> = network.children(instance).collect();
        stack.reverse();
        Self { network, stack }
    }
}

impl<N: Network + ?Sized> Iterator for LeafInstances<'_, N> {
    type Item = InstanceId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(inst) = self.stack.pop() {
            if self.network.is_leaf_instance(inst) {
                return Some(inst);
            }
            let mark = self.stack.len();
            self.stack.extend(self.network.children(inst));
            self.stack[mark..].reverse();
        }
        None
    }
}
