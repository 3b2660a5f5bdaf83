//! Name and pattern lookups.
//!
//! These are linear scans over the adapter's iterators. Results always come
//! back in declaration order; nothing here sorts.

use std::borrow::Cow;

use pattern::PatternMatch;
use tracing::{span, Level};

use crate::hier;
use crate::network::Network;
use crate::path::PathSyntax;
use crate::port::{parse_bus_bit, PortKind};
use crate::{CellId, InstanceId, LibraryId, NetId, PinId, PortId};

/// Rebuilds one segment of a hierarchical pattern with the same case rule.
fn segment_pattern(pattern: &PatternMatch, segment: &str) -> PatternMatch {
    PatternMatch::glob_with_case(segment, pattern.is_nocase())
}

/// Rewrites escaped dividers in glob text so they match the escaped form names
/// are stored with.
///
/// The glob escape and the path escape are both `\` by default. The glob would
/// otherwise consume the path escape and compare against a bare divider.
fn keep_escaped_dividers(syntax: PathSyntax, text: &str) -> Option<String> {
    if syntax.escape != '\\' {
        return None;
    }
    let mut out = String::with_capacity(text.len() + 4);
    let mut changed = false;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c != syntax.escape {
            continue;
        }
        match chars.next() {
            Some(next) if next == syntax.divider => {
                out.push('\\');
                out.push('\\');
                out.push(next);
                changed = true;
            }
            Some(next) => out.push(next),
            None => {}
        }
    }
    changed.then_some(out)
}

/// The pattern to compare against stored local names.
///
/// Only call this where a pattern meets names, never on text that is split
/// further, so escapes are rewritten exactly once.
fn stored_form<'p, N: Network + ?Sized>(
    network: &N,
    pattern: &'p PatternMatch,
) -> Cow<'p, PatternMatch> {
    if pattern.is_regex() {
        return Cow::Borrowed(pattern);
    }
    match keep_escaped_dividers(network.path_syntax(), pattern.as_str()) {
        Some(text) => Cow::Owned(PatternMatch::glob_with_case(text, pattern.is_nocase())),
        None => Cow::Borrowed(pattern),
    }
}

/// Splits a glob pattern at its last divider. Regular expressions never split.
fn split_last<'a, N: Network + ?Sized>(
    network: &N,
    pattern: &'a PatternMatch,
) -> Option<(&'a str, &'a str)> {
    if pattern.is_regex() {
        return None;
    }
    network.path_syntax().path_name_last(pattern.as_str())
}

pub(crate) fn cells_matching<N: Network + ?Sized>(
    network: &N,
    library: LibraryId,
    pattern: &PatternMatch,
) -> Vec<CellId> {
    if let Some(name) = pattern.literal() {
        return network.find_cell(library, &name).into_iter().collect();
    }
    network
        .library_cells(library)
        .filter(|&cell| pattern.matches(network.cell_name(cell)))
        .collect()
}

pub(crate) fn port_named<N: Network + ?Sized>(
    network: &N,
    cell: CellId,
    name: &str,
) -> Option<PortId> {
    if let Some(port) = network
        .cell_ports(cell)
        .find(|&port| network.port_name(port) == name)
    {
        return Some(port);
    }
    let (bus_name, index) = parse_bus_bit(name)?;
    let bus = network
        .cell_ports(cell)
        .find(|&port| network.port_name(port) == bus_name)?;
    network.find_bus_bit(bus, index)
}

/// Declared ports matching `pattern`. Bus bits are only considered when the
/// pattern itself contains a subscript.
pub(crate) fn ports_matching<N: Network + ?Sized>(
    network: &N,
    cell: CellId,
    pattern: &PatternMatch,
) -> Vec<PortId> {
    let bits = pattern.as_str().contains('[');
    let mut matches = Vec::new();
    for port in network.cell_ports(cell) {
        if pattern.matches(network.port_name(port)) {
            matches.push(port);
        }
        if bits && matches!(network.port_kind(port), PortKind::Bus { .. }) {
            matches.extend(
                network
                    .port_members(port)
                    .filter(|&bit| pattern.matches(network.port_name(bit))),
            );
        }
    }
    matches
}

pub(crate) fn port_bits<N: Network + ?Sized>(network: &N, cell: CellId) -> Vec<PortId> {
    let mut bits = Vec::new();
    for port in network.cell_ports(cell) {
        match network.port_kind(port) {
            PortKind::Scalar | PortKind::BusBit { .. } => bits.push(port),
            PortKind::Bus { .. } => bits.extend(network.port_members(port)),
            // Bundle members are declared ports of the cell in their own right.
            PortKind::Bundle => {}
        }
    }
    bits
}

/// Walks `segments` down from `instance` by child name.
fn descend<'a, N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    segments: impl IntoIterator<Item = &'a str>,
) -> Option<InstanceId> {
    segments
        .into_iter()
        .try_fold(instance, |inst, name| network.find_child(inst, name))
}

pub(crate) fn instance_relative<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    path: &str,
) -> Option<InstanceId> {
    let segments = network.path_syntax().segments(path)?;
    descend(network, instance, segments)
}

pub(crate) fn pin_relative<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    path: &str,
) -> Option<PinId> {
    let mut segments = network.path_syntax().segments(path)?;
    let port_name = segments.pop()?;
    let inst = descend(network, instance, segments)?;
    network.find_pin_named(inst, port_name)
}

pub(crate) fn net_relative<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    path: &str,
) -> Option<NetId> {
    let mut segments = network.path_syntax().segments(path)?;
    let net_name = segments.pop()?;
    let inst = descend(network, instance, segments)?;
    network.find_net_named(inst, net_name)
}

pub(crate) fn children_matching<N: Network + ?Sized>(
    network: &N,
    parent: InstanceId,
    pattern: &PatternMatch,
) -> Vec<InstanceId> {
    let pattern = stored_form(network, pattern);
    if let Some(name) = pattern.literal() {
        return network.find_child(parent, &name).into_iter().collect();
    }
    network
        .children(parent)
        .filter(|&child| pattern.matches(network.instance_name(child)))
        .collect()
}

pub(crate) fn instances_matching<N: Network + ?Sized>(
    network: &N,
    context: InstanceId,
    pattern: &PatternMatch,
) -> Vec<InstanceId> {
    let segments = match network.path_syntax().segments(pattern.as_str()) {
        Some(segments) if segments.len() > 1 && !pattern.is_regex() => segments,
        Some(_) => return children_matching(network, context, pattern),
        None => return Vec::new(),
    };
    let mut level = vec![context];
    for segment in segments {
        let segment = segment_pattern(pattern, segment);
        level = level
            .into_iter()
            .flat_map(|inst| children_matching(network, inst, &segment))
            .collect();
    }
    level
}

pub(crate) fn instances_hier_matching<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    pattern: &PatternMatch,
) -> Vec<InstanceId> {
    let _guard = span!(Level::DEBUG, "matching instances hierarchically", %pattern).entered();
    let pattern = stored_form(network, pattern);
    hier::descendants(network, instance)
        .into_iter()
        .filter(|&inst| pattern.matches(network.instance_name(inst)))
        .collect()
}

fn instance_pins_matching<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    pattern: &PatternMatch,
) -> Vec<PinId> {
    let pattern = stored_form(network, pattern);
    network
        .instance_pins(instance)
        .filter(|&pin| pattern.matches(network.port_name(network.pin_port(pin))))
        .collect()
}

pub(crate) fn pins_matching<N: Network + ?Sized>(
    network: &N,
    context: InstanceId,
    pattern: &PatternMatch,
) -> Vec<PinId> {
    match split_last(network, pattern) {
        Some((head, last)) => {
            let port_pattern = segment_pattern(pattern, last);
            instances_matching(network, context, &segment_pattern(pattern, head))
                .into_iter()
                .flat_map(|inst| instance_pins_matching(network, inst, &port_pattern))
                .collect()
        }
        None => instance_pins_matching(network, context, pattern),
    }
}

pub(crate) fn pins_hier_matching<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    pattern: &PatternMatch,
) -> Vec<PinId> {
    let _guard = span!(Level::DEBUG, "matching pins hierarchically", %pattern).entered();
    let pattern = stored_form(network, pattern);
    let divider = network.path_divider();
    let mut matches = Vec::new();
    for inst in hier::descendants(network, instance) {
        let inst_name = network.instance_name(inst);
        for pin in network.instance_pins(inst) {
            let port_name = network.port_name(network.pin_port(pin));
            if pattern.matches(&format!("{inst_name}{divider}{port_name}")) {
                matches.push(pin);
            }
        }
    }
    matches
}

pub(crate) fn instance_nets_matching<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    pattern: &PatternMatch,
) -> Vec<NetId> {
    let pattern = stored_form(network, pattern);
    if let Some(name) = pattern.literal() {
        return network.find_net_named(instance, &name).into_iter().collect();
    }
    network
        .instance_nets(instance)
        .filter(|&net| pattern.matches(network.net_name(net)))
        .collect()
}

pub(crate) fn nets_matching<N: Network + ?Sized>(
    network: &N,
    context: InstanceId,
    pattern: &PatternMatch,
) -> Vec<NetId> {
    match split_last(network, pattern) {
        Some((head, last)) => {
            let net_pattern = segment_pattern(pattern, last);
            instances_matching(network, context, &segment_pattern(pattern, head))
                .into_iter()
                .flat_map(|inst| network.find_instance_nets_matching(inst, &net_pattern))
                .collect()
        }
        None => network.find_instance_nets_matching(context, pattern),
    }
}

pub(crate) fn nets_hier_matching<N: Network + ?Sized>(
    network: &N,
    instance: InstanceId,
    pattern: &PatternMatch,
) -> Vec<NetId> {
    let _guard = span!(Level::DEBUG, "matching nets hierarchically", %pattern).entered();
    std::iter::once(instance)
        .chain(hier::descendants(network, instance))
        .flat_map(|inst| network.find_instance_nets_matching(inst, pattern))
        .collect()
}
