//! The network adapter.
//!
//! [`Network`] is the interface between connectivity analysis and whatever
//! holds the design data. A backing store implements the required methods,
//! which are cheap primitive queries: names, parent/child navigation, the
//! pin/net/port linkage, directions, and iteration. Every other method has a
//! default implementation written purely in terms of those primitives, so a
//! minimal adapter is complete, just possibly slower than one that overrides
//! lookups with its own indexes.
//!
//! Hierarchy is a tree of instances rooted at the top instance. Each instance
//! owns nets at its own level, and a pin of an instance connects to at most
//! one net in the instance's parent. When the instance is hierarchical, a
//! terminal (term) continues the pin into a net inside the instance.
//!
//! Handles passed to the required methods must be live; stores may panic on
//! stale handles. Lookups by name never panic and return [`None`] on a miss.

use std::cmp::Ordering;
use std::sync::Arc;

use indexmap::IndexSet;
use pattern::PatternMatch;

use crate::drivers::{self, DriverCache};
use crate::path::PathSyntax;
use crate::port::{index_in_range, PortKind};
use crate::visit::Visitor;
use crate::{connectivity, find, hier};
use crate::{
    CellId, InstanceId, LibraryId, LogicValue, NetId, PinId, PortDirection, PortId, TermId,
    VertexId,
};

/// Read access to a hierarchical netlist.
pub trait Network {
    // Libraries.

    /// Iterates over libraries in the order they were read.
    fn libraries(&self) -> impl Iterator<Item = LibraryId> + '_;
    /// The name of a library.
    fn library_name(&self, library: LibraryId) -> &str;
    /// Finds a library by name.
    fn find_library(&self, name: &str) -> Option<LibraryId>;
    /// Iterates over the cells of a library in declaration order.
    fn library_cells(&self, library: LibraryId) -> impl Iterator<Item = CellId> + '_;
    /// Finds a cell of a library by name.
    fn find_cell(&self, library: LibraryId, name: &str) -> Option<CellId>;
    /// The library used to look up defaults, if one has been chosen.
    fn default_library(&self) -> Option<LibraryId>;

    // Cells.

    /// The name of a cell.
    fn cell_name(&self, cell: CellId) -> &str;
    /// The library that contains a cell.
    fn cell_library(&self, cell: CellId) -> LibraryId;
    /// Returns `true` if instances of the cell have no internal hierarchy.
    fn is_leaf_cell(&self, cell: CellId) -> bool;
    /// Iterates over the declared ports of a cell (not bus bits).
    fn cell_ports(&self, cell: CellId) -> impl Iterator<Item = PortId> + '_;

    // Ports.

    /// The name of a port. Bus bits are named `bus[index]`.
    fn port_name(&self, port: PortId) -> &str;
    /// The cell a port belongs to.
    fn port_cell(&self, port: PortId) -> CellId;
    /// The direction of a port.
    fn port_direction(&self, port: PortId) -> PortDirection;
    /// Whether the port is scalar, a bus, a bus bit or a bundle.
    fn port_kind(&self, port: PortId) -> PortKind;
    /// Iterates over the bits of a bus (`from` to `to`) or the members of a bundle.
    fn port_members(&self, port: PortId) -> impl Iterator<Item = PortId> + '_;

    // Instances.

    /// The root of the instance tree, once the design is linked.
    fn top_instance(&self) -> Option<InstanceId>;
    /// The name of an instance, local to its parent.
    fn instance_name(&self, instance: InstanceId) -> &str;
    /// The cell an instance instantiates.
    fn instance_cell(&self, instance: InstanceId) -> CellId;
    /// The parent of an instance; [`None`] only for the top instance.
    fn parent(&self, instance: InstanceId) -> Option<InstanceId>;
    /// Iterates over the children of an instance in declaration order.
    fn children(&self, instance: InstanceId) -> impl Iterator<Item = InstanceId> + '_;
    /// Iterates over the pins of an instance.
    fn instance_pins(&self, instance: InstanceId) -> impl Iterator<Item = PinId> + '_;
    /// Iterates over the nets declared inside an instance.
    fn instance_nets(&self, instance: InstanceId) -> impl Iterator<Item = NetId> + '_;

    // Pins.

    /// The port a pin connects.
    fn pin_port(&self, pin: PinId) -> PortId;
    /// The instance a pin belongs to.
    fn pin_instance(&self, pin: PinId) -> InstanceId;
    /// The net the pin is connected to at its own level.
    fn pin_net(&self, pin: PinId) -> Option<NetId>;
    /// The terminal continuing a hierarchical pin inside its instance.
    fn pin_term(&self, pin: PinId) -> Option<TermId>;
    /// The timing graph vertex built for a pin.
    fn vertex_id(&self, pin: PinId) -> Option<VertexId>;
    /// Records the timing graph vertex built for a pin.
    fn set_vertex_id(&mut self, pin: PinId, vertex: VertexId);

    // Terminals.

    /// The pin (on the parent side) a terminal belongs to.
    fn term_pin(&self, term: TermId) -> PinId;
    /// The net inside the instance a terminal connects.
    fn term_net(&self, term: TermId) -> NetId;

    // Nets.

    /// The name of a net, without any hierarchy prefix.
    fn net_name(&self, net: NetId) -> &str;
    /// The instance a net is declared in.
    fn net_instance(&self, net: NetId) -> InstanceId;
    /// Iterates over the pins on a net (port, leaf and hierarchical).
    fn net_pins(&self, net: NetId) -> impl Iterator<Item = PinId> + '_;
    /// Iterates over the terminals that connect a net up to its instance's pins.
    fn net_terms(&self, net: NetId) -> impl Iterator<Item = TermId> + '_;

    /// The driver cache owned by this network.
    fn driver_cache(&self) -> &DriverCache;

    ////////////////////////////////////////////////////////////////
    // Everything below has a default implementation.

    /// Divider between instance names in a hierarchical path name.
    fn path_divider(&self) -> char {
        '/'
    }

    /// Escape prefix for dividers inside names.
    fn path_escape(&self) -> char {
        '\\'
    }

    /// The path syntax of this network.
    fn path_syntax(&self) -> PathSyntax {
        PathSyntax::new(self.path_divider(), self.path_escape())
    }

    /// Returns `true` once the design hierarchy has a top instance.
    fn is_linked(&self) -> bool {
        self.top_instance().is_some()
    }

    /// Iterates over nets tied to logic constants.
    fn constant_nets(&self) -> impl Iterator<Item = (NetId, LogicValue)> + '_ {
        std::iter::empty()
    }

    // Library and cell lookups.

    /// Searches the libraries in read order for a cell by name.
    fn find_any_cell(&self, name: &str) -> Option<CellId> {
        self.libraries().find_map(|lib| self.find_cell(lib, name))
    }

    /// Cells of `library` whose names match `pattern`, in declaration order.
    fn find_cells_matching(&self, library: LibraryId, pattern: &PatternMatch) -> Vec<CellId> {
        find::cells_matching(self, library, pattern)
    }

    /// Finds a port by name, including bus bit names such as `D[3]`.
    fn find_port(&self, cell: CellId, name: &str) -> Option<PortId> {
        find::port_named(self, cell, name)
    }

    /// Ports of `cell` matching `pattern`, including matching bus bits.
    fn find_ports_matching(&self, cell: CellId, pattern: &PatternMatch) -> Vec<PortId> {
        find::ports_matching(self, cell, pattern)
    }

    /// Every bit port of a cell, with buses expanded.
    fn port_bits(&self, cell: CellId) -> Vec<PortId> {
        find::port_bits(self, cell)
    }

    // Ports.

    /// Returns `true` for buses and bundles.
    fn has_members(&self, port: PortId) -> bool {
        self.port_kind(port).has_members()
    }

    /// The member count of a bus or bundle; 1 for bit ports.
    fn port_size(&self, port: PortId) -> usize {
        if self.has_members(port) {
            self.port_members(port).count()
        } else {
            1
        }
    }

    /// Returns `true` if `index` is within the range of a bus port.
    fn bus_index_in_range(&self, port: PortId, index: i32) -> bool {
        match self.port_kind(port) {
            PortKind::Bus { from, to } => index_in_range(index, from, to),
            _ => false,
        }
    }

    /// Finds bit `index` of a bus port.
    fn find_bus_bit(&self, port: PortId, index: i32) -> Option<PortId> {
        if !self.bus_index_in_range(port, index) {
            return None;
        }
        self.port_members(port).find(|&bit| {
            matches!(self.port_kind(bit), PortKind::BusBit { index: i, .. } if i == index)
        })
    }

    // Instances.

    /// Returns `true` for the top instance.
    fn is_top_instance(&self, instance: InstanceId) -> bool {
        self.parent(instance).is_none()
    }

    /// Returns `true` if the instance has no internal hierarchy.
    fn is_leaf_instance(&self, instance: InstanceId) -> bool {
        self.is_leaf_cell(self.instance_cell(instance))
    }

    /// Returns `true` if the instance has an internal view.
    fn is_hierarchical_instance(&self, instance: InstanceId) -> bool {
        !self.is_leaf_instance(instance)
    }

    /// Finds a child instance by name.
    fn find_child(&self, parent: InstanceId, name: &str) -> Option<InstanceId> {
        self.children(parent)
            .find(|&child| self.instance_name(child) == name)
    }

    /// Finds an instance by its path from the top instance.
    fn find_instance(&self, path: &str) -> Option<InstanceId> {
        self.find_instance_relative(self.top_instance()?, path)
    }

    /// Finds an instance by its path relative to `instance`.
    fn find_instance_relative(&self, instance: InstanceId, path: &str) -> Option<InstanceId> {
        find::instance_relative(self, instance, path)
    }

    /// Children of `parent` whose names match `pattern`.
    fn find_children_matching(
        &self,
        parent: InstanceId,
        pattern: &PatternMatch,
    ) -> Vec<InstanceId> {
        find::children_matching(self, parent, pattern)
    }

    /// Instances below `context` matching a possibly hierarchical pattern.
    ///
    /// Each divider-separated segment of the pattern matches one level.
    fn find_instances_matching(
        &self,
        context: InstanceId,
        pattern: &PatternMatch,
    ) -> Vec<InstanceId> {
        find::instances_matching(self, context, pattern)
    }

    /// Every descendant of `instance` whose local name matches `pattern`.
    fn find_instances_hier_matching(
        &self,
        instance: InstanceId,
        pattern: &PatternMatch,
    ) -> Vec<InstanceId> {
        find::instances_hier_matching(self, instance, pattern)
    }

    /// The instances from `instance` up to the top instance (exclusive).
    fn instance_path(&self, instance: InstanceId) -> Vec<InstanceId> {
        hier::instance_path(self, instance)
    }

    /// Depth of an instance below the top instance.
    fn hierarchy_level(&self, instance: InstanceId) -> usize {
        self.instance_path(instance).len()
    }

    /// The hierarchical path name of an instance. The top instance's is empty.
    fn instance_path_name(&self, instance: InstanceId) -> String {
        hier::instance_path_name(self, instance)
    }

    /// Compares instances by path name.
    fn instance_path_cmp(&self, a: InstanceId, b: InstanceId) -> Ordering {
        self.instance_path_name(a).cmp(&self.instance_path_name(b))
    }

    /// Is `instance` inside `hier_instance` (or the same instance)?
    fn is_inside(&self, instance: InstanceId, hier_instance: InstanceId) -> bool {
        hier::is_inside(self, instance, hier_instance)
    }

    /// Iterates over every leaf instance below `instance`.
    fn leaf_instances(&self, instance: InstanceId) -> hier::LeafInstances<'_, Self> {
        hier::LeafInstances::new(self, instance)
    }

    /// The number of instances in the design, excluding the top instance.
    fn instance_count(&self) -> usize {
        self.top_instance()
            .map(|top| hier::descendants(self, top).len())
            .unwrap_or_default()
    }

    /// The number of leaf instances in the design.
    fn leaf_instance_count(&self) -> usize {
        self.top_instance()
            .map(|top| self.leaf_instances(top).count())
            .unwrap_or_default()
    }

    // Pins.

    /// The direction of a pin's port.
    fn pin_direction(&self, pin: PinId) -> PortDirection {
        self.port_direction(self.pin_port(pin))
    }

    /// Finds the pin of `instance` for the port named `port_name`.
    fn find_pin_named(&self, instance: InstanceId, port_name: &str) -> Option<PinId> {
        self.instance_pins(instance)
            .find(|&pin| self.port_name(self.pin_port(pin)) == port_name)
    }

    /// Finds the pin of `instance` for `port`.
    fn find_pin_for_port(&self, instance: InstanceId, port: PortId) -> Option<PinId> {
        self.instance_pins(instance)
            .find(|&pin| self.pin_port(pin) == port)
    }

    /// Finds a pin by path name (`instance_path/port`) from the top instance.
    ///
    /// A path with no divider names a port of the top instance.
    fn find_pin(&self, path: &str) -> Option<PinId> {
        self.find_pin_relative(self.top_instance()?, path)
    }

    /// Finds a pin by path name relative to `instance`.
    fn find_pin_relative(&self, instance: InstanceId, path: &str) -> Option<PinId> {
        find::pin_relative(self, instance, path)
    }

    /// Pins below `context` matching `inst_pattern/port_pattern`.
    fn find_pins_matching(&self, context: InstanceId, pattern: &PatternMatch) -> Vec<PinId> {
        find::pins_matching(self, context, pattern)
    }

    /// Every pin below `instance` whose `instance_name/port_name` matches `pattern`.
    fn find_pins_hier_matching(&self, instance: InstanceId, pattern: &PatternMatch) -> Vec<PinId> {
        find::pins_hier_matching(self, instance, pattern)
    }

    /// The path name of a pin: `instance_path/port`, or the port name for top-level ports.
    fn pin_path_name(&self, pin: PinId) -> String {
        hier::pin_path_name(self, pin)
    }

    /// Compares pins by path name.
    fn pin_path_cmp(&self, a: PinId, b: PinId) -> Ordering {
        self.pin_path_name(a).cmp(&self.pin_path_name(b))
    }

    /// Returns `true` if the pin's instance has no internal hierarchy.
    fn is_leaf_pin(&self, pin: PinId) -> bool {
        self.is_leaf_instance(self.pin_instance(pin))
    }

    /// Returns `true` if the pin's instance has an internal view.
    fn is_hierarchical_pin(&self, pin: PinId) -> bool {
        self.is_hierarchical_instance(self.pin_instance(pin))
    }

    /// Returns `true` for pins of the top instance.
    fn is_top_level_port(&self, pin: PinId) -> bool {
        self.is_top_instance(self.pin_instance(pin))
    }

    /// Is `pin` inside `hier_instance`?
    fn is_pin_inside(&self, pin: PinId, hier_instance: InstanceId) -> bool {
        self.is_inside(self.pin_instance(pin), hier_instance)
    }

    /// Is `pin` inside the instance `hier_pin` belongs to?
    fn is_pin_inside_hier_pin(&self, pin: PinId, hier_pin: PinId) -> bool {
        let hier_instance = self.pin_instance(hier_pin);
        let instance = self.pin_instance(pin);
        instance != hier_instance && self.is_inside(instance, hier_instance)
    }

    /// Returns `true` if the pin sources a signal onto its net.
    ///
    /// Leaf outputs and top-level inputs are drivers.
    fn is_driver(&self, pin: PinId) -> bool {
        let dir = self.pin_direction(pin);
        (self.is_leaf_pin(pin) && dir.is_any_output())
            || (self.is_top_level_port(pin) && dir.is_any_input())
    }

    /// Returns `true` if the pin sinks a signal from its net.
    ///
    /// Leaf inputs and top-level outputs are loads.
    fn is_load(&self, pin: PinId) -> bool {
        let dir = self.pin_direction(pin);
        (self.is_leaf_pin(pin) && dir.is_any_input())
            || (self.is_top_level_port(pin) && dir.is_any_output())
    }

    /// The number of pins in the design, including top-level ports.
    fn pin_count(&self) -> usize {
        self.top_instance()
            .map(|top| {
                std::iter::once(top)
                    .chain(hier::descendants(self, top))
                    .map(|inst| self.instance_pins(inst).count())
                    .sum()
            })
            .unwrap_or_default()
    }

    /// The number of pins on leaf instances.
    fn leaf_pin_count(&self) -> usize {
        self.top_instance()
            .map(|top| {
                self.leaf_instances(top)
                    .map(|inst| self.instance_pins(inst).count())
                    .sum()
            })
            .unwrap_or_default()
    }

    // Terminals.

    /// The path name of a terminal, which is the path name of its pin.
    fn term_path_name(&self, term: TermId) -> String {
        self.pin_path_name(self.term_pin(term))
    }

    // Nets.

    /// Finds a net declared in `instance` by name.
    fn find_net_named(&self, instance: InstanceId, name: &str) -> Option<NetId> {
        self.instance_nets(instance)
            .find(|&net| self.net_name(net) == name)
    }

    /// Finds a net by path name from the top instance.
    fn find_net(&self, path: &str) -> Option<NetId> {
        self.find_net_relative(self.top_instance()?, path)
    }

    /// Finds a net by path name relative to `instance`.
    fn find_net_relative(&self, instance: InstanceId, path: &str) -> Option<NetId> {
        find::net_relative(self, instance, path)
    }

    /// Nets below `context` matching `inst_pattern/net_pattern`.
    fn find_nets_matching(&self, context: InstanceId, pattern: &PatternMatch) -> Vec<NetId> {
        find::nets_matching(self, context, pattern)
    }

    /// Nets declared in `instance` whose names match `pattern`.
    fn find_instance_nets_matching(
        &self,
        instance: InstanceId,
        pattern: &PatternMatch,
    ) -> Vec<NetId> {
        find::instance_nets_matching(self, instance, pattern)
    }

    /// Every net in or below `instance` whose local name matches `pattern`.
    fn find_nets_hier_matching(&self, instance: InstanceId, pattern: &PatternMatch) -> Vec<NetId> {
        find::nets_hier_matching(self, instance, pattern)
    }

    /// The path name of a net: `instance_path/net`, or the net name in the top instance.
    fn net_path_name(&self, net: NetId) -> String {
        hier::net_path_name(self, net)
    }

    /// Compares nets by path name.
    fn net_path_cmp(&self, a: NetId, b: NetId) -> Ordering {
        self.net_path_name(a).cmp(&self.net_path_name(b))
    }

    /// Is `net` inside `hier_instance`?
    fn is_net_inside(&self, net: NetId, hier_instance: InstanceId) -> bool {
        self.is_inside(self.net_instance(net), hier_instance)
    }

    /// The number of nets in the design.
    fn net_count(&self) -> usize {
        self.top_instance()
            .map(|top| {
                std::iter::once(top)
                    .chain(hier::descendants(self, top))
                    .map(|inst| self.instance_nets(inst).count())
                    .sum()
            })
            .unwrap_or_default()
    }

    // Connectivity.

    /// Is `pin` connected to `net` anywhere in the hierarchy?
    fn is_connected(&self, net: NetId, pin: PinId) -> bool {
        connectivity::is_connected(self, net, pin)
    }

    /// Is `net1` connected to `net2` anywhere in the hierarchy?
    fn is_connected_nets(&self, net1: NetId, net2: NetId) -> bool {
        connectivity::is_connected_nets(self, net1, net2)
    }

    /// Every net hierarchically connected to `net`, including `net` itself.
    fn connected_nets(&self, net: NetId) -> IndexSet<NetId> {
        connectivity::connected_nets(self, net)
    }

    /// Every net hierarchically connected to `pin`.
    fn connected_nets_of_pin(&self, pin: PinId) -> IndexSet<NetId> {
        connectivity::connected_nets_of_pin(self, pin)
    }

    /// Streams every pin connected to `net` to `visitor`, each exactly once.
    fn visit_connected_pins<V: Visitor<PinId>>(&self, net: NetId, visitor: &mut V) {
        connectivity::visit_connected_pins(self, net, visitor)
    }

    /// Streams every pin connected to `pin` to `visitor`, each exactly once.
    fn visit_connected_pins_of_pin<V: Visitor<PinId>>(&self, pin: PinId, visitor: &mut V) {
        connectivity::visit_connected_pins_of_pin(self, pin, visitor)
    }

    /// Every pin connected to `net`, in visit order.
    fn connected_pins(&self, net: NetId) -> IndexSet<PinId> {
        connectivity::connected_pins(self, net)
    }

    /// The net reached by following terminals up the hierarchy from `net`.
    fn highest_net_above(&self, net: NetId) -> NetId {
        connectivity::highest_net_above(self, net)
    }

    /// The connected net closest to the top; ties go to the smaller path name.
    fn highest_connected_net(&self, net: NetId) -> NetId {
        connectivity::highest_connected_net(self, net)
    }

    // Drivers.

    /// The leaf driver pins of `net`, memoized until the next edit.
    fn drivers(&self, net: NetId) -> Arc<IndexSet<PinId>> {
        drivers::drivers(self, net)
    }

    /// The leaf driver pins of the net `pin` resolves to.
    ///
    /// Returns [`None`] for a pin with neither a net nor a terminal.
    fn pin_drivers(&self, pin: PinId) -> Option<Arc<IndexSet<PinId>>> {
        drivers::pin_drivers(self, pin)
    }

    /// Every leaf pin connected to a constant net, with its value.
    fn constant_pins(&self) -> Vec<(PinId, LogicValue)> {
        connectivity::constant_pins(self)
    }
}
