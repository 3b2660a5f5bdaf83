//! An in-memory network.

use std::collections::HashMap;

use arcstr::ArcStr;
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::config::NetworkConfig;
use crate::drivers::DriverCache;
use crate::edit::{NetworkEdit, NetworkReader};
use crate::error::{Error, Result};
use crate::hier;
use crate::id::Kind;
use crate::network::Network;
use crate::port::{bus_bit_name, PortKind};
use crate::{
    CellId, Id, InstanceId, LibraryId, LogicValue, NetId, PinId, PortDirection, PortId, TermId,
    VertexId,
};

#[derive(Debug, Clone)]
struct Library {
    name: ArcStr,
    /// Cells by name, in declaration order.
    cells: IndexMap<ArcStr, CellId>,
}

#[derive(Debug, Clone)]
struct Cell {
    name: ArcStr,
    library: LibraryId,
    is_leaf: bool,
    /// Declared ports by name. Bus bits are reached through their bus.
    ports: IndexMap<ArcStr, PortId>,
}

#[derive(Debug, Clone)]
struct Port {
    name: ArcStr,
    cell: CellId,
    direction: PortDirection,
    kind: PortKind,
    members: Vec<PortId>,
}

#[derive(Debug, Clone)]
struct Instance {
    name: ArcStr,
    cell: CellId,
    parent: Option<InstanceId>,
    children: IndexMap<ArcStr, InstanceId>,
    /// Pins keyed by the port they connect.
    pins: IndexMap<PortId, PinId>,
    nets: IndexMap<ArcStr, NetId>,
}

#[derive(Debug, Clone)]
struct Pin {
    port: PortId,
    instance: InstanceId,
    net: Option<NetId>,
    term: Option<TermId>,
    vertex: Option<VertexId>,
}

#[derive(Debug, Clone)]
struct Term {
    pin: PinId,
    net: NetId,
}

#[derive(Debug, Clone)]
struct Net {
    name: ArcStr,
    instance: InstanceId,
    pins: IndexSet<PinId>,
    terms: IndexSet<TermId>,
}

/// A network held entirely in memory.
///
/// Entities live in per-kind maps keyed by handle. Handles are allocated from
/// per-kind counters and never reused, so a deleted entity's handle stays
/// dead. Accessors from [`Network`] panic when given such a handle; edits
/// return [`Error::Missing`] instead.
#[derive(Debug)]
pub struct MemNetwork {
    config: NetworkConfig,

    library_id: LibraryId,
    cell_id: CellId,
    port_id: PortId,
    instance_id: InstanceId,
    pin_id: PinId,
    term_id: TermId,
    net_id: NetId,

    libraries: IndexMap<LibraryId, Library>,
    library_names: HashMap<ArcStr, LibraryId>,
    cells: HashMap<CellId, Cell>,
    ports: HashMap<PortId, Port>,
    instances: HashMap<InstanceId, Instance>,
    pins: HashMap<PinId, Pin>,
    terms: HashMap<TermId, Term>,
    nets: HashMap<NetId, Net>,

    top: Option<InstanceId>,
    default_library: OnceCell<LibraryId>,
    constants: IndexMap<NetId, LogicValue>,
    /// Nets removed by [`NetworkEdit::merge_into`], mapped to the net they joined.
    merged: HashMap<NetId, NetId>,
    drivers: DriverCache,
}

impl Default for MemNetwork {
    fn default() -> Self {
        Self::with_config(NetworkConfig::default())
    }
}

/// Looks up a live entity, reporting a stale handle as [`Error::Missing`].
fn live<K: Kind, V>(map: &HashMap<Id<K>, V>, id: Id<K>) -> Result<&V> {
    map.get(&id).ok_or_else(|| Error::missing(id))
}

impl MemNetwork {
    /// Creates an empty network with the default path syntax.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty network using the path syntax in `config`.
    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            config,
            library_id: Id::new(),
            cell_id: Id::new(),
            port_id: Id::new(),
            instance_id: Id::new(),
            pin_id: Id::new(),
            term_id: Id::new(),
            net_id: Id::new(),
            libraries: IndexMap::new(),
            library_names: HashMap::new(),
            cells: HashMap::new(),
            ports: HashMap::new(),
            instances: HashMap::new(),
            pins: HashMap::new(),
            terms: HashMap::new(),
            nets: HashMap::new(),
            top: None,
            default_library: OnceCell::new(),
            constants: IndexMap::new(),
            merged: HashMap::new(),
            drivers: DriverCache::new(),
        }
    }

    /// The configuration this network was created with.
    #[inline]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Describes an instance for error messages.
    fn scope(&self, instance: InstanceId) -> String {
        if self.is_top_instance(instance) {
            format!("top instance `{}`", self.instance_name(instance))
        } else {
            format!("instance `{}`", self.instance_path_name(instance))
        }
    }

    fn pin_label(&self, instance: InstanceId, port: PortId) -> String {
        let port = &self.ports[&port].name;
        if self.is_top_instance(instance) {
            port.to_string()
        } else {
            format!(
                "{}{}{}",
                self.instance_path_name(instance),
                self.config.divider,
                port
            )
        }
    }

    /// Checks that `net` is declared in the parent of `instance`.
    fn check_outer_net(&self, instance: InstanceId, port: PortId, net: NetId) -> Result<()> {
        let net_instance = live(&self.nets, net)?.instance;
        if Some(net_instance) != self.instances[&instance].parent {
            return Err(Error::LevelMismatch {
                net,
                pin: self.pin_label(instance, port),
            });
        }
        Ok(())
    }

    fn check_hierarchical(&self, instance: InstanceId, what: &'static str) -> Result<()> {
        if self.is_leaf_instance(instance) {
            return Err(Error::Unsupported(what));
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.drivers.clear();
    }

    fn attach(&mut self, pin: PinId, net: NetId) {
        if let Some(data) = self.pins.get_mut(&pin) {
            data.net = Some(net);
        }
        if let Some(data) = self.nets.get_mut(&net) {
            data.pins.insert(pin);
        }
    }

    fn detach(&mut self, pin: PinId) {
        let Some(net) = self.pins.get_mut(&pin).and_then(|data| data.net.take()) else {
            return;
        };
        if let Some(data) = self.nets.get_mut(&net) {
            data.pins.shift_remove(&pin);
        }
    }

    fn sever_term(&mut self, pin: PinId) {
        let Some(term) = self.pins.get_mut(&pin).and_then(|data| data.term.take()) else {
            return;
        };
        if let Some(Term { net, .. }) = self.terms.remove(&term) {
            if let Some(data) = self.nets.get_mut(&net) {
                data.terms.shift_remove(&term);
            }
        }
    }

    fn check_name_free(
        names: &IndexMap<ArcStr, impl Sized>,
        kind: &'static str,
        name: &str,
        scope: impl FnOnce() -> String,
    ) -> Result<()> {
        if names.contains_key(name) {
            return Err(Error::DuplicateName {
                kind,
                name: name.into(),
                scope: scope(),
            });
        }
        Ok(())
    }

    fn add_port(&mut self, cell: CellId, name: ArcStr, kind: PortKind) -> PortId {
        let id = self.port_id.alloc();
        self.ports.insert(
            id,
            Port {
                name,
                cell,
                direction: PortDirection::default(),
                kind,
                members: Vec::new(),
            },
        );
        id
    }
}

impl Network for MemNetwork {
    fn libraries(&self) -> impl Iterator<Item = LibraryId> + '_ {
        self.libraries.keys().copied()
    }

    fn library_name(&self, library: LibraryId) -> &str {
        &self.libraries[&library].name
    }

    fn find_library(&self, name: &str) -> Option<LibraryId> {
        self.library_names.get(name).copied()
    }

    fn library_cells(&self, library: LibraryId) -> impl Iterator<Item = CellId> + '_ {
        self.libraries[&library].cells.values().copied()
    }

    fn find_cell(&self, library: LibraryId, name: &str) -> Option<CellId> {
        self.libraries.get(&library)?.cells.get(name).copied()
    }

    fn default_library(&self) -> Option<LibraryId> {
        self.default_library.get().copied()
    }

    fn cell_name(&self, cell: CellId) -> &str {
        &self.cells[&cell].name
    }

    fn cell_library(&self, cell: CellId) -> LibraryId {
        self.cells[&cell].library
    }

    fn is_leaf_cell(&self, cell: CellId) -> bool {
        self.cells[&cell].is_leaf
    }

    fn cell_ports(&self, cell: CellId) -> impl Iterator<Item = PortId> + '_ {
        self.cells[&cell].ports.values().copied()
    }

    fn port_name(&self, port: PortId) -> &str {
        &self.ports[&port].name
    }

    fn port_cell(&self, port: PortId) -> CellId {
        self.ports[&port].cell
    }

    fn port_direction(&self, port: PortId) -> PortDirection {
        self.ports[&port].direction
    }

    fn port_kind(&self, port: PortId) -> PortKind {
        self.ports[&port].kind
    }

    fn port_members(&self, port: PortId) -> impl Iterator<Item = PortId> + '_ {
        self.ports[&port].members.iter().copied()
    }

    fn top_instance(&self) -> Option<InstanceId> {
        self.top
    }

    fn instance_name(&self, instance: InstanceId) -> &str {
        &self.instances[&instance].name
    }

    fn instance_cell(&self, instance: InstanceId) -> CellId {
        self.instances[&instance].cell
    }

    fn parent(&self, instance: InstanceId) -> Option<InstanceId> {
        self.instances[&instance].parent
    }

    fn children(&self, instance: InstanceId) -> impl Iterator<Item = InstanceId> + '_ {
        self.instances[&instance].children.values().copied()
    }

    fn instance_pins(&self, instance: InstanceId) -> impl Iterator<Item = PinId> + '_ {
        self.instances[&instance].pins.values().copied()
    }

    fn instance_nets(&self, instance: InstanceId) -> impl Iterator<Item = NetId> + '_ {
        self.instances[&instance].nets.values().copied()
    }

    fn pin_port(&self, pin: PinId) -> PortId {
        self.pins[&pin].port
    }

    fn pin_instance(&self, pin: PinId) -> InstanceId {
        self.pins[&pin].instance
    }

    fn pin_net(&self, pin: PinId) -> Option<NetId> {
        self.pins[&pin].net
    }

    fn pin_term(&self, pin: PinId) -> Option<TermId> {
        self.pins[&pin].term
    }

    fn vertex_id(&self, pin: PinId) -> Option<VertexId> {
        self.pins[&pin].vertex
    }

    fn set_vertex_id(&mut self, pin: PinId, vertex: VertexId) {
        if let Some(data) = self.pins.get_mut(&pin) {
            data.vertex = Some(vertex);
        }
    }

    fn term_pin(&self, term: TermId) -> PinId {
        self.terms[&term].pin
    }

    fn term_net(&self, term: TermId) -> NetId {
        self.terms[&term].net
    }

    fn net_name(&self, net: NetId) -> &str {
        &self.nets[&net].name
    }

    fn net_instance(&self, net: NetId) -> InstanceId {
        self.nets[&net].instance
    }

    fn net_pins(&self, net: NetId) -> impl Iterator<Item = PinId> + '_ {
        self.nets[&net].pins.iter().copied()
    }

    fn net_terms(&self, net: NetId) -> impl Iterator<Item = TermId> + '_ {
        self.nets[&net].terms.iter().copied()
    }

    fn driver_cache(&self) -> &DriverCache {
        &self.drivers
    }

    fn path_divider(&self) -> char {
        self.config.divider
    }

    fn path_escape(&self) -> char {
        self.config.escape
    }

    fn constant_nets(&self) -> impl Iterator<Item = (NetId, LogicValue)> + '_ {
        self.constants.iter().map(|(&net, &value)| (net, value))
    }

    fn find_child(&self, parent: InstanceId, name: &str) -> Option<InstanceId> {
        self.instances.get(&parent)?.children.get(name).copied()
    }

    fn find_pin_for_port(&self, instance: InstanceId, port: PortId) -> Option<PinId> {
        self.instances.get(&instance)?.pins.get(&port).copied()
    }

    fn find_net_named(&self, instance: InstanceId, name: &str) -> Option<NetId> {
        self.instances.get(&instance)?.nets.get(name).copied()
    }
}

impl NetworkEdit for MemNetwork {
    fn make_instance(
        &mut self,
        cell: CellId,
        name: &str,
        parent: Option<InstanceId>,
    ) -> Result<InstanceId> {
        live(&self.cells, cell)?;
        match parent {
            None => {
                if let Some(top) = self.top {
                    return Err(Error::TopExists(top));
                }
            }
            Some(parent) => {
                let data = live(&self.instances, parent)?;
                self.check_hierarchical(parent, "leaf instances cannot have children")?;
                Self::check_name_free(&data.children, "instance", name, || self.scope(parent))?;
            }
        }

        let id = self.instance_id.alloc();
        let name = ArcStr::from(name);
        self.instances.insert(
            id,
            Instance {
                name: name.clone(),
                cell,
                parent,
                children: IndexMap::new(),
                pins: IndexMap::new(),
                nets: IndexMap::new(),
            },
        );
        match parent {
            Some(parent) => {
                if let Some(data) = self.instances.get_mut(&parent) {
                    data.children.insert(name, id);
                }
            }
            None => self.top = Some(id),
        }
        self.invalidate();
        debug!(instance = %id, %cell, ?parent, "made instance");
        Ok(id)
    }

    fn make_pin(
        &mut self,
        instance: InstanceId,
        port: PortId,
        net: Option<NetId>,
    ) -> Result<PinId> {
        let inst = live(&self.instances, instance)?;
        let port_data = live(&self.ports, port)?;
        if port_data.cell != inst.cell {
            return Err(Error::ForeignPort { port, instance });
        }
        if !port_data.kind.is_bit() {
            return Err(Error::NotBitPort(port));
        }
        if let Some(&pin) = inst.pins.get(&port) {
            return Err(Error::PinExists { instance, pin });
        }
        if let Some(net) = net {
            self.check_outer_net(instance, port, net)?;
        }

        let id = self.pin_id.alloc();
        self.pins.insert(
            id,
            Pin {
                port,
                instance,
                net: None,
                term: None,
                vertex: None,
            },
        );
        if let Some(data) = self.instances.get_mut(&instance) {
            data.pins.insert(port, id);
        }
        if let Some(net) = net {
            self.attach(id, net);
        }
        self.invalidate();
        debug!(pin = %id, %instance, %port, ?net, "made pin");
        Ok(id)
    }

    fn make_term(&mut self, pin: PinId, net: NetId) -> Result<TermId> {
        let pin_data = live(&self.pins, pin)?;
        let net_data = live(&self.nets, net)?;
        if net_data.instance != pin_data.instance {
            return Err(Error::LevelMismatch {
                net,
                pin: self.pin_label(pin_data.instance, pin_data.port),
            });
        }
        if pin_data.term.is_some() {
            return Err(Error::TermExists(pin));
        }

        let id = self.term_id.alloc();
        self.terms.insert(id, Term { pin, net });
        if let Some(data) = self.pins.get_mut(&pin) {
            data.term = Some(id);
        }
        if let Some(data) = self.nets.get_mut(&net) {
            data.terms.insert(id);
        }
        self.invalidate();
        debug!(term = %id, %pin, %net, "made term");
        Ok(id)
    }

    fn make_net(&mut self, name: &str, parent: InstanceId) -> Result<NetId> {
        let data = live(&self.instances, parent)?;
        self.check_hierarchical(parent, "nets cannot be declared inside leaf instances")?;
        Self::check_name_free(&data.nets, "net", name, || self.scope(parent))?;

        let id = self.net_id.alloc();
        let name = ArcStr::from(name);
        self.nets.insert(
            id,
            Net {
                name: name.clone(),
                instance: parent,
                pins: IndexSet::new(),
                terms: IndexSet::new(),
            },
        );
        if let Some(data) = self.instances.get_mut(&parent) {
            data.nets.insert(name, id);
        }
        self.invalidate();
        debug!(net = %id, %parent, "made net");
        Ok(id)
    }

    fn connect(&mut self, instance: InstanceId, port: PortId, net: NetId) -> Result<PinId> {
        let inst = live(&self.instances, instance)?;
        let Some(&pin) = inst.pins.get(&port) else {
            return self.make_pin(instance, port, Some(net));
        };
        self.check_outer_net(instance, port, net)?;
        if self.pins[&pin].net == Some(net) {
            return Ok(pin);
        }
        self.detach(pin);
        self.attach(pin, net);
        self.invalidate();
        debug!(%pin, %net, "connected pin");
        Ok(pin)
    }

    fn disconnect(&mut self, pin: PinId) -> Result<()> {
        if live(&self.pins, pin)?.net.is_none() {
            return Ok(());
        }
        self.detach(pin);
        self.invalidate();
        debug!(%pin, "disconnected pin");
        Ok(())
    }

    fn delete_instance(&mut self, instance: InstanceId) -> Result<()> {
        let parent = live(&self.instances, instance)?.parent;
        let mut subtree = vec![instance];
        subtree.extend(hier::descendants(&*self, instance));

        for &inst in &subtree {
            let Some(data) = self.instances.remove(&inst) else {
                continue;
            };
            for pin in data.pins.into_values() {
                self.detach(pin);
                self.sever_term(pin);
                self.pins.remove(&pin);
            }
            for net in data.nets.into_values() {
                self.nets.remove(&net);
                self.constants.shift_remove(&net);
            }
        }
        match parent {
            Some(parent) => {
                if let Some(data) = self.instances.get_mut(&parent) {
                    data.children.retain(|_, &mut child| child != instance);
                }
            }
            None => self.top = None,
        }
        self.invalidate();
        debug!(%instance, removed = subtree.len(), "deleted instance");
        Ok(())
    }

    fn delete_net(&mut self, net: NetId) -> Result<()> {
        let data = live(&self.nets, net)?;
        if !data.terms.is_empty() {
            return Err(Error::NetHasTerms {
                net,
                terms: data.terms.len(),
            });
        }

        let Some(data) = self.nets.remove(&net) else {
            return Ok(());
        };
        for pin in data.pins {
            if let Some(pin) = self.pins.get_mut(&pin) {
                pin.net = None;
            }
        }
        if let Some(inst) = self.instances.get_mut(&data.instance) {
            inst.nets.shift_remove(&data.name);
        }
        self.constants.shift_remove(&net);
        self.invalidate();
        debug!(%net, "deleted net");
        Ok(())
    }

    fn delete_pin(&mut self, pin: PinId) -> Result<()> {
        let data = live(&self.pins, pin)?;
        let (instance, port) = (data.instance, data.port);

        self.detach(pin);
        self.sever_term(pin);
        self.pins.remove(&pin);
        if let Some(inst) = self.instances.get_mut(&instance) {
            inst.pins.shift_remove(&port);
        }
        self.invalidate();
        debug!(%pin, "deleted pin");
        Ok(())
    }

    fn merge_into(&mut self, net: NetId, into: NetId) -> Result<()> {
        if net == into {
            return Err(Error::MergeSelf(net));
        }
        let from_instance = live(&self.nets, net)?.instance;
        if live(&self.nets, into)?.instance != from_instance {
            return Err(Error::MergeLevels { net, into });
        }

        let Some(data) = self.nets.remove(&net) else {
            return Ok(());
        };
        for &pin in &data.pins {
            self.attach(pin, into);
        }
        for &term in &data.terms {
            if let Some(t) = self.terms.get_mut(&term) {
                t.net = into;
            }
        }
        if let Some(target) = self.nets.get_mut(&into) {
            target.terms.extend(data.terms.iter().copied());
        }
        if let Some(inst) = self.instances.get_mut(&from_instance) {
            inst.nets.shift_remove(&data.name);
        }
        if let Some(value) = self.constants.shift_remove(&net) {
            self.constants.entry(into).or_insert(value);
        }
        self.merged.insert(net, into);
        self.invalidate();
        debug!(%net, %into, "merged net");
        Ok(())
    }

    fn merged_into(&self, net: NetId) -> Option<NetId> {
        let mut curr = *self.merged.get(&net)?;
        while let Some(&next) = self.merged.get(&curr) {
            curr = next;
        }
        self.nets.contains_key(&curr).then_some(curr)
    }

    fn replace_cell(&mut self, instance: InstanceId, cell: CellId) -> Result<()> {
        let inst = live(&self.instances, instance)?;
        let cell_data = live(&self.cells, cell)?;
        if !self.is_leaf_cell(inst.cell) || !cell_data.is_leaf {
            return Err(Error::Unsupported(
                "only leaf instances can be re-bound to another leaf cell",
            ));
        }

        let mut rebound = Vec::with_capacity(inst.pins.len());
        for &pin in inst.pins.values() {
            let port_name = self.port_name(self.pins[&pin].port);
            let port = self
                .find_port(cell, port_name)
                .filter(|&port| self.port_kind(port).is_bit())
                .ok_or_else(|| Error::CellMismatch {
                    cell: cell_data.name.clone(),
                    port: port_name.into(),
                })?;
            rebound.push((port, pin));
        }

        for &(port, pin) in &rebound {
            if let Some(data) = self.pins.get_mut(&pin) {
                data.port = port;
            }
        }
        if let Some(inst) = self.instances.get_mut(&instance) {
            inst.cell = cell;
            inst.pins = rebound.into_iter().collect();
        }
        self.invalidate();
        debug!(%instance, %cell, "replaced cell");
        Ok(())
    }
}

impl NetworkReader for MemNetwork {
    fn make_library(&mut self, name: &str) -> Result<LibraryId> {
        if self.library_names.contains_key(name) {
            return Err(Error::DuplicateName {
                kind: "library",
                name: name.into(),
                scope: "the network".to_string(),
            });
        }
        let id = self.library_id.alloc();
        let name = ArcStr::from(name);
        self.library_names.insert(name.clone(), id);
        self.libraries.insert(
            id,
            Library {
                name,
                cells: IndexMap::new(),
            },
        );
        debug!(library = %id, "made library");
        Ok(id)
    }

    fn make_cell(&mut self, library: LibraryId, name: &str, is_leaf: bool) -> Result<CellId> {
        let lib = self
            .libraries
            .get(&library)
            .ok_or_else(|| Error::missing(library))?;
        Self::check_name_free(&lib.cells, "cell", name, || {
            format!("library `{}`", lib.name)
        })?;

        let id = self.cell_id.alloc();
        let name = ArcStr::from(name);
        self.cells.insert(
            id,
            Cell {
                name: name.clone(),
                library,
                is_leaf,
                ports: IndexMap::new(),
            },
        );
        if let Some(lib) = self.libraries.get_mut(&library) {
            lib.cells.insert(name, id);
        }
        debug!(cell = %id, %library, is_leaf, "made cell");
        Ok(id)
    }

    fn make_port(&mut self, cell: CellId, name: &str) -> Result<PortId> {
        let data = live(&self.cells, cell)?;
        Self::check_name_free(&data.ports, "port", name, || {
            format!("cell `{}`", data.name)
        })?;

        let name = ArcStr::from(name);
        let id = self.add_port(cell, name.clone(), PortKind::Scalar);
        if let Some(data) = self.cells.get_mut(&cell) {
            data.ports.insert(name, id);
        }
        debug!(port = %id, %cell, "made port");
        Ok(id)
    }

    fn make_bus_port(&mut self, cell: CellId, name: &str, from: i32, to: i32) -> Result<PortId> {
        let data = live(&self.cells, cell)?;
        Self::check_name_free(&data.ports, "port", name, || {
            format!("cell `{}`", data.name)
        })?;

        let name = ArcStr::from(name);
        let bus = self.add_port(cell, name.clone(), PortKind::Bus { from, to });
        let indices: Vec<i32> = if from <= to {
            (from..=to).collect()
        } else {
            (to..=from).rev().collect()
        };
        let bits: Vec<PortId> = indices
            .into_iter()
            .map(|index| {
                self.add_port(
                    cell,
                    bus_bit_name(&name, index).into(),
                    PortKind::BusBit { bus, index },
                )
            })
            .collect();
        if let Some(port) = self.ports.get_mut(&bus) {
            port.members = bits;
        }
        if let Some(data) = self.cells.get_mut(&cell) {
            data.ports.insert(name, bus);
        }
        debug!(port = %bus, %cell, from, to, "made bus port");
        Ok(bus)
    }

    fn make_bundle_port(
        &mut self,
        cell: CellId,
        name: &str,
        members: &[PortId],
    ) -> Result<PortId> {
        let data = live(&self.cells, cell)?;
        Self::check_name_free(&data.ports, "port", name, || {
            format!("cell `{}`", data.name)
        })?;
        for &member in members {
            let port = live(&self.ports, member)?;
            if port.cell != cell || port.kind != PortKind::Scalar {
                return Err(Error::NotMember(member));
            }
        }

        let name = ArcStr::from(name);
        let id = self.add_port(cell, name.clone(), PortKind::Bundle);
        if let Some(port) = self.ports.get_mut(&id) {
            port.members = members.to_vec();
        }
        if let Some(data) = self.cells.get_mut(&cell) {
            data.ports.insert(name, id);
        }
        debug!(port = %id, %cell, members = members.len(), "made bundle port");
        Ok(id)
    }

    fn set_direction(&mut self, port: PortId, direction: PortDirection) -> Result<()> {
        let data = live(&self.ports, port)?;
        let bits = match data.kind {
            PortKind::Bus { .. } => data.members.clone(),
            _ => Vec::new(),
        };
        for p in std::iter::once(port).chain(bits) {
            if let Some(data) = self.ports.get_mut(&p) {
                data.direction = direction;
            }
        }
        self.invalidate();
        debug!(%port, %direction, "set port direction");
        Ok(())
    }

    fn add_constant_net(&mut self, net: NetId, value: LogicValue) -> Result<()> {
        live(&self.nets, net)?;
        self.constants.insert(net, value);
        self.invalidate();
        debug!(%net, %value, "tied net to constant");
        Ok(())
    }

    fn set_default_library(&mut self, library: LibraryId) -> Result<bool> {
        if !self.libraries.contains_key(&library) {
            return Err(Error::missing(library));
        }
        Ok(self.default_library.set(library).is_ok())
    }
}
