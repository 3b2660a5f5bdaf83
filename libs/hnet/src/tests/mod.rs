use test_log::test;

use crate::*;

mod drivers;
mod edit;

/// The cells every test design is built from.
pub(crate) struct Cells {
    pub(crate) library: LibraryId,
    /// Leaf; `A` output, `B` input.
    pub(crate) gate: CellId,
    /// Leaf; `A` input, `Y` output.
    pub(crate) buf: CellId,
    /// Hierarchical; `in` output.
    pub(crate) sub: CellId,
    /// Hierarchical; `a` and `b` bidirect.
    pub(crate) feedthrough: CellId,
    /// Hierarchical; `clk` input, `q` output, `d[1:0]` input.
    pub(crate) top: CellId,
}

fn port(network: &mut MemNetwork, cell: CellId, name: &str, dir: PortDirection) -> PortId {
    let port = network.make_port(cell, name).unwrap();
    network.set_direction(port, dir).unwrap();
    port
}

pub(crate) fn cells(network: &mut MemNetwork) -> Cells {
    let library = network.make_library("cells").unwrap();

    let gate = network.make_cell(library, "GATE", true).unwrap();
    port(network, gate, "A", PortDirection::Output);
    port(network, gate, "B", PortDirection::Input);

    let buf = network.make_cell(library, "BUF", true).unwrap();
    port(network, buf, "A", PortDirection::Input);
    port(network, buf, "Y", PortDirection::Output);

    let sub = network.make_cell(library, "SUB", false).unwrap();
    port(network, sub, "in", PortDirection::Output);

    let feedthrough = network.make_cell(library, "FT", false).unwrap();
    port(network, feedthrough, "a", PortDirection::Bidirect);
    port(network, feedthrough, "b", PortDirection::Bidirect);

    let top = network.make_cell(library, "TOP", false).unwrap();
    port(network, top, "clk", PortDirection::Input);
    port(network, top, "q", PortDirection::Output);
    let d = network.make_bus_port(top, "d", 1, 0).unwrap();
    network.set_direction(d, PortDirection::Input).unwrap();

    Cells {
        library,
        gate,
        buf,
        sub,
        feedthrough,
        top,
    }
}

/// Connects the pin of `instance` for the port named `port` to `net`.
pub(crate) fn wire(
    network: &mut MemNetwork,
    instance: InstanceId,
    port: &str,
    net: NetId,
) -> PinId {
    let port = network
        .find_port(network.instance_cell(instance), port)
        .unwrap();
    network.connect(instance, port, net).unwrap()
}

/// Makes the pin of `instance` for `port` and continues it into `inner`.
pub(crate) fn hier_wire(
    network: &mut MemNetwork,
    instance: InstanceId,
    port: &str,
    outer: Option<NetId>,
    inner: NetId,
) -> PinId {
    let port = network
        .find_port(network.instance_cell(instance), port)
        .unwrap();
    let pin = network.make_pin(instance, port, outer).unwrap();
    network.make_term(pin, inner).unwrap();
    pin
}

/// A small design mixing flat and hierarchical connections.
///
/// ```text
/// top
/// ├── U1 (GATE)   A -> N1
/// ├── U2 (GATE)   B -> N1
/// ├── BUF1 (BUF)  A -> clk, Y -> q
/// ├── U3 (SUB)    in -> N2, term -> U3/net_x
/// │   └── INV1 (GATE)  A -> net_x
/// └── L1 (GATE)   B -> N2
/// ```
///
/// The top ports `clk` and `q` have terms into the nets of the same names.
pub(crate) fn scenario() -> MemNetwork {
    let mut network = MemNetwork::new();
    let cells = cells(&mut network);
    let top = network.make_instance(cells.top, "top", None).unwrap();

    let n1 = network.make_net("N1", top).unwrap();
    let n2 = network.make_net("N2", top).unwrap();
    let clk = network.make_net("clk", top).unwrap();
    let q = network.make_net("q", top).unwrap();
    hier_wire(&mut network, top, "clk", None, clk);
    hier_wire(&mut network, top, "q", None, q);

    let u1 = network.make_instance(cells.gate, "U1", Some(top)).unwrap();
    wire(&mut network, u1, "A", n1);
    let u2 = network.make_instance(cells.gate, "U2", Some(top)).unwrap();
    wire(&mut network, u2, "B", n1);

    let buf1 = network.make_instance(cells.buf, "BUF1", Some(top)).unwrap();
    wire(&mut network, buf1, "A", clk);
    wire(&mut network, buf1, "Y", q);

    let u3 = network.make_instance(cells.sub, "U3", Some(top)).unwrap();
    let net_x = network.make_net("net_x", u3).unwrap();
    hier_wire(&mut network, u3, "in", Some(n2), net_x);
    let inv1 = network.make_instance(cells.gate, "INV1", Some(u3)).unwrap();
    wire(&mut network, inv1, "A", net_x);

    let l1 = network.make_instance(cells.gate, "L1", Some(top)).unwrap();
    wire(&mut network, l1, "B", n2);

    network
}

/// A design whose net graph has a cycle.
///
/// Both pins of the feedthrough `H` sit on `N` and continue into `H/M`, so
/// `N -> H/a -> M -> H/b -> N` loops. `U1/A` drives `N`; `H/L/B` loads `M`.
pub(crate) fn feedback() -> MemNetwork {
    let mut network = MemNetwork::new();
    let cells = cells(&mut network);
    let top = network.make_instance(cells.top, "top", None).unwrap();
    let n = network.make_net("N", top).unwrap();

    let u1 = network.make_instance(cells.gate, "U1", Some(top)).unwrap();
    wire(&mut network, u1, "A", n);

    let h = network
        .make_instance(cells.feedthrough, "H", Some(top))
        .unwrap();
    let m = network.make_net("M", h).unwrap();
    hier_wire(&mut network, h, "a", Some(n), m);
    hier_wire(&mut network, h, "b", Some(n), m);

    let l = network.make_instance(cells.gate, "L", Some(h)).unwrap();
    wire(&mut network, l, "B", m);

    network
}

pub(crate) fn pin(network: &MemNetwork, path: &str) -> PinId {
    network.find_pin(path).unwrap()
}

pub(crate) fn net(network: &MemNetwork, path: &str) -> NetId {
    network.find_net(path).unwrap()
}

pub(crate) fn instance(network: &MemNetwork, path: &str) -> InstanceId {
    network.find_instance(path).unwrap()
}

pub(crate) fn pin_names(
    network: &MemNetwork,
    pins: impl IntoIterator<Item = PinId>,
) -> Vec<String> {
    pins.into_iter()
        .map(|pin| network.pin_path_name(pin))
        .collect()
}

#[test]
fn scenario_counts() {
    let network = scenario();
    assert!(network.is_linked());
    assert_eq!(network.instance_count(), 6);
    assert_eq!(network.leaf_instance_count(), 5);
    assert_eq!(network.net_count(), 5);
    // 2 top ports, 6 leaf pins, 1 hierarchical pin.
    assert_eq!(network.pin_count(), 9);
    assert_eq!(network.leaf_pin_count(), 6);
}

#[test]
fn path_names() {
    let network = scenario();
    let top = network.top_instance().unwrap();
    let inv1 = instance(&network, "U3/INV1");

    assert_eq!(network.instance_path_name(top), "");
    assert_eq!(network.instance_path_name(inv1), "U3/INV1");
    assert_eq!(network.hierarchy_level(inv1), 2);
    assert_eq!(network.pin_path_name(pin(&network, "U3/INV1/A")), "U3/INV1/A");
    assert_eq!(network.pin_path_name(pin(&network, "clk")), "clk");
    assert_eq!(network.net_path_name(net(&network, "U3/net_x")), "U3/net_x");
    assert_eq!(network.net_path_name(net(&network, "N1")), "N1");

    let term = network.pin_term(pin(&network, "U3/in")).unwrap();
    assert_eq!(network.term_path_name(term), "U3/in");
}

#[test]
fn driver_and_load_classification() {
    let network = scenario();
    let u1_a = pin(&network, "U1/A");
    let u2_b = pin(&network, "U2/B");
    let clk = pin(&network, "clk");
    let q = pin(&network, "q");
    let u3_in = pin(&network, "U3/in");

    assert!(network.is_driver(u1_a) && !network.is_load(u1_a));
    assert!(network.is_load(u2_b) && !network.is_driver(u2_b));
    // Top-level ports are seen from inside the design.
    assert!(network.is_driver(clk) && !network.is_load(clk));
    assert!(network.is_load(q) && !network.is_driver(q));
    // Hierarchical pins are neither.
    assert!(!network.is_driver(u3_in) && !network.is_load(u3_in));
    assert!(network.is_hierarchical_pin(u3_in));
    assert!(network.is_top_level_port(clk));
}

#[test]
fn inside_checks() {
    let network = scenario();
    let u3 = instance(&network, "U3");
    let inv1_a = pin(&network, "U3/INV1/A");

    assert!(network.is_pin_inside(inv1_a, u3));
    assert!(network.is_pin_inside_hier_pin(inv1_a, pin(&network, "U3/in")));
    assert!(!network.is_pin_inside_hier_pin(pin(&network, "U3/in"), pin(&network, "U3/in")));
    assert!(network.is_net_inside(net(&network, "U3/net_x"), u3));
    assert!(!network.is_net_inside(net(&network, "N2"), u3));
}

#[test]
fn vertex_ids_round_trip_through_the_store() {
    let mut network = scenario();
    let u1_a = pin(&network, "U1/A");
    assert_eq!(network.vertex_id(u1_a), None);
    network.set_vertex_id(u1_a, VertexId(7));
    assert_eq!(network.vertex_id(u1_a), Some(VertexId(7)));
}

#[test]
fn leaf_instances_in_depth_first_order() {
    let network = scenario();
    let top = network.top_instance().unwrap();
    let names: Vec<_> = network
        .leaf_instances(top)
        .map(|inst| network.instance_path_name(inst))
        .collect();
    assert_eq!(names, ["U1", "U2", "BUF1", "U3/INV1", "L1"]);
}

#[test]
fn configured_divider() {
    let config = NetworkConfig::from_toml_str("divider = \".\"").unwrap();
    let mut network = MemNetwork::with_config(config);
    let cells = cells(&mut network);
    let top = network.make_instance(cells.top, "top", None).unwrap();
    let u3 = network.make_instance(cells.sub, "U3", Some(top)).unwrap();
    let net_x = network.make_net("net_x", u3).unwrap();

    assert_eq!(network.net_path_name(net_x), "U3.net_x");
    assert_eq!(network.find_net("U3.net_x"), Some(net_x));
    assert_eq!(network.find_net("U3/net_x"), None);
}
