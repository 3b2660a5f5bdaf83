use test_log::test;

use super::*;

#[test]
fn deleting_a_net_with_a_term_fails_without_effect() {
    let mut network = scenario();
    let n2 = net(&network, "N2");
    let net_x = net(&network, "U3/net_x");
    let before = network.drivers(n2);

    let err = network.delete_net(net_x).unwrap_err();
    assert_eq!(err, Error::NetHasTerms { net: net_x, terms: 1 });

    assert_eq!(network.find_net("U3/net_x"), Some(net_x));
    assert!(network.driver_cache().contains(n2));
    assert_eq!(network.drivers(n2), before);
    assert_eq!(network.pin_net(pin(&network, "U3/INV1/A")), Some(net_x));
}

#[test]
fn deleting_a_net_keeps_its_pins() {
    let mut network = scenario();
    let n1 = net(&network, "N1");
    let u1_a = pin(&network, "U1/A");
    network.delete_net(n1).unwrap();

    assert_eq!(network.find_net("N1"), None);
    assert_eq!(network.pin_net(u1_a), None);
    assert_eq!(network.find_pin("U1/A"), Some(u1_a));
    assert!(matches!(
        network.delete_net(n1),
        Err(Error::Missing { kind: "net", .. })
    ));
}

#[test]
fn deleting_a_pin_severs_its_term() {
    let mut network = scenario();
    let n2 = net(&network, "N2");
    let net_x = net(&network, "U3/net_x");
    network.delete_pin(pin(&network, "U3/in")).unwrap();

    assert_eq!(network.find_pin("U3/in"), None);
    assert_eq!(network.net_terms(net_x).count(), 0);
    assert!(!network.is_connected_nets(n2, net_x));
    assert!(network.drivers(n2).is_empty());
    network.delete_net(net_x).unwrap();
}

#[test]
fn deleting_an_instance_removes_its_subtree() {
    let mut network = scenario();
    let n2 = net(&network, "N2");
    let u3 = instance(&network, "U3");
    network.delete_instance(u3).unwrap();

    assert_eq!(network.find_instance("U3"), None);
    assert_eq!(network.find_net("U3/net_x"), None);
    assert_eq!(network.instance_count(), 4);
    assert_eq!(pin_names(&network, network.net_pins(n2)), ["L1/B"]);
    assert!(network.drivers(n2).is_empty());
}

#[test]
fn deleting_the_top_unlinks_the_design() {
    let mut network = scenario();
    let top = network.top_instance().unwrap();
    network.delete_instance(top).unwrap();
    assert!(!network.is_linked());
    assert_eq!(network.instance_count(), 0);
    assert_eq!(network.find_pin("U1/A"), None);
}

#[test]
fn only_one_top_instance() {
    let mut network = scenario();
    let top = network.top_instance().unwrap();
    let cell = network.instance_cell(top);
    assert_eq!(
        network.make_instance(cell, "other", None),
        Err(Error::TopExists(top))
    );
}

#[test]
fn duplicate_names_are_rejected() {
    let mut network = scenario();
    let top = network.top_instance().unwrap();
    let gate = network.instance_cell(instance(&network, "U1"));

    assert!(matches!(
        network.make_instance(gate, "U1", Some(top)),
        Err(Error::DuplicateName { kind: "instance", .. })
    ));
    assert!(matches!(
        network.make_net("N1", top),
        Err(Error::DuplicateName { kind: "net", .. })
    ));
    assert!(matches!(
        network.make_library("cells"),
        Err(Error::DuplicateName { kind: "library", .. })
    ));
    assert!(matches!(
        network.make_port(gate, "A"),
        Err(Error::DuplicateName { kind: "port", .. })
    ));
}

#[test]
fn leaf_instances_hold_no_hierarchy() {
    let mut network = scenario();
    let u1 = instance(&network, "U1");
    let gate = network.instance_cell(u1);
    assert!(matches!(
        network.make_instance(gate, "X", Some(u1)),
        Err(Error::Unsupported(_))
    ));
    assert!(matches!(network.make_net("x", u1), Err(Error::Unsupported(_))));
}

#[test]
fn pins_are_validated() {
    let mut network = scenario();
    let top = network.top_instance().unwrap();
    let u1 = instance(&network, "U1");
    let u3 = instance(&network, "U3");
    let gate = network.instance_cell(u1);
    let top_cell = network.instance_cell(top);
    let a = network.find_port(gate, "A").unwrap();
    let b = network.find_port(gate, "B").unwrap();
    let clk = network.find_port(top_cell, "clk").unwrap();
    let bus = network.find_port(top_cell, "d").unwrap();
    let u1_a = pin(&network, "U1/A");
    let n1 = net(&network, "N1");
    let net_x = net(&network, "U3/net_x");

    assert_eq!(
        network.make_pin(u1, clk, None),
        Err(Error::ForeignPort {
            port: clk,
            instance: u1
        })
    );
    assert_eq!(network.make_pin(top, bus, None), Err(Error::NotBitPort(bus)));
    assert_eq!(
        network.make_pin(u1, a, None),
        Err(Error::PinExists {
            instance: u1,
            pin: u1_a
        })
    );
    assert!(matches!(
        network.make_pin(u1, b, Some(net_x)),
        Err(Error::LevelMismatch { net, .. }) if net == net_x
    ));
    // Terms bind a pin to a net inside its own instance.
    assert!(matches!(
        network.make_term(pin(&network, "U3/in"), n1),
        Err(Error::LevelMismatch { .. })
    ));
    assert_eq!(
        network.make_term(pin(&network, "U3/in"), net_x),
        Err(Error::TermExists(pin(&network, "U3/in")))
    );
    assert_eq!(network.children(u3).count(), 1);
}

#[test]
fn disconnecting_an_unconnected_pin_keeps_the_cache() {
    let mut network = scenario();
    let n1 = net(&network, "N1");
    let u2_b = pin(&network, "U2/B");
    network.disconnect(u2_b).unwrap();

    network.drivers(n1);
    network.disconnect(u2_b).unwrap();
    assert!(network.driver_cache().contains(n1));
}

#[test]
fn merging_nets() {
    let mut network = scenario();
    let top = network.top_instance().unwrap();
    let n1 = net(&network, "N1");
    let n2 = net(&network, "N2");
    let net_x = net(&network, "U3/net_x");

    let drivers = network.drivers(n1);
    let pins = pin_names(&network, network.net_pins(n1));
    assert_eq!(network.merge_into(n1, n1), Err(Error::MergeSelf(n1)));
    assert_eq!(
        network.merge_into(net_x, n1),
        Err(Error::MergeLevels {
            net: net_x,
            into: n1
        })
    );
    // Rejected merges leave both nets and the cache alone.
    assert!(network.driver_cache().contains(n1));
    assert_eq!(network.drivers(n1), drivers);
    assert_eq!(pin_names(&network, network.net_pins(n1)), pins);
    assert_eq!(network.find_net("U3/net_x"), Some(net_x));
    assert_eq!(network.merged_into(net_x), None);
    assert_eq!(pin_names(&network, network.net_pins(net_x)), ["U3/INV1/A"]);

    network.merge_into(n2, n1).unwrap();
    assert_eq!(network.merged_into(n2), Some(n1));
    assert_eq!(network.merged_into(n1), None);
    assert_eq!(network.find_net("N2"), None);
    assert_eq!(
        pin_names(&network, network.net_pins(n1)),
        ["U1/A", "U2/B", "U3/in", "L1/B"]
    );
    assert_eq!(
        pin_names(&network, network.drivers(n1).iter().copied()),
        ["U1/A", "U3/INV1/A"]
    );

    // Chains of merges resolve to the surviving net.
    let n9 = network.make_net("N9", top).unwrap();
    network.merge_into(n1, n9).unwrap();
    assert_eq!(network.merged_into(n2), Some(n9));
}

#[test]
fn replacing_a_cell_rebinds_pins_by_name() {
    let mut network = scenario();
    let n1 = net(&network, "N1");
    let u1 = instance(&network, "U1");
    let u1_a = pin(&network, "U1/A");
    let lib = network.find_library("cells").unwrap();
    let buf = network.find_cell(lib, "BUF").unwrap();
    let sub = network.find_cell(lib, "SUB").unwrap();

    network.replace_cell(u1, buf).unwrap();
    assert_eq!(network.instance_cell(u1), buf);
    assert_eq!(network.pin_port(u1_a), network.find_port(buf, "A").unwrap());
    // BUF's `A` is an input, so nothing drives N1 any more.
    assert!(network.drivers(n1).is_empty());

    let u2 = instance(&network, "U2");
    let u2_b = pin(&network, "U2/B");
    let gate = network.instance_cell(u2);
    let gate_b = network.pin_port(u2_b);
    let drivers = network.drivers(n1);
    assert!(matches!(
        network.replace_cell(u2, buf),
        Err(Error::CellMismatch { port, .. }) if port.as_str() == "B"
    ));
    assert!(matches!(
        network.replace_cell(u2, sub),
        Err(Error::Unsupported(_))
    ));
    // Rejected replacements keep the old cell and bindings.
    assert_eq!(network.instance_cell(u2), gate);
    assert_eq!(network.pin_port(u2_b), gate_b);
    assert_eq!(network.find_pin("U2/B"), Some(u2_b));
    assert!(network.driver_cache().contains(n1));
    assert_eq!(network.drivers(n1), drivers);
    assert_eq!(pin_names(&network, network.net_pins(n1)), ["U1/A", "U2/B"]);
}

#[test]
fn bus_and_bundle_ports() {
    let mut network = scenario();
    let lib = network.find_library("cells").unwrap();
    let top_cell = network.find_cell(lib, "TOP").unwrap();
    let d = network.find_port(top_cell, "d").unwrap();

    assert_eq!(network.port_kind(d), PortKind::Bus { from: 1, to: 0 });
    assert_eq!(network.port_size(d), 2);
    let bits: Vec<_> = network
        .port_members(d)
        .map(|bit| network.port_name(bit).to_string())
        .collect();
    assert_eq!(bits, ["d[1]", "d[0]"]);
    assert!(network.bus_index_in_range(d, 0));
    assert!(!network.bus_index_in_range(d, 2));
    let d0 = network.find_port(top_cell, "d[0]").unwrap();
    assert_eq!(network.find_bus_bit(d, 0), Some(d0));
    assert_eq!(network.port_direction(d0), PortDirection::Input);
    assert_eq!(
        network
            .port_bits(top_cell)
            .into_iter()
            .map(|p| network.port_name(p).to_string())
            .collect::<Vec<_>>(),
        ["clk", "q", "d[1]", "d[0]"]
    );

    let gate = network.find_cell(lib, "GATE").unwrap();
    let a = network.find_port(gate, "A").unwrap();
    let b = network.find_port(gate, "B").unwrap();
    let ab = network.make_bundle_port(gate, "AB", &[a, b]).unwrap();
    assert!(network.has_members(ab));
    assert_eq!(network.port_members(ab).collect::<Vec<_>>(), [a, b]);
    assert_eq!(
        network.make_bundle_port(top_cell, "bad", &[a]),
        Err(Error::NotMember(a))
    );

    // Pins are made for bits, never for the bus itself.
    let top = network.top_instance().unwrap();
    assert_eq!(network.make_pin(top, d, None), Err(Error::NotBitPort(d)));
    network.make_pin(top, d0, None).unwrap();
    assert!(network.find_pin("d[0]").is_some());
}

#[test]
fn default_library_is_set_once() {
    let mut network = MemNetwork::new();
    let first = network.make_library("first").unwrap();
    let second = network.make_library("second").unwrap();

    assert_eq!(network.default_library(), None);
    assert_eq!(network.set_default_library(first), Ok(true));
    assert_eq!(network.set_default_library(second), Ok(false));
    assert_eq!(network.default_library(), Some(first));
}

#[test]
fn stale_handles_are_reported() {
    let mut network = scenario();
    let u1_a = pin(&network, "U1/A");
    network.delete_pin(u1_a).unwrap();
    assert!(matches!(
        network.delete_pin(u1_a),
        Err(Error::Missing { kind: "pin", .. })
    ));
    assert!(matches!(
        network.disconnect(u1_a),
        Err(Error::Missing { kind: "pin", .. })
    ));
}
