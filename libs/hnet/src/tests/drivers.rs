use std::sync::Arc;

use test_log::test;

use super::*;

#[test]
fn flat_net_drivers() {
    let network = scenario();
    let drivers = network.drivers(net(&network, "N1"));
    assert_eq!(pin_names(&network, drivers.iter().copied()), ["U1/A"]);
}

#[test]
fn drivers_inside_hierarchy() {
    let network = scenario();
    let drivers = network.drivers(net(&network, "N2"));
    assert_eq!(pin_names(&network, drivers.iter().copied()), ["U3/INV1/A"]);
}

#[test]
fn top_level_input_drives_its_net() {
    let network = scenario();
    let drivers = network.drivers(net(&network, "clk"));
    assert_eq!(pin_names(&network, drivers.iter().copied()), ["clk"]);
}

#[test]
fn drivers_are_memoized() {
    let network = scenario();
    let n1 = net(&network, "N1");
    assert!(network.driver_cache().is_empty());

    let first = network.drivers(n1);
    assert!(network.driver_cache().contains(n1));
    let second = network.drivers(n1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(network.driver_cache().len(), 1);
}

#[test]
fn pin_drivers_resolve_through_the_pin() {
    let network = scenario();
    let expected = network.drivers(net(&network, "N2"));

    assert_eq!(network.pin_drivers(pin(&network, "L1/B")), Some(expected.clone()));
    // A hierarchical pin resolves through its own net.
    assert_eq!(network.pin_drivers(pin(&network, "U3/in")), Some(expected));
    // A top-level port has no net, only a term.
    let clk = pin(&network, "clk");
    assert_eq!(
        network
            .pin_drivers(clk)
            .map(|drivers| drivers.iter().copied().collect::<Vec<_>>()),
        Some(vec![clk])
    );
}

#[test]
fn pin_without_net_or_term_has_no_drivers() {
    let mut network = scenario();
    let u2_b = pin(&network, "U2/B");
    network.disconnect(u2_b).unwrap();
    assert_eq!(network.pin_drivers(u2_b), None);
}

#[test]
fn multiple_drivers_are_all_reported() {
    let mut network = scenario();
    let n1 = net(&network, "N1");
    let l1 = instance(&network, "L1");
    wire(&mut network, l1, "A", n1);

    let drivers = network.drivers(n1);
    assert_eq!(pin_names(&network, drivers.iter().copied()), ["U1/A", "L1/A"]);
}

#[test]
fn edits_clear_the_cache() {
    let mut network = scenario();
    let n1 = net(&network, "N1");
    let before = network.drivers(n1);
    network.drivers(net(&network, "N2"));
    assert_eq!(network.driver_cache().len(), 2);

    let top = network.top_instance().unwrap();
    network.make_net("N9", top).unwrap();
    assert!(network.driver_cache().is_empty());

    // An edit on a disjoint net leaves other driver sets unchanged.
    assert_eq!(network.drivers(n1), before);
}

#[test]
fn reconnecting_a_driver_moves_it() {
    let mut network = scenario();
    let n1 = net(&network, "N1");
    let n2 = net(&network, "N2");
    let u1 = instance(&network, "U1");
    assert_eq!(network.drivers(n2).len(), 1);

    wire(&mut network, u1, "A", n2);
    assert!(network.drivers(n1).is_empty());
    assert_eq!(
        pin_names(&network, network.drivers(n2).iter().copied()),
        ["U1/A", "U3/INV1/A"]
    );
}

#[test]
fn concurrent_readers_agree() {
    let network = scenario();
    let n2 = net(&network, "N2");
    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| network.drivers(n2))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for drivers in &results {
        assert_eq!(drivers, &results[0]);
    }
    assert_eq!(network.driver_cache().len(), 1);
}
