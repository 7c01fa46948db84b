//! Integration tests for mn-graph.

use mn_graph::{ElementKind, GraphError, MechGraph, NetworkBuilder, Topology};
use proptest::prelude::*;

#[test]
fn four_mass_chain_from_topology() {
    // x1 -k1- x2 -b1- x3 -c1- x4, plus k2 from x1 to x4
    let mut t = Topology::new();
    t.insert("k1", 0, 100.0, ["x1", "x2"])
        .insert("b1", 1, 300.0, ["x2", "x3"])
        .insert("c1", 2, 2.0, ["x3", "x4"])
        .insert("k2", 0, 5.0, ["x4", "x1"]);
    let masses = [("m1", 1.0), ("m2", 2.0), ("m3", 3.0), ("m4", 4.0)];

    let graph = MechGraph::from_topology(&t, masses).unwrap();
    let ids: Vec<_> = graph.coordinates().ids().collect();

    assert_eq!(graph.entries().len(), 4);
    for &id in &ids {
        assert_eq!(graph.incident(id).len(), 2);
        assert_eq!(graph.mass(id), f64::from(id.label()));
    }

    let x4: Vec<_> = graph
        .incident_elements(ids[3])
        .map(|(e, other)| (e.kind(), other.label()))
        .collect();
    assert_eq!(x4, [(ElementKind::Inerter, 3), (ElementKind::Spring, 1)]);
}

#[test]
fn builder_and_topology_agree() {
    let mut t = Topology::new();
    t.insert("k1", 0, 10.0, ["x1", "x2"]);
    let from_topology = MechGraph::from_topology(&t, [("m1", 1.0), ("m2", 1.0)]).unwrap();

    let mut builder = NetworkBuilder::new();
    let x1 = builder.add_mass(1.0);
    let x2 = builder.add_mass(1.0);
    builder.add_element("k1", ElementKind::Spring, 10.0, x1, x2);
    let built = builder.build().unwrap();

    assert_eq!(from_topology.entries(), built.entries());
    assert_eq!(from_topology.index(), built.index());
    assert_eq!(from_topology.masses(), built.masses());
}

#[test]
fn invalid_degree_is_reported_with_element() {
    let mut t = Topology::new();
    t.insert("q9", 3, 1.0, ["x1", "x2"]);
    let err = MechGraph::from_topology(&t, [("m1", 1.0), ("m2", 1.0)]).unwrap_err();
    assert_eq!(
        err,
        GraphError::InvalidDegree {
            element: "q9".into(),
            degree: 3
        }
    );
}

#[test]
fn duplicate_element_names_are_rejected() {
    let mut t = Topology::new();
    t.insert("k1", 0, 1.0, ["x1", "x2"])
        .insert("k1", 0, 2.0, ["x2", "x3"]);
    let masses = [("m1", 1.0), ("m2", 1.0), ("m3", 1.0)];
    let err = MechGraph::from_topology(&t, masses).unwrap_err();
    assert_eq!(err, GraphError::DuplicateName { name: "k1".into() });
}

/// Random connected-ish topologies over `n` coordinates.
fn topology_strategy() -> impl Strategy<Value = (usize, Vec<(u8, f64, u32, u32)>)> {
    (2usize..7).prop_flat_map(|n| {
        let edge = (0u8..3, 0.1f64..100.0, 0..n as u32, 0..n as u32)
            .prop_filter("distinct ends", |(_, _, a, b)| a != b);
        (Just(n), prop::collection::vec(edge, 1..12))
    })
}

proptest! {
    #[test]
    fn incidence_is_symmetric((n, edges) in topology_strategy()) {
        let mut builder = NetworkBuilder::new();
        let ids: Vec<_> = (0..n).map(|_| builder.add_mass(1.0)).collect();
        for (i, &(degree, value, a, b)) in edges.iter().enumerate() {
            let kind = ElementKind::from_degree(degree).unwrap();
            builder.add_element(format!("e{i}"), kind, value, ids[a as usize], ids[b as usize]);
        }
        let graph = builder.build().unwrap();

        let total: usize = ids.iter().map(|&id| graph.incident(id).len()).sum();
        prop_assert_eq!(total, 2 * edges.len());

        for &id in &ids {
            for inc in graph.incident(id) {
                let back = graph
                    .incident(inc.other)
                    .iter()
                    .filter(|r| r.element == inc.element && r.other == id)
                    .count();
                prop_assert_eq!(back, 1);
            }
        }
    }
}
