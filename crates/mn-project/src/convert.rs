//! Conversion from the file schema into solver inputs.

use mn_algebra::Expr;
use mn_core::CoordId;
use mn_graph::{
    ElementKind, GraphResult, MechGraph, NetworkBuilder, Topology, parse_coordinate_name,
    parse_mass_name,
};
use mn_solver::Network;

use crate::ProjectResult;
use crate::schema::{ElementKindDef, ExcitationDef, NetworkDef};

impl From<ElementKindDef> for ElementKind {
    fn from(kind: ElementKindDef) -> Self {
        match kind {
            ElementKindDef::Spring => ElementKind::Spring,
            ElementKindDef::Damper => ElementKind::Damper,
            ElementKindDef::Inerter => ElementKind::Inerter,
        }
    }
}

impl ExcitationDef {
    pub fn to_expr(&self) -> Expr {
        match self {
            ExcitationDef::Constant { value } => Expr::num(*value),
            ExcitationDef::Laplace { power, gain } => Expr::num(*gain) * Expr::s().pow(*power),
            ExcitationDef::Parameter { name } => Expr::param(name.as_str()),
        }
    }
}

impl NetworkDef {
    /// Elements as a topology description, in file order.
    pub fn topology(&self) -> Topology {
        let mut topology = Topology::new();
        for element in &self.elements {
            let kind = ElementKind::from(element.kind);
            topology.insert(
                element.name.as_str(),
                kind.degree(),
                element.value,
                element.between.clone(),
            );
        }
        topology
    }

    /// `(name, value)` pairs in file order.
    pub fn masses(&self) -> Vec<(String, f64)> {
        self.masses.iter().map(|(n, &v)| (n.clone(), v)).collect()
    }

    /// Build the immutable graph.
    ///
    /// Goes through the incremental builder, so a mass that no element
    /// touches is kept as an isolated coordinate.
    pub fn to_graph(&self) -> GraphResult<MechGraph> {
        let mut masses = self
            .masses
            .iter()
            .map(|(name, &value)| Ok((parse_mass_name(name)?, name, value)))
            .collect::<GraphResult<Vec<_>>>()?;
        masses.sort_by_key(|&(label, _, _)| label);

        let mut builder = NetworkBuilder::new();
        for (_, name, value) in masses {
            builder.add_named_mass(name.as_str(), value);
        }
        for element in &self.elements {
            let [a, b] = &element.between;
            let a = parse_coordinate_name(a, &element.name)?;
            let b = parse_coordinate_name(b, &element.name)?;
            builder.add_element(
                element.name.as_str(),
                element.kind.into(),
                element.value,
                CoordId::from_index(a - 1),
                CoordId::from_index(b - 1),
            );
        }
        builder.build()
    }

    pub fn to_network(&self) -> ProjectResult<Network> {
        Ok(Network::from_graph(self.to_graph()?, self.excitation.to_expr())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ElementDef, LATEST_VERSION};

    fn element(name: &str, kind: ElementKindDef, value: f64, a: &str, b: &str) -> ElementDef {
        ElementDef {
            name: name.to_string(),
            kind,
            value,
            between: [a.to_string(), b.to_string()],
        }
    }

    fn network() -> NetworkDef {
        NetworkDef {
            version: LATEST_VERSION,
            name: "chain".to_string(),
            description: None,
            masses: [
                ("m1".to_string(), 1.0),
                ("m2".to_string(), 1.0),
                ("m3".to_string(), 2.0),
            ]
            .into(),
            elements: vec![
                element("k1", ElementKindDef::Spring, 10.0, "x1", "x2"),
                element("b1", ElementKindDef::Damper, 0.5, "x2", "x3"),
            ],
            excitation: ExcitationDef::default(),
        }
    }

    #[test]
    fn excitation_expressions() {
        assert_eq!(ExcitationDef::default().to_expr(), Expr::param("F"));
        let step = ExcitationDef::Laplace {
            power: 2,
            gain: 3.0,
        };
        assert_eq!(step.to_expr().to_string(), "3*s^2");
    }

    #[test]
    fn topology_keeps_file_order() {
        let t = network().topology();
        let names: Vec<_> = t.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["k1", "b1"]);
        assert_eq!(t.entries()[1].degree, 1);
    }

    #[test]
    fn graph_and_topology_paths_agree() {
        let def = network();
        let from_file = def.to_network().unwrap().transfer().unwrap();
        let from_topology =
            mn_solver::build(&def.topology(), def.masses(), def.excitation.to_expr())
                .unwrap()
                .transfer()
                .unwrap();
        assert_eq!(from_file, from_topology);
    }

    #[test]
    fn isolated_mass_is_kept() {
        let mut def = network();
        def.masses.insert("m4".to_string(), 1.0);
        let graph = def.to_graph().unwrap();
        assert_eq!(graph.coordinates().len(), 4);
        assert!(graph.incident(CoordId::from_index(3)).is_empty());
    }
}
