//! The immutable network and its solve entry points.

use mn_algebra::{Complex, Expr, RationalFunction};
use mn_core::{CoordId, Real};
use mn_graph::{CoordinateSpace, GraphError, GraphResult, MechGraph, Topology};

use crate::equation::NodeEquation;
use crate::error::SolverResult;
use crate::sweep::{FrequencySweep, SweepParams};
use crate::system::{LinearSystem, LinearSystemBuilder};
use crate::transfer::{SolveConfig, TransferSolver};

/// Build a network from a topology, named masses and an excitation applied
/// at the first coordinate.
pub fn build<I, S>(topology: &Topology, masses: I, excitation: Expr) -> GraphResult<Network>
where
    I: IntoIterator<Item = (S, Real)>,
    S: AsRef<str>,
{
    Network::build(topology, masses, excitation)
}

/// A validated mechanical network with its excitation.
///
/// Immutable after construction. Every solve allocates its own equations
/// and matrices, so a `Network` can be shared across threads and solved
/// concurrently.
#[derive(Debug, Clone)]
pub struct Network {
    graph: MechGraph,
    excitation: Expr,
    excited: CoordId,
    response: CoordId,
}

impl Network {
    pub fn build<I, S>(topology: &Topology, masses: I, excitation: Expr) -> GraphResult<Self>
    where
        I: IntoIterator<Item = (S, Real)>,
        S: AsRef<str>,
    {
        let graph = MechGraph::from_topology(topology, masses)?;
        Self::from_graph(graph, excitation)
    }

    /// Wrap an already validated graph, e.g. one from
    /// [`mn_graph::NetworkBuilder`].
    pub fn from_graph(graph: MechGraph, excitation: Expr) -> GraphResult<Self> {
        let coords = graph.coordinates();
        let (Some(excited), Some(response)) = (coords.first(), coords.last()) else {
            return Err(GraphError::TopologyMismatch {
                coordinates: 0,
                masses: 0,
                what: "a network needs at least one mass".to_string(),
            });
        };
        tracing::debug!(
            coordinates = coords.len(),
            elements = graph.entries().len(),
            %excitation,
            "built network"
        );
        Ok(Self {
            graph,
            excitation,
            excited,
            response,
        })
    }

    pub fn graph(&self) -> &MechGraph {
        &self.graph
    }

    pub fn coordinates(&self) -> &CoordinateSpace {
        self.graph.coordinates()
    }

    pub fn excitation(&self) -> &Expr {
        &self.excitation
    }

    /// Where the excitation is applied (the first coordinate).
    pub fn excited_coordinate(&self) -> CoordId {
        self.excited
    }

    /// Whose response is reported (the last coordinate).
    pub fn response_coordinate(&self) -> CoordId {
        self.response
    }

    /// One equation of motion per coordinate, in canonical order.
    pub fn equations(&self) -> Vec<NodeEquation> {
        self.coordinates()
            .ids()
            .map(|id| {
                let forcing = if id == self.excited {
                    self.excitation.clone()
                } else {
                    Expr::zero()
                };
                NodeEquation::assemble(
                    id,
                    self.graph.mass(id),
                    forcing,
                    self.graph.incident_elements(id),
                )
            })
            .collect()
    }

    pub fn linear_system(&self) -> SolverResult<LinearSystem> {
        LinearSystemBuilder::new(self.coordinates(), self.excited).build(&self.equations())
    }

    /// Transfer function `x_last / x_first` in lowest terms.
    pub fn transfer(&self) -> SolverResult<RationalFunction> {
        self.transfer_with(&SolveConfig::default())
    }

    pub fn transfer_with(&self, config: &SolveConfig) -> SolverResult<RationalFunction> {
        TransferSolver::new(*config).transfer(&self.linear_system()?)
    }

    /// Every coordinate's response per unit excitation, in canonical order.
    pub fn responses(&self) -> SolverResult<Vec<RationalFunction>> {
        self.responses_with(&SolveConfig::default())
    }

    pub fn responses_with(&self, config: &SolveConfig) -> SolverResult<Vec<RationalFunction>> {
        TransferSolver::new(*config).responses(&self.linear_system()?)
    }

    /// Transfer function at a numeric point, without symbolic elimination.
    pub fn transfer_at(&self, s: Complex<Real>) -> SolverResult<Complex<Real>> {
        TransferSolver::default().transfer_at(&self.linear_system()?, s)
    }

    /// Frequency response of the transfer function along `s = jω`.
    pub fn sweep(&self, params: &SweepParams) -> SolverResult<FrequencySweep> {
        self.sweep_with(params, &SolveConfig::default())
    }

    pub fn sweep_with(
        &self,
        params: &SweepParams,
        config: &SolveConfig,
    ) -> SolverResult<FrequencySweep> {
        FrequencySweep::evaluate(&self.transfer_with(config)?, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;
    use mn_algebra::Polynomial;
    use mn_graph::{ElementKind, NetworkBuilder};

    fn two_mass() -> Network {
        let mut t = Topology::new();
        t.insert("k1", 0, 10.0, ["x1", "x2"]);
        build(&t, [("m1", 1.0), ("m2", 1.0)], Expr::param("F")).unwrap()
    }

    #[test]
    fn equations_follow_newtons_law() {
        let eqs: Vec<_> = two_mass().equations().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            eqs,
            ["F = s^2*x1 + 10*(x1 - x2)", "0 = s^2*x2 + 10*(x2 - x1)"]
        );
    }

    #[test]
    fn two_mass_transfer() {
        let net = two_mass();
        let tf = net.transfer().unwrap();
        assert_eq!(tf.to_string(), "10 / (s^2 + 10)");
        assert_eq!(tf.value_at_zero(), Some(1.0));
        assert_eq!(net.response_coordinate().label(), 2);
    }

    #[test]
    fn responses_have_the_determinant_as_denominator() {
        let responses = two_mass().responses().unwrap();
        for r in &responses {
            assert_eq!(r.den(), &Polynomial::from_coeffs(vec![0.0, 0.0, 20.0, 0.0, 1.0]));
        }
    }

    /// Hub x1 with two identical spring-mass arms. The arms' antisymmetric
    /// mode is never excited, so its factor cancels from every response.
    fn star() -> Network {
        let mut t = Topology::new();
        t.insert("k1", 0, 10.0, ["x1", "x2"]);
        t.insert("k2", 0, 10.0, ["x1", "x3"]);
        build(&t, [("m1", 1.0), ("m2", 1.0), ("m3", 1.0)], Expr::param("F")).unwrap()
    }

    #[test]
    fn responses_follow_the_solve_config() {
        let net = star();
        let raw = SolveConfig {
            reduce: false,
            ..SolveConfig::default()
        };
        let reduced = net.responses().unwrap();
        let unreduced = net.responses_with(&raw).unwrap();
        assert_eq!(unreduced[2].den().degree(), Some(6));
        assert_eq!(reduced[2].den().degree(), Some(4));

        let s = Complex::new(0.0, 1.5);
        let (a, b) = (reduced[2].eval_complex(s), unreduced[2].eval_complex(s));
        assert!((a - b).norm() < 1e-9 * a.norm());
    }

    #[test]
    fn sweep_follows_the_solve_config() {
        let net = star();
        let raw = SolveConfig {
            reduce: false,
            ..SolveConfig::default()
        };
        // x3 / x1 = 10 (s^2 + 10) / (s^2 + 10)^2
        assert_eq!(net.transfer().unwrap().den().degree(), Some(2));
        assert_eq!(net.transfer_with(&raw).unwrap().den().degree(), Some(4));

        // Grid avoids the pole at sqrt(10)
        let params = SweepParams::logarithmic(0.2, 20.0, 31);
        let reduced = net.sweep(&params).unwrap();
        let unreduced = net.sweep_with(&params, &raw).unwrap();
        assert_eq!(reduced.points().len(), 31);
        for (a, b) in reduced.points().iter().zip(unreduced.points()) {
            assert!((a.magnitude_db() - b.magnitude_db()).abs() < 1e-6);
        }
    }

    #[test]
    fn isolated_mass_solves() {
        let mut builder = NetworkBuilder::new();
        let x1 = builder.add_mass(1.0);
        let x2 = builder.add_mass(1.0);
        builder.add_mass(2.0);
        builder.add_element("k1", ElementKind::Spring, 10.0, x1, x2);
        let net = Network::from_graph(builder.build().unwrap(), Expr::param("F")).unwrap();

        let eqs = net.equations();
        assert_eq!(eqs[2].to_string(), "0 = 2*s^2*x3");

        // Nothing reaches x3, so its response is identically zero
        let tf = net.transfer().unwrap();
        assert!(tf.is_zero());
    }

    #[test]
    fn empty_network_is_rejected() {
        let err = build(&Topology::new(), Vec::<(&str, Real)>::new(), Expr::param("F")).unwrap_err();
        assert!(matches!(err, GraphError::TopologyMismatch { .. }));
    }

    #[test]
    fn numeric_transfer_at_dc_is_singular() {
        let err = two_mass().transfer_at(Complex::new(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, SolverError::SingularSystem { .. }));
    }
}
