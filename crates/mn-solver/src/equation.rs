//! Per-coordinate equations of motion.

use core::fmt;

use mn_algebra::Expr;
use mn_core::{CoordId, Real};
use mn_graph::Element;

/// Newton's second law at one coordinate, in the Laplace domain:
///
/// `excitation = m s^2 x_i + sum_e z_e(s) (x_i - x_j)`
///
/// where `z_e = value * s^degree` and `x_j` is the far end of element `e`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEquation {
    coordinate: CoordId,
    excitation: Expr,
    response: Expr,
}

impl NodeEquation {
    /// Assemble the equation of `coordinate`.
    ///
    /// `incident` lists each element touching the coordinate together with
    /// its opposite end; an empty list leaves only the inertial term.
    pub fn assemble<'a, I>(coordinate: CoordId, mass: Real, excitation: Expr, incident: I) -> Self
    where
        I: IntoIterator<Item = (&'a Element, CoordId)>,
    {
        let x = Expr::coord(coordinate);
        let inertial = Expr::product([Expr::num(mass), Expr::s().pow(2), x.clone()]);
        let coupling = incident
            .into_iter()
            .map(|(element, other)| element.impedance_term() * (x.clone() - Expr::coord(other)));

        Self {
            coordinate,
            excitation,
            response: Expr::sum(core::iter::once(inertial).chain(coupling)),
        }
    }

    /// An equation with arbitrary sides, for exercising the system builder.
    #[cfg(test)]
    pub(crate) fn from_sides(coordinate: CoordId, excitation: Expr, response: Expr) -> Self {
        Self {
            coordinate,
            excitation,
            response,
        }
    }

    pub fn coordinate(&self) -> CoordId {
        self.coordinate
    }

    /// Externally applied forcing (left-hand side).
    pub fn excitation(&self) -> &Expr {
        &self.excitation
    }

    /// Inertial and element terms (right-hand side).
    pub fn response(&self) -> &Expr {
        &self.response
    }

    /// `(excitation side, mass/element side)`.
    pub fn sides(&self) -> (&Expr, &Expr) {
        (&self.excitation, &self.response)
    }
}

impl fmt::Display for NodeEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.excitation, self.response)
    }
}
