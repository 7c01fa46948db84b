//! Mechanical element descriptors.

use core::fmt;

use mn_algebra::{Complex, Expr, Polynomial};
use mn_core::Real;

use crate::error::{GraphError, GraphResult};

/// Kind of a two-terminal mechanical element.
///
/// The kind fixes the power of `s` in the element impedance: a spring
/// resists displacement, a damper velocity and an inerter acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Impedance `k`.
    Spring,
    /// Impedance `b s`.
    Damper,
    /// Impedance `c s^2`.
    Inerter,
}

impl ElementKind {
    /// Map a degree (0, 1, 2) to its kind.
    pub fn from_degree(degree: u8) -> Option<Self> {
        match degree {
            0 => Some(ElementKind::Spring),
            1 => Some(ElementKind::Damper),
            2 => Some(ElementKind::Inerter),
            _ => None,
        }
    }

    /// Power of `s` in the impedance.
    pub fn degree(self) -> u8 {
        match self {
            ElementKind::Spring => 0,
            ElementKind::Damper => 1,
            ElementKind::Inerter => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Spring => "spring",
            ElementKind::Damper => "damper",
            ElementKind::Inerter => "inerter",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One spring, damper or inerter with its constant. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    kind: ElementKind,
    value: Real,
}

impl Element {
    /// Create an element; `name` is only used for error context.
    pub fn new(name: &str, kind: ElementKind, value: Real) -> GraphResult<Self> {
        if !(value.is_finite() && value > 0.0) {
            return Err(GraphError::NonPositiveValue {
                what: format!("constant of {kind} '{name}'"),
                value,
            });
        }
        Ok(Self { kind, value })
    }

    /// Create an element from its degree, rejecting degrees outside {0, 1, 2}.
    pub fn from_degree(name: &str, value: Real, degree: u8) -> GraphResult<Self> {
        let kind = ElementKind::from_degree(degree).ok_or_else(|| GraphError::InvalidDegree {
            element: name.to_string(),
            degree,
        })?;
        Self::new(name, kind, value)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn value(&self) -> Real {
        self.value
    }

    pub fn degree(&self) -> u8 {
        self.kind.degree()
    }

    /// `value * s^degree` as an expression.
    pub fn impedance_term(&self) -> Expr {
        Expr::num(self.value) * Expr::s().pow(u32::from(self.degree()))
    }

    /// `value * s^degree` as a polynomial.
    pub fn impedance(&self) -> Polynomial {
        Polynomial::monomial(self.value, usize::from(self.degree()))
    }

    /// Impedance at a numeric point `s`.
    pub fn impedance_at(&self, s: Complex<Real>) -> Complex<Real> {
        s.powu(u32::from(self.degree())) * self.value
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of constant {}", self.kind, self.value)
    }
}
