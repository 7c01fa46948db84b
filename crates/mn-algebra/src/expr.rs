//! Symbolic expression tree over `s`, coordinate unknowns and parameters.

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use mn_core::{CoordId, Real};

use crate::poly::Polynomial;

/// A free symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// The Laplace variable `s`.
    Laplace,
    /// Displacement unknown of one mass, displayed as `x1`, `x2`, ...
    Coord(CoordId),
    /// Any other named quantity, e.g. a forcing amplitude `F`.
    Param(String),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Laplace => write!(f, "s"),
            Symbol::Coord(id) => write!(f, "x{}", id.label()),
            Symbol::Param(name) => write!(f, "{name}"),
        }
    }
}

/// Expression tree. Build through the constructors and operators, which
/// fold numeric zeros and ones so that structurally trivial terms vanish.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(Real),
    Sym(Symbol),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, u32),
    Neg(Box<Expr>),
}

impl Expr {
    pub fn zero() -> Self {
        Expr::Num(0.0)
    }

    pub fn num(v: Real) -> Self {
        Expr::Num(v)
    }

    pub fn s() -> Self {
        Expr::Sym(Symbol::Laplace)
    }

    pub fn coord(id: CoordId) -> Self {
        Expr::Sym(Symbol::Coord(id))
    }

    pub fn param(name: impl Into<String>) -> Self {
        Expr::Sym(Symbol::Param(name.into()))
    }

    /// Structural zero (after constructor folding).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(v) if *v == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Num(v) if *v == 1.0)
    }

    /// Sum of `terms`, dropping zeros and flattening nested sums.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for t in terms {
            match t {
                Expr::Add(inner) => flat.extend(inner),
                t if t.is_zero() => {}
                t => flat.push(t),
            }
        }
        match flat.len() {
            0 => Expr::zero(),
            1 => flat.pop().unwrap_or_else(Expr::zero),
            _ => Expr::Add(flat),
        }
    }

    /// Product of `factors`, collapsing to zero on any zero factor and
    /// dropping ones.
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for f in factors {
            match f {
                f if f.is_zero() => return Expr::zero(),
                Expr::Mul(inner) => flat.extend(inner),
                f if f.is_one() => {}
                f => flat.push(f),
            }
        }
        match flat.len() {
            0 => Expr::num(1.0),
            1 => flat.pop().unwrap_or_else(Expr::zero),
            _ => Expr::Mul(flat),
        }
    }

    pub fn pow(self, n: u32) -> Self {
        match n {
            0 => Expr::num(1.0),
            1 => self,
            _ if self.is_zero() || self.is_one() => self,
            _ => Expr::Pow(Box::new(self), n),
        }
    }

    /// Lift a polynomial in `s` into an expression.
    pub fn from_polynomial(p: &Polynomial) -> Self {
        Expr::sum(p.coeffs().iter().enumerate().rev().map(|(k, &c)| {
            Expr::product([Expr::num(c), Expr::s().pow(k as u32)])
        }))
    }

    /// Every free parameter name in the expression, sorted and deduplicated.
    pub fn params(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_params(&mut out);
        out.sort();
        out.dedup();
        out
    }

    /// Every coordinate unknown in the expression, ascending and deduplicated.
    pub fn coordinates(&self) -> Vec<CoordId> {
        let mut out = Vec::new();
        self.visit_symbols(&mut |sym| {
            if let Symbol::Coord(id) = sym {
                out.push(*id);
            }
        });
        out.sort();
        out.dedup();
        out
    }

    fn collect_params(&self, out: &mut Vec<String>) {
        self.visit_symbols(&mut |sym| {
            if let Symbol::Param(name) = sym {
                out.push(name.clone());
            }
        });
    }

    fn visit_symbols(&self, f: &mut impl FnMut(&Symbol)) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(sym) => f(sym),
            Expr::Add(items) | Expr::Mul(items) => {
                for e in items {
                    e.visit_symbols(f);
                }
            }
            Expr::Pow(base, _) | Expr::Neg(base) => base.visit_symbols(f),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_) => 1,
            Expr::Neg(_) => 2,
            Expr::Mul(_) => 3,
            Expr::Num(v) if *v < 0.0 => 2,
            Expr::Pow(_, _) => 4,
            Expr::Num(_) | Expr::Sym(_) => 5,
        }
    }

    fn fmt_wrapped(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{v}"),
            Expr::Sym(sym) => write!(f, "{sym}"),
            Expr::Add(terms) => {
                for (i, t) in terms.iter().enumerate() {
                    match (i, t) {
                        (0, t) => t.fmt_wrapped(f, 1)?,
                        (_, Expr::Num(v)) if *v < 0.0 => write!(f, " - {}", -v)?,
                        (_, Expr::Neg(inner)) => {
                            write!(f, " - ")?;
                            inner.fmt_wrapped(f, 2)?;
                        }
                        (_, t) => {
                            write!(f, " + ")?;
                            t.fmt_wrapped(f, 2)?;
                        }
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                for (i, x) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    x.fmt_wrapped(f, 4)?;
                }
                Ok(())
            }
            Expr::Pow(base, n) => {
                base.fmt_wrapped(f, 5)?;
                write!(f, "^{n}")
            }
            Expr::Neg(inner) => {
                write!(f, "-")?;
                inner.fmt_wrapped(f, 3)
            }
        }
    }
}

impl From<Real> for Expr {
    fn from(v: Real) -> Self {
        Expr::Num(v)
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::sum([self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum([self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::product([self, rhs])
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        match self {
            Expr::Num(v) => Expr::Num(-v),
            Expr::Neg(inner) => *inner,
            e => Expr::Neg(Box::new(e)),
        }
    }
}
