//! Affine flattening of expressions in the coordinate unknowns.

use std::collections::BTreeMap;

use mn_core::CoordId;

use crate::error::{AlgebraError, AlgebraResult};
use crate::expr::{Expr, Symbol};
use crate::poly::Polynomial;

/// `sum_i c_i(s) * x_i + c_0(s)`, the flattened form of an expression that
/// is affine in the coordinates with polynomial coefficients in `s`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearForm {
    terms: BTreeMap<CoordId, Polynomial>,
    constant: Polynomial,
}

impl LinearForm {
    pub fn constant(p: Polynomial) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: p,
        }
    }

    pub fn coordinate(id: CoordId) -> Self {
        Self {
            terms: BTreeMap::from([(id, Polynomial::one())]),
            constant: Polynomial::zero(),
        }
    }

    /// Coefficient of `x_id`, zero if the coordinate does not appear.
    pub fn coefficient(&self, id: CoordId) -> Polynomial {
        self.terms.get(&id).cloned().unwrap_or_default()
    }

    /// The part that multiplies no coordinate.
    pub fn constant_term(&self) -> &Polynomial {
        &self.constant
    }

    /// Coordinates with a nonzero coefficient, in ascending order.
    pub fn coordinates(&self) -> impl Iterator<Item = CoordId> + '_ {
        self.terms.keys().copied()
    }

    /// True if no coordinate appears.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    fn add(mut self, rhs: LinearForm) -> LinearForm {
        for (id, c) in rhs.terms {
            let sum = &self.coefficient(id) + &c;
            if sum.is_zero() {
                self.terms.remove(&id);
            } else {
                self.terms.insert(id, sum);
            }
        }
        self.constant = &self.constant + &rhs.constant;
        self
    }

    fn scale(self, k: &Polynomial) -> LinearForm {
        let terms = self
            .terms
            .into_iter()
            .map(|(id, c)| (id, &c * k))
            .filter(|(_, c)| !c.is_zero())
            .collect();
        LinearForm {
            terms,
            constant: &self.constant * k,
        }
    }

    fn mul(self, rhs: LinearForm) -> AlgebraResult<LinearForm> {
        match (self.is_constant(), rhs.is_constant()) {
            (true, _) => Ok(rhs.scale(&self.constant)),
            (_, true) => Ok(self.scale(&rhs.constant)),
            (false, false) => Err(AlgebraError::NotAffine {
                what: format!(
                    "product of coordinate terms in {{{}}} and {{{}}}",
                    join(self.coordinates()),
                    join(rhs.coordinates())
                ),
            }),
        }
    }
}

fn join(ids: impl Iterator<Item = CoordId>) -> String {
    ids.map(|id| Symbol::Coord(id).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Expr {
    /// Flatten into a [`LinearForm`].
    ///
    /// Fails with [`AlgebraError::NotAffine`] if a coordinate is multiplied by
    /// another coordinate or raised to a power above one, and with
    /// [`AlgebraError::UnboundSymbol`] if a parameter appears, since
    /// coefficients must be polynomials in `s` alone.
    pub fn linear_form(&self) -> AlgebraResult<LinearForm> {
        match self {
            Expr::Num(v) => Ok(LinearForm::constant(Polynomial::constant(*v))),
            Expr::Sym(Symbol::Laplace) => Ok(LinearForm::constant(Polynomial::s())),
            Expr::Sym(Symbol::Coord(id)) => Ok(LinearForm::coordinate(*id)),
            Expr::Sym(Symbol::Param(name)) => {
                Err(AlgebraError::UnboundSymbol { name: name.clone() })
            }
            Expr::Add(terms) => terms
                .iter()
                .try_fold(LinearForm::default(), |acc, t| Ok(acc.add(t.linear_form()?))),
            Expr::Mul(factors) => factors
                .iter()
                .try_fold(LinearForm::constant(Polynomial::one()), |acc, f| {
                    acc.mul(f.linear_form()?)
                }),
            Expr::Pow(base, n) => {
                let base = base.linear_form()?;
                if !base.is_constant() && *n > 1 {
                    return Err(AlgebraError::NotAffine {
                        what: format!(
                            "power {n} of coordinate terms in {{{}}}",
                            join(base.coordinates())
                        ),
                    });
                }
                if *n == 1 {
                    return Ok(base);
                }
                Ok(LinearForm::constant(base.constant.pow(*n)))
            }
            Expr::Neg(inner) => Ok(inner.linear_form()?.scale(&Polynomial::constant(-1.0))),
        }
    }
}
