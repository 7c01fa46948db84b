//! Rational functions of `s`, kept in lowest terms.

use core::fmt;

use mn_core::{Real, Tolerances, nearly_equal};
use nalgebra::Complex;

use crate::error::{AlgebraError, AlgebraResult};
use crate::poly::Polynomial;

/// Off-axis points where a reduced fraction is compared with the original.
const CHECK_POINTS: [(Real, Real); 3] = [(0.7, 0.3), (-0.4, 1.1), (1.3, -0.6)];

/// `num(s) / den(s)` with a monic denominator and no common factor.
#[derive(Clone, Debug, PartialEq)]
pub struct RationalFunction {
    num: Polynomial,
    den: Polynomial,
}

impl RationalFunction {
    /// Reduce `num / den` to lowest terms with default tolerances.
    pub fn new(num: Polynomial, den: Polynomial) -> AlgebraResult<Self> {
        Self::new_with(num, den, Tolerances::default())
    }

    /// Reduce `num / den` to lowest terms.
    ///
    /// Common factors are found with a tolerance-aware gcd; the result is
    /// normalised so that the denominator is monic. A candidate factor is
    /// only cancelled if the reduced fraction still takes the same values
    /// at a few points near the unit circle, so operands are best given in
    /// a frequency-normalised variable.
    pub fn new_with(num: Polynomial, den: Polynomial, tol: Tolerances) -> AlgebraResult<Self> {
        let den = den.trimmed(tol);
        if den.is_zero() {
            return Err(AlgebraError::DivisionByZero {
                what: "rational function denominator",
            });
        }
        let num = num.trimmed(tol);
        if num.is_zero() {
            return Ok(Self::zero());
        }

        let g = num.gcd(&den, tol)?;
        let (num, den) = if g.degree().unwrap_or(0) > 0 {
            // A candidate that does not divide both exactly is rounding noise
            match (num.exact_div(&g, tol), den.exact_div(&g, tol)) {
                (Ok(n), Ok(d)) if same_values((&num, &den), (&n, &d), tol) => (n, d),
                _ => (num, den),
            }
        } else {
            (num, den)
        };
        Self::unreduced(num, den, tol)
    }

    /// `num / den` with a monic denominator but no common-factor
    /// cancellation.
    pub fn unreduced(num: Polynomial, den: Polynomial, tol: Tolerances) -> AlgebraResult<Self> {
        let den = den.trimmed(tol);
        if den.is_zero() {
            return Err(AlgebraError::DivisionByZero {
                what: "rational function denominator",
            });
        }
        let lead = den.leading();
        Ok(Self {
            num: num.scale(1.0 / lead).trimmed(tol),
            den: den.monic(),
        })
    }

    /// `r(factor * s)`, with the denominator made monic again.
    pub fn rescaled(&self, factor: Real) -> Self {
        let den = self.den.rescale(factor);
        let lead = den.leading();
        Self {
            num: self.num.rescale(factor).scale(1.0 / lead),
            den: den.scale(1.0 / lead),
        }
    }

    /// `k * r(s)`.
    pub fn scaled(&self, k: Real) -> Self {
        Self {
            num: self.num.scale(k),
            den: self.den.clone(),
        }
    }

    pub fn zero() -> Self {
        Self {
            num: Polynomial::zero(),
            den: Polynomial::one(),
        }
    }

    pub fn one() -> Self {
        Self::from_poly(Polynomial::one())
    }

    pub fn from_poly(p: Polynomial) -> Self {
        Self {
            num: p,
            den: Polynomial::one(),
        }
    }

    pub fn num(&self) -> &Polynomial {
        &self.num
    }

    pub fn den(&self) -> &Polynomial {
        &self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn eval(&self, s: Real) -> Real {
        self.num.eval(s) / self.den.eval(s)
    }

    pub fn eval_complex(&self, s: Complex<Real>) -> Complex<Real> {
        self.num.eval_complex(s) / self.den.eval_complex(s)
    }

    /// Limit as `s -> 0`, cancelling any common `s^k` factor exactly.
    ///
    /// Only exactly zero coefficients count as roots at the origin, so the
    /// answer does not depend on the units of `s`. Construction has already
    /// trimmed rounding noise. Returns `None` when the function has a pole at
    /// the origin.
    pub fn value_at_zero(&self) -> Option<Real> {
        let Some(num_order) = self.num.zero_root_order(0.0) else {
            return Some(0.0);
        };
        let den_order = self.den.zero_root_order(0.0)?;
        if den_order > num_order {
            return None;
        }
        if num_order > den_order {
            return Some(0.0);
        }
        Some(self.num.coeff(num_order) / self.den.coeff(den_order))
    }

    /// Algebraic equality: `n1 * d2 == n2 * d1` coefficient-wise within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: Tolerances) -> bool {
        let lhs = &self.num * &other.den;
        let rhs = &other.num * &self.den;
        let n = lhs.coeffs().len().max(rhs.coeffs().len());
        (0..n).all(|k| nearly_equal(lhs.coeff(k), rhs.coeff(k), tol))
    }
}

fn same_values(
    a: (&Polynomial, &Polynomial),
    b: (&Polynomial, &Polynomial),
    tol: Tolerances,
) -> bool {
    CHECK_POINTS.iter().all(|&(re, im)| {
        let s = Complex::new(re, im);
        let x = a.0.eval_complex(s) / a.1.eval_complex(s);
        let y = b.0.eval_complex(s) / b.1.eval_complex(s);
        (x - y).norm() <= 1e3 * tol.rel * x.norm().max(y.norm())
    })
}

impl fmt::Display for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wrap = |p: &Polynomial| p.coeffs().iter().filter(|c| **c != 0.0).count() > 1;
        if self.den == Polynomial::one() {
            return write!(f, "{}", self.num);
        }
        if wrap(&self.num) {
            write!(f, "({})", self.num)?;
        } else {
            write!(f, "{}", self.num)?;
        }
        if wrap(&self.den) {
            write!(f, " / ({})", self.den)
        } else {
            write!(f, " / {}", self.den)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(c: &[Real]) -> Polynomial {
        Polynomial::from_coeffs(c.to_vec())
    }

    #[test]
    fn reduces_common_factor() {
        // (s + 1)(s + 2) / ((s + 1) * 2s)  ->  (0.5s + 1) / s
        let num = &p(&[1.0, 1.0]) * &p(&[2.0, 1.0]);
        let den = &p(&[1.0, 1.0]) * &p(&[0.0, 2.0]);
        let r = RationalFunction::new(num, den).unwrap();
        assert_eq!(r.den().degree(), Some(1));
        assert_eq!(r.num().degree(), Some(1));
        assert!((r.den().leading() - 1.0).abs() < 1e-12);
        assert!((r.eval(2.0) - 1.0).abs() < 1e-9);
        assert!((r.eval(4.0) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn near_common_factors_cancel_only_within_tolerance() {
        // Roots 1e-3 apart are distinct
        let r = RationalFunction::new(p(&[1.0, 1.0]), p(&[1.001, 1.0])).unwrap();
        assert_eq!(r.den().degree(), Some(1));
        assert!((r.eval(0.0) - 1.0 / 1.001).abs() < 1e-12);

        // Roots 1e-10 apart are rounding noise
        let r = RationalFunction::new(p(&[1.0, 1.0]), p(&[1.0 + 1e-10, 1.0])).unwrap();
        assert_eq!(r.den().degree(), Some(0));
        assert!((r.eval(0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rescaled_substitutes_the_variable() {
        // 10 / (s^2 + 10) at 4s is 0.625 / (s^2 + 0.625)
        let r = RationalFunction::new(p(&[10.0]), p(&[10.0, 0.0, 1.0])).unwrap();
        let q = r.rescaled(4.0);
        assert_eq!(q.num(), &p(&[0.625]));
        assert_eq!(q.den(), &p(&[0.625, 0.0, 1.0]));
        assert_eq!(q.rescaled(0.25), r);
        assert_eq!(r.scaled(2.0).num(), &p(&[20.0]));
    }

    #[test]
    fn unreduced_keeps_common_factor() {
        let tol = Tolerances::default();
        // s / (2s^2) stays degree 1 over degree 2
        let r = RationalFunction::unreduced(p(&[0.0, 1.0]), p(&[0.0, 0.0, 2.0]), tol).unwrap();
        assert_eq!(r.num(), &p(&[0.0, 0.5]));
        assert_eq!(r.den(), &p(&[0.0, 0.0, 1.0]));
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let err = RationalFunction::new(Polynomial::one(), Polynomial::zero()).unwrap_err();
        assert!(matches!(err, AlgebraError::DivisionByZero { .. }));
    }

    #[test]
    fn value_at_zero_cancels_origin_factors() {
        // s^2 (s^2 + 10) / (s^2 (s^2 + 20))
        let num = p(&[0.0, 0.0, 10.0, 0.0, 1.0]);
        let den = p(&[0.0, 0.0, 20.0, 0.0, 1.0]);
        let r = RationalFunction {
            num: num.clone(),
            den: den.clone(),
        };
        assert!((r.value_at_zero().unwrap() - 0.5).abs() < 1e-12);

        let pole = RationalFunction::new(Polynomial::one(), Polynomial::s()).unwrap();
        assert_eq!(pole.value_at_zero(), None);

        // A soft network in rad/s: the constant term is tiny but real
        let soft = RationalFunction {
            num: p(&[1e-36]),
            den: p(&[1e-36, 0.0, 1.0, 0.0, 1.0]),
        };
        assert!((soft.value_at_zero().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn approx_eq_is_algebraic() {
        let tol = Tolerances::default();
        let a = RationalFunction::new(p(&[10.0]), p(&[10.0, 0.0, 1.0])).unwrap();
        let b = RationalFunction {
            num: p(&[20.0]),
            den: p(&[20.0, 0.0, 2.0]),
        };
        assert!(a.approx_eq(&b, tol));
        assert!(!a.approx_eq(&RationalFunction::one(), tol));
    }

    #[test]
    fn display() {
        let r = RationalFunction::new(p(&[10.0]), p(&[10.0, 0.0, 1.0])).unwrap();
        assert_eq!(r.to_string(), "10 / (s^2 + 10)");
        assert_eq!(RationalFunction::one().to_string(), "1");
    }
}
