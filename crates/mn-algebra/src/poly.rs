//! Real-coefficient polynomials in the Laplace variable `s`.

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use mn_core::{Real, Tolerances};
use nalgebra::Complex;

use crate::error::{AlgebraError, AlgebraResult};

/// Polynomial `c0 + c1 s + c2 s^2 + ...`.
///
/// Coefficients are stored in ascending order of degree. The highest stored
/// coefficient is never exactly zero, so the zero polynomial has no
/// coefficients at all.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<Real>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn one() -> Self {
        Self::constant(1.0)
    }

    pub fn constant(c: Real) -> Self {
        Self::from_coeffs(vec![c])
    }

    /// The Laplace variable itself.
    pub fn s() -> Self {
        Self::monomial(1.0, 1)
    }

    /// `c * s^degree`.
    pub fn monomial(c: Real, degree: usize) -> Self {
        let mut coeffs = vec![0.0; degree + 1];
        coeffs[degree] = c;
        Self::from_coeffs(coeffs)
    }

    /// Build from ascending coefficients; trailing exact zeros are dropped.
    pub fn from_coeffs(coeffs: Vec<Real>) -> Self {
        let mut p = Self { coeffs };
        p.normalize();
        p
    }

    fn normalize(&mut self) {
        while self.coeffs.last() == Some(&0.0) {
            self.coeffs.pop();
        }
    }

    /// Ascending coefficients.
    pub fn coeffs(&self) -> &[Real] {
        &self.coeffs
    }

    /// Coefficient of `s^k` (zero past the degree).
    pub fn coeff(&self, k: usize) -> Real {
        self.coeffs.get(k).copied().unwrap_or(0.0)
    }

    /// Degree, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Leading coefficient (zero for the zero polynomial).
    pub fn leading(&self) -> Real {
        self.coeffs.last().copied().unwrap_or(0.0)
    }

    /// Largest coefficient magnitude.
    pub fn max_abs(&self) -> Real {
        self.coeffs.iter().fold(0.0, |m, c| m.max(c.abs()))
    }

    /// Horner evaluation at a real point.
    pub fn eval(&self, s: Real) -> Real {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * s + c)
    }

    /// Horner evaluation at a complex point (e.g. `s = jω`).
    pub fn eval_complex(&self, s: Complex<Real>) -> Complex<Real> {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex::new(0.0, 0.0), |acc, &c| acc * s + c)
    }

    pub fn scale(&self, k: Real) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|c| c * k).collect())
    }

    /// `p(factor * s)`: coefficient `k` is multiplied by `factor^k`.
    pub fn rescale(&self, factor: Real) -> Self {
        let mut w = 1.0;
        Self::from_coeffs(
            self.coeffs
                .iter()
                .map(|c| {
                    let out = c * w;
                    w *= factor;
                    out
                })
                .collect(),
        )
    }

    /// Coefficient-wise magnitudes.
    pub fn magnitudes(&self) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|c| c.abs()).collect())
    }

    pub fn pow(&self, n: u32) -> Self {
        let mut out = Self::one();
        for _ in 0..n {
            out = &out * self;
        }
        out
    }

    /// Scale so that the leading coefficient is one. Zero stays zero.
    pub fn monic(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        self.scale(1.0 / self.leading())
    }

    /// Set every coefficient with magnitude at or below `threshold` to zero.
    pub fn chop(&self, threshold: Real) -> Self {
        Self::from_coeffs(
            self.coeffs
                .iter()
                .map(|&c| if c.abs() <= threshold { 0.0 } else { c })
                .collect(),
        )
    }

    /// Zero every coefficient at or below `rel` times the matching
    /// coefficient of `reference`, typically a bound on the magnitudes that
    /// were summed to produce it.
    pub fn chop_against(&self, reference: &Polynomial, rel: Real) -> Self {
        Self::from_coeffs(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(k, &c)| if c.abs() <= rel * reference.coeff(k) { 0.0 } else { c })
                .collect(),
        )
    }

    /// Chop relative to this polynomial's own coefficient scale.
    pub fn trimmed(&self, tol: Tolerances) -> Self {
        self.chop(tol.zero_threshold(self.max_abs()))
    }

    /// Multiplicity of the root at `s = 0`, counting coefficients at or
    /// below `threshold` as zero. `None` for the zero polynomial.
    pub fn zero_root_order(&self, threshold: Real) -> Option<usize> {
        self.coeffs.iter().position(|c| c.abs() > threshold)
    }

    /// Polynomial long division: `self = q * divisor + r`, `deg r < deg divisor`.
    pub fn div_rem(&self, divisor: &Polynomial) -> AlgebraResult<(Polynomial, Polynomial)> {
        let Some(dd) = divisor.degree() else {
            return Err(AlgebraError::DivisionByZero {
                what: "polynomial division",
            });
        };
        let Some(nd) = self.degree() else {
            return Ok((Self::zero(), Self::zero()));
        };
        if nd < dd {
            return Ok((Self::zero(), self.clone()));
        }

        let lead = divisor.leading();
        let mut rem = self.coeffs.clone();
        let mut quot = vec![0.0; nd - dd + 1];
        for k in (0..=nd - dd).rev() {
            let q = rem[k + dd] / lead;
            quot[k] = q;
            for (j, &d) in divisor.coeffs.iter().enumerate() {
                rem[k + j] -= q * d;
            }
            // The leading term cancels by construction
            rem[k + dd] = 0.0;
        }
        rem.truncate(dd);
        Ok((Self::from_coeffs(quot), Self::from_coeffs(rem)))
    }

    /// Division that is expected to be exact, e.g. the fraction-free
    /// elimination step. Fails if the remainder is not negligible relative
    /// to the dividend.
    pub fn exact_div(&self, divisor: &Polynomial, tol: Tolerances) -> AlgebraResult<Polynomial> {
        let (q, r) = self.div_rem(divisor)?;
        let threshold = tol.zero_threshold(self.max_abs());
        let rem = r.max_abs();
        if rem > threshold.max(tol.rel.sqrt() * self.max_abs()) {
            return Err(AlgebraError::InexactDivision { remainder: rem });
        }
        Ok(q)
    }

    /// Monic greatest common divisor via the Euclidean algorithm.
    ///
    /// Remainders are chopped relative to the operand scale, so numerically
    /// near-common factors are treated as common. Returns one when the
    /// operands are coprime and zero only if both are zero.
    pub fn gcd(&self, other: &Polynomial, tol: Tolerances) -> AlgebraResult<Polynomial> {
        let mut a = self.trimmed(tol).monic();
        let mut b = other.trimmed(tol).monic();
        if a.is_zero() {
            return Ok(b);
        }
        if b.is_zero() {
            return Ok(a);
        }
        if a.degree() < b.degree() {
            core::mem::swap(&mut a, &mut b);
        }
        while !b.is_zero() {
            let (_, r) = a.div_rem(&b)?;
            let threshold = tol.zero_threshold(a.max_abs().max(b.max_abs()));
            a = b;
            b = r.chop(threshold).monic();
        }
        Ok(a)
    }
}

impl From<Real> for Polynomial {
    fn from(c: Real) -> Self {
        Self::constant(c)
    }
}

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::from_coeffs((0..n).map(|k| self.coeff(k) + rhs.coeff(k)).collect())
    }
}

impl Sub<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::from_coeffs((0..n).map(|k| self.coeff(k) - rhs.coeff(k)).collect())
    }
}

impl Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut out = vec![0.0; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Polynomial::from_coeffs(out)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scale(-1.0)
    }
}

macro_rules! forward_owned_binop {
    ($($trait:ident::$method:ident),*) => {$(
        impl $trait<Polynomial> for Polynomial {
            type Output = Polynomial;
            fn $method(self, rhs: Polynomial) -> Polynomial {
                (&self).$method(&rhs)
            }
        }
        impl $trait<&Polynomial> for Polynomial {
            type Output = Polynomial;
            fn $method(self, rhs: &Polynomial) -> Polynomial {
                (&self).$method(rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul);

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        -&self
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (k, &c) in self.coeffs.iter().enumerate().rev() {
            if c == 0.0 {
                continue;
            }
            let mag = c.abs();
            if first {
                if c < 0.0 {
                    write!(f, "-")?;
                }
            } else if c < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            first = false;
            match k {
                0 => write!(f, "{mag}")?,
                _ => {
                    if mag != 1.0 {
                        write!(f, "{mag}*")?;
                    }
                    if k == 1 {
                        write!(f, "s")?;
                    } else {
                        write!(f, "s^{k}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(c: &[Real]) -> Polynomial {
        Polynomial::from_coeffs(c.to_vec())
    }

    #[test]
    fn trailing_zeros_are_dropped() {
        let q = p(&[1.0, 2.0, 0.0, 0.0]);
        assert_eq!(q.degree(), Some(1));
        assert!(p(&[0.0, 0.0]).is_zero());
        assert_eq!(Polynomial::zero().degree(), None);
    }

    #[test]
    fn arithmetic() {
        // (s + 1)(s - 1) = s^2 - 1
        let a = p(&[1.0, 1.0]);
        let b = p(&[-1.0, 1.0]);
        assert_eq!(&a * &b, p(&[-1.0, 0.0, 1.0]));
        assert_eq!(&a + &b, p(&[0.0, 2.0]));
        assert_eq!(&a - &a, Polynomial::zero());
        assert_eq!(Polynomial::s().pow(3), Polynomial::monomial(1.0, 3));
    }

    #[test]
    fn evaluation() {
        let q = p(&[10.0, 0.0, 1.0]);
        assert_eq!(q.eval(2.0), 14.0);
        let z = q.eval_complex(Complex::new(0.0, 2.0));
        assert!((z.re - 6.0).abs() < 1e-12);
        assert!(z.im.abs() < 1e-12);
    }

    #[test]
    fn long_division() {
        // s^3 + 2s^2 + 3s + 4 = (s + 1)(s^2 + s + 2) + 2
        let n = p(&[4.0, 3.0, 2.0, 1.0]);
        let d = p(&[1.0, 1.0]);
        let (q, r) = n.div_rem(&d).unwrap();
        assert_eq!(q, p(&[2.0, 1.0, 1.0]));
        assert_eq!(r, p(&[2.0]));
        assert!(n.div_rem(&Polynomial::zero()).is_err());
    }

    #[test]
    fn exact_division_checks_remainder() {
        let tol = Tolerances::default();
        let n = p(&[-1.0, 0.0, 1.0]);
        let d = p(&[1.0, 1.0]);
        assert_eq!(n.exact_div(&d, tol).unwrap(), p(&[-1.0, 1.0]));
        let err = p(&[4.0, 3.0, 2.0, 1.0]).exact_div(&d, tol).unwrap_err();
        assert!(matches!(err, AlgebraError::InexactDivision { .. }));
    }

    #[test]
    fn gcd_finds_common_factor() {
        let tol = Tolerances::default();
        // (s + 2)(s + 3) and (s + 2)(s - 5)
        let a = &p(&[2.0, 1.0]) * &p(&[3.0, 1.0]);
        let b = &p(&[2.0, 1.0]) * &p(&[-5.0, 1.0]);
        let g = a.gcd(&b, tol).unwrap();
        assert_eq!(g.degree(), Some(1));
        assert!((g.coeff(0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn gcd_of_coprime_is_one() {
        let tol = Tolerances::default();
        let g = p(&[10.0]).gcd(&p(&[10.0, 0.0, 1.0]), tol).unwrap();
        assert_eq!(g, Polynomial::one());
    }

    #[test]
    fn rescale_substitutes_the_variable() {
        // s^2 + 10 at 4s
        let q = p(&[10.0, 0.0, 1.0]).rescale(4.0);
        assert_eq!(q, p(&[10.0, 0.0, 16.0]));
        assert_eq!(q.rescale(0.25), p(&[10.0, 0.0, 1.0]));
        assert_eq!(p(&[-1.0, 2.0]).magnitudes(), p(&[1.0, 2.0]));
    }

    #[test]
    fn chop_against_uses_per_coefficient_bounds() {
        // Cancellation noise in the constant term, a genuine small s^2 term
        let q = p(&[1e-14, 3.0, 1e-6]);
        let bound = p(&[100.0, 3.0, 1e-6]);
        assert_eq!(q.chop_against(&bound, 1e-9), p(&[0.0, 3.0, 1e-6]));
    }

    #[test]
    fn zero_root_order() {
        let q = p(&[0.0, 0.0, 20.0, 0.0, 1.0]);
        assert_eq!(q.zero_root_order(0.0), Some(2));
        assert_eq!(Polynomial::zero().zero_root_order(0.0), None);
    }

    #[test]
    fn display() {
        assert_eq!(p(&[10.0, 0.0, 1.0]).to_string(), "s^2 + 10");
        assert_eq!(p(&[0.0, -1.0]).to_string(), "-s");
        assert_eq!(p(&[-3.0, 0.0, 0.0, 2.5]).to_string(), "2.5*s^3 - 3");
        assert_eq!(Polynomial::zero().to_string(), "0");
    }
}
