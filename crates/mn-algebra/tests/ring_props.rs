//! Property tests for polynomial and rational-function arithmetic.

use mn_algebra::{Polynomial, RationalFunction};
use mn_core::{Tolerances, nearly_equal};
use proptest::prelude::*;

fn small_poly() -> impl Strategy<Value = Polynomial> {
    prop::collection::vec(-5i32..=5, 1..5)
        .prop_map(|c| Polynomial::from_coeffs(c.into_iter().map(f64::from).collect()))
}

fn monic_linear() -> impl Strategy<Value = Polynomial> {
    (-5i32..=5).prop_map(|r| Polynomial::from_coeffs(vec![f64::from(r), 1.0]))
}

/// Positive coefficients from 1e-2 to 1e6, like the entries of `A(s)`.
fn physical_poly() -> impl Strategy<Value = Polynomial> {
    prop::collection::vec(-2.0f64..6.0, 1..6)
        .prop_map(|e| Polynomial::from_coeffs(e.into_iter().map(|e| 10f64.powf(e)).collect()))
}

/// A base frequency from 1e-2 to 1e6 and three root magnitudes within
/// 1.5 decades of it.
fn scaled_roots() -> impl Strategy<Value = (f64, [f64; 3])> {
    (-2.0f64..6.0).prop_flat_map(|base| {
        let root = (-1.5f64..1.5).prop_map(move |e| 10f64.powf(base + e));
        (Just(10f64.powf(base)), [root.clone(), root.clone(), root])
    })
}

fn distinct(a: f64, b: f64) -> bool {
    (a / b).ln().abs() > 0.01
}

proptest! {
    #[test]
    fn multiplication_commutes(a in small_poly(), b in small_poly()) {
        prop_assert_eq!(&a * &b, &b * &a);
    }

    #[test]
    fn product_evaluates_pointwise(a in small_poly(), b in small_poly(), s in -3.0f64..3.0) {
        let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
        prop_assert!(nearly_equal((&a * &b).eval(s), a.eval(s) * b.eval(s), tol));
    }

    #[test]
    fn division_reconstructs_dividend(a in small_poly(), b in small_poly()) {
        prop_assume!(!b.is_zero());
        let (q, r) = a.div_rem(&b).unwrap();
        let back = &(&q * &b) + &r;
        let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
        for k in 0..a.coeffs().len().max(back.coeffs().len()) {
            prop_assert!(nearly_equal(a.coeff(k), back.coeff(k), tol));
        }
        if let Some(rd) = r.degree() {
            prop_assert!(rd < b.degree().unwrap());
        }
    }

    #[test]
    fn shared_linear_factor_cancels(f in monic_linear(), a in monic_linear(), b in monic_linear()) {
        prop_assume!(a != b);
        let r = RationalFunction::new(&f * &a, &f * &b).unwrap();
        prop_assert_eq!(r.den().degree(), Some(1));
        prop_assert_eq!(r.num().degree(), Some(1));
    }
}

proptest! {
    #[test]
    fn product_evaluates_pointwise_at_scale(
        a in physical_poly(),
        b in physical_poly(),
        e in -2.0f64..3.0,
    ) {
        // Positive coefficients and a positive point: no cancellation
        let s = 10f64.powf(e);
        let tol = Tolerances { abs: 0.0, rel: 1e-12 };
        prop_assert!(nearly_equal((&a * &b).eval(s), a.eval(s) * b.eval(s), tol));
    }

    #[test]
    fn rescaled_evaluates_at_the_scaled_point(
        num in physical_poly(),
        den in physical_poly(),
        e in -2.0f64..2.0,
        w in -1.0f64..1.0,
    ) {
        let r = RationalFunction::unreduced(num, den, Tolerances { abs: 0.0, rel: 0.0 }).unwrap();
        let factor = 10f64.powf(e);
        let s = 10f64.powf(w);
        let tol = Tolerances { abs: 0.0, rel: 1e-9 };
        prop_assert!(nearly_equal(r.rescaled(factor).eval(s), r.eval(factor * s), tol));
    }

    #[test]
    fn shared_factor_cancels_in_normalised_variable((base, [f, a, b]) in scaled_roots()) {
        prop_assume!(distinct(a, b) && distinct(a, f) && distinct(b, f));
        let linear = |r: f64| Polynomial::from_coeffs(vec![r, 1.0]);
        let omega = 2f64.powi(base.log2().round() as i32);

        let num = (&linear(f) * &linear(a)).rescale(omega);
        let den = (&linear(f) * &linear(b)).rescale(omega);
        let r = RationalFunction::new(num, den).unwrap().rescaled(1.0 / omega);
        prop_assert_eq!(r.num().degree(), Some(1));
        prop_assert_eq!(r.den().degree(), Some(1));

        let expected = (base + a) / (base + b);
        let tol = Tolerances { abs: 0.0, rel: 1e-9 };
        prop_assert!(nearly_equal(r.eval(base), expected, tol));
    }
}
