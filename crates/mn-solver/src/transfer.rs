//! Exact solution of `A(s) x = b` over rational functions of `s`.
//!
//! The system is linear in the excitation, so `x = excitation * y` with
//! `A y = e_exc`. By Cramer's rule `y_i = det(A_i) / det(A)`, where `A_i`
//! is `A` with column `i` replaced by `e_exc`. The transfer function
//! `x_last / x_exc` is then `det(A_last) / det(A_exc)` and no longer
//! depends on the excitation.
//!
//! Determinants are computed by fraction-free (Bareiss) elimination, so
//! every intermediate entry stays a polynomial. Elimination runs in the
//! normalised variable `u = s / omega` on `A / magnitude` (see
//! [`Scaling`]), which keeps stiff springs and light masses within a few
//! decades of each other. Results are mapped back to `s` at the end.

use mn_algebra::{Complex, Polynomial, RationalFunction};
use mn_core::{Real, Tolerances};

use crate::error::{SolverError, SolverResult};
use crate::system::LinearSystem;

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveConfig {
    /// Thresholds for cancellation noise, gcd and exact division.
    pub tolerances: Tolerances,
    /// Cancel common factors between numerator and denominator.
    pub reduce: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            reduce: true,
        }
    }
}

/// Power-of-two frequency and magnitude scales of `A(s)`.
///
/// `omega` is the geometric mean of the diagonal natural frequencies
/// `sqrt(c0 / c2)` and `magnitude` the geometric mean of the nonzero entry
/// sizes after substituting `s = omega * u`. Both are rounded to powers of
/// two, so scaling and unscaling are exact.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scaling {
    omega: Real,
    magnitude: Real,
}

impl Scaling {
    fn of(rows: &[Vec<Polynomial>]) -> Self {
        let frequencies = rows.iter().enumerate().filter_map(|(i, row)| {
            let (c0, c2) = (row[i].coeff(0), row[i].coeff(2));
            (c0 > 0.0 && c2 > 0.0).then(|| 0.5 * (c0 / c2).log2())
        });
        let omega = power_of_two(frequencies);

        let sizes = rows
            .iter()
            .flatten()
            .filter(|p| !p.is_zero())
            .map(|p| p.rescale(omega).max_abs().log2());
        let magnitude = power_of_two(sizes);

        Self { omega, magnitude }
    }

    /// `A(omega * u) / magnitude`.
    fn apply(&self, rows: Vec<Vec<Polynomial>>) -> Vec<Vec<Polynomial>> {
        rows.into_iter()
            .map(|row| {
                row.iter()
                    .map(|p| p.rescale(self.omega).scale(1.0 / self.magnitude))
                    .collect()
            })
            .collect()
    }
}

/// `2^round(mean)` of base-2 logarithms; one if there are none.
fn power_of_two(logs: impl Iterator<Item = Real>) -> Real {
    let (sum, count) = logs
        .filter(|v| v.is_finite())
        .fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 1.0;
    }
    let exponent = (sum / Real::from(count)).round().clamp(-256.0, 256.0);
    Real::powi(2.0, exponent as i32)
}

/// Symbolic and numeric solver for one assembled system.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferSolver {
    config: SolveConfig,
}

impl TransferSolver {
    pub fn new(config: SolveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolveConfig {
        &self.config
    }

    /// `det A(s)`.
    ///
    /// Fails with [`SolverError::SingularSystem`] if it vanishes identically.
    pub fn determinant(&self, system: &LinearSystem) -> SolverResult<Polynomial> {
        let scaling = Scaling::of(&system.rows());
        let det = self.scaled_determinant(system, scaling)?;
        let n = i32::try_from(system.size()).unwrap_or(i32::MAX);
        Ok(det.rescale(1.0 / scaling.omega).scale(scaling.magnitude.powi(n)))
    }

    /// Response of every coordinate per unit excitation, `x_i / excitation`.
    pub fn responses(&self, system: &LinearSystem) -> SolverResult<Vec<RationalFunction>> {
        let scaling = Scaling::of(&system.rows());
        let det = self.scaled_determinant(system, scaling)?;
        let exc = system.excitation().index() as usize;
        (0..system.size())
            .map(|col| {
                let num = self.det(replace_column(system, scaling, col, exc))?;
                let y = self.ratio(num, det.clone(), col)?;
                // det((A/c)_i) / det(A/c) = c * y_i
                Ok(y.rescaled(1.0 / scaling.omega).scaled(1.0 / scaling.magnitude))
            })
            .collect()
    }

    /// `x_last / x_exc` in lowest terms.
    pub fn transfer(&self, system: &LinearSystem) -> SolverResult<RationalFunction> {
        let scaling = Scaling::of(&system.rows());
        // Establish that the system is regular before taking cofactors
        self.scaled_determinant(system, scaling)?;

        let exc = system.excitation().index() as usize;
        let last = system.size() - 1;
        let den = self.det(replace_column(system, scaling, exc, exc))?;
        if den.is_zero() {
            return Err(SolverError::Solve {
                what: format!(
                    "response at the excited coordinate x{} vanishes identically",
                    exc + 1
                ),
            });
        }
        let num = self.det(replace_column(system, scaling, last, exc))?;

        let tf = self.ratio(num, den, last)?.rescaled(1.0 / scaling.omega);
        tracing::debug!(transfer = %tf, "transfer function");
        Ok(tf)
    }

    /// `x_last / x_exc` at a numeric point, by complex LU.
    pub fn transfer_at(
        &self,
        system: &LinearSystem,
        s: Complex<Real>,
    ) -> SolverResult<Complex<Real>> {
        let singular = || SolverError::SingularSystem {
            size: system.size(),
        };
        let y = system
            .evaluate(s)
            .lu()
            .solve(&system.unit_forcing())
            .ok_or_else(singular)?;
        if y.iter().any(|v| !(v.re.is_finite() && v.im.is_finite())) {
            return Err(singular());
        }

        let y_exc = y[system.excitation().index() as usize];
        if y_exc.norm() == 0.0 {
            return Err(SolverError::Solve {
                what: format!("response at the excited coordinate is zero at s = {s}"),
            });
        }
        Ok(y[system.size() - 1] / y_exc)
    }

    /// Determinant of the scaled matrix, in `u`.
    fn scaled_determinant(
        &self,
        system: &LinearSystem,
        scaling: Scaling,
    ) -> SolverResult<Polynomial> {
        let det = self.det(scaling.apply(system.rows()))?;
        if det.is_zero() {
            return Err(SolverError::SingularSystem {
                size: system.size(),
            });
        }
        tracing::debug!(
            size = system.size(),
            degree = ?det.degree(),
            omega = scaling.omega,
            magnitude = scaling.magnitude,
            "determinant"
        );
        Ok(det)
    }

    fn ratio(
        &self,
        num: Polynomial,
        den: Polynomial,
        col: usize,
    ) -> SolverResult<RationalFunction> {
        let tol = self.config.tolerances;
        let r = if self.config.reduce {
            RationalFunction::new_with(num, den, tol)
        } else {
            RationalFunction::unreduced(num, den, tol)
        };
        r.map_err(|e| SolverError::Solve {
            what: format!("response of x{}: {e}", col + 1),
        })
    }

    /// Bareiss determinant with row pivoting.
    ///
    /// Each cross product is compared coefficient-wise against the sum of
    /// the magnitudes that produced it; anything within the relative
    /// tolerance of that bound is cancellation noise and becomes zero.
    fn det(&self, mut m: Vec<Vec<Polynomial>>) -> SolverResult<Polynomial> {
        let tol = self.config.tolerances;
        let n = m.len();
        if n == 0 {
            return Ok(Polynomial::one());
        }

        let mut sign = 1.0;
        let mut prev = Polynomial::one();
        for k in 0..n - 1 {
            let Some(pivot) = (k..n).find(|&r| !m[r][k].is_zero()) else {
                return Ok(Polynomial::zero());
            };
            if pivot != k {
                m.swap(pivot, k);
                sign = -sign;
            }
            for i in k + 1..n {
                for j in k + 1..n {
                    let bound = &(&m[k][k].magnitudes() * &m[i][j].magnitudes())
                        + &(&m[i][k].magnitudes() * &m[k][j].magnitudes());
                    let cross = (&(&m[k][k] * &m[i][j]) - &(&m[i][k] * &m[k][j]))
                        .chop_against(&bound, tol.rel);

                    let (q, r) = cross.div_rem(&prev).map_err(|e| SolverError::Solve {
                        what: format!("elimination step {} of the {n}x{n} system: {e}", k + 1),
                    })?;
                    let limit = tol.rel.sqrt() * bound.max_abs();
                    if !r.coeffs().iter().all(|c| c.abs() <= limit) {
                        return Err(SolverError::Solve {
                            what: format!(
                                "elimination step {} of the {n}x{n} system left remainder {:e}",
                                k + 1,
                                r.max_abs()
                            ),
                        });
                    }
                    m[i][j] = q;
                }
                m[i][k] = Polynomial::zero();
            }
            prev = m[k][k].clone();
        }

        Ok(m[n - 1][n - 1].scale(sign))
    }
}

/// Scaled rows of `A` with column `col` replaced by the unit excitation
/// vector.
fn replace_column(
    system: &LinearSystem,
    scaling: Scaling,
    col: usize,
    exc: usize,
) -> Vec<Vec<Polynomial>> {
    let mut rows = scaling.apply(system.rows());
    for (i, row) in rows.iter_mut().enumerate() {
        row[col] = if i == exc {
            Polynomial::one()
        } else {
            Polynomial::zero()
        };
    }
    rows
}
