//! Assembly of `A(s) x = b` from node equations.

use mn_algebra::{AlgebraError, Complex, Expr, Polynomial};
use mn_core::{CoordId, Real};
use mn_graph::CoordinateSpace;
use nalgebra::{DMatrix, DVector};

use crate::equation::NodeEquation;
use crate::error::{SolverError, SolverResult};

/// Square system `A(s) x = b` over the canonical coordinate order.
///
/// Entries of `A` are polynomials in `s`. The forcing vector keeps the
/// excitation symbolic (it may name parameters such as `F`), and is nonzero
/// only at the excitation coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    matrix: DMatrix<Polynomial>,
    forcing: Vec<Expr>,
    excitation: CoordId,
}

impl LinearSystem {
    /// Build a system directly from its parts.
    pub fn from_parts(
        matrix: DMatrix<Polynomial>,
        forcing: Vec<Expr>,
        excitation: CoordId,
    ) -> SolverResult<Self> {
        let n = matrix.nrows();
        if matrix.ncols() != n || forcing.len() != n {
            return Err(SolverError::Solve {
                what: format!(
                    "system shape {}x{} with {} forcing entries",
                    n,
                    matrix.ncols(),
                    forcing.len()
                ),
            });
        }
        if excitation.index() as usize >= n {
            return Err(SolverError::Solve {
                what: format!("excitation coordinate x{} outside the system", excitation.label()),
            });
        }
        Ok(Self {
            matrix,
            forcing,
            excitation,
        })
    }

    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &DMatrix<Polynomial> {
        &self.matrix
    }

    /// Coefficient of `x_col` in equation `row`.
    pub fn coefficient(&self, row: usize, col: usize) -> &Polynomial {
        &self.matrix[(row, col)]
    }

    pub fn forcing(&self) -> &[Expr] {
        &self.forcing
    }

    pub fn excitation(&self) -> CoordId {
        self.excitation
    }

    /// Matrix rows as owned polynomial vectors, for elimination.
    pub(crate) fn rows(&self) -> Vec<Vec<Polynomial>> {
        self.matrix
            .row_iter()
            .map(|row| row.iter().cloned().collect())
            .collect()
    }

    /// `A(s)` at a numeric point.
    pub fn evaluate(&self, s: Complex<Real>) -> DMatrix<Complex<Real>> {
        self.matrix.map(|p| p.eval_complex(s))
    }

    /// Unit forcing at the excitation coordinate, i.e. `b` divided by the
    /// excitation.
    pub fn unit_forcing(&self) -> DVector<Complex<Real>> {
        let mut b = DVector::zeros(self.size());
        b[self.excitation.index() as usize] = Complex::new(1.0, 0.0);
        b
    }
}

/// Extracts coefficient rows from node equations.
#[derive(Debug, Clone, Copy)]
pub struct LinearSystemBuilder<'a> {
    coords: &'a CoordinateSpace,
    excitation: CoordId,
}

impl<'a> LinearSystemBuilder<'a> {
    pub fn new(coords: &'a CoordinateSpace, excitation: CoordId) -> Self {
        Self { coords, excitation }
    }

    /// Build the system from one equation per coordinate, in canonical order.
    ///
    /// Every equation is checked to be affine in the coordinates with
    /// polynomial coefficients in `s`; anything else is a
    /// [`SolverError::NonLinearEquation`].
    pub fn build(&self, equations: &[NodeEquation]) -> SolverResult<LinearSystem> {
        let n = self.coords.len();
        if equations.len() != n {
            return Err(SolverError::Solve {
                what: format!("{} equations for {} coordinates", equations.len(), n),
            });
        }

        let mut entries = Vec::with_capacity(n * n);
        let mut forcing = Vec::with_capacity(n);
        for (coord, eq) in self.coords.ids().zip(equations) {
            let name = self.coords.name(coord);
            if eq.coordinate() != coord {
                return Err(SolverError::Solve {
                    what: format!(
                        "equation of x{} found where {name} was expected",
                        eq.coordinate().label()
                    ),
                });
            }

            let nonlinear = |what: String| SolverError::NonLinearEquation {
                coordinate: name.clone(),
                what,
            };

            let excited = eq.excitation().coordinates();
            if !excited.is_empty() {
                return Err(nonlinear(format!(
                    "excitation depends on {}",
                    join_coords(&excited)
                )));
            }

            let form = eq.response().linear_form().map_err(|e| match e {
                AlgebraError::NotAffine { what } => nonlinear(what),
                AlgebraError::UnboundSymbol { name } => {
                    nonlinear(format!("parameter '{name}' multiplies a coordinate"))
                }
                other => SolverError::Solve {
                    what: format!("coefficients of the equation of {name}: {other}"),
                },
            })?;

            if let Some(stray) = form.coordinates().find(|id| !self.coords.contains(*id)) {
                return Err(nonlinear(format!("unknown coordinate x{}", stray.label())));
            }

            entries.extend(self.coords.ids().map(|col| form.coefficient(col)));

            // Any s-only part moves to the forcing side
            let forcing_i = if form.constant_term().is_zero() {
                eq.excitation().clone()
            } else {
                eq.excitation().clone() - Expr::from_polynomial(form.constant_term())
            };
            if coord != self.excitation && !forcing_i.is_zero() {
                return Err(SolverError::Solve {
                    what: format!(
                        "forcing at {name}, but the network is excited at x{}",
                        self.excitation.label()
                    ),
                });
            }
            forcing.push(forcing_i);
        }

        tracing::debug!(
            size = n,
            excitation = %self.coords.name(self.excitation),
            "assembled linear system"
        );
        LinearSystem::from_parts(
            DMatrix::from_row_iterator(n, n, entries),
            forcing,
            self.excitation,
        )
    }
}

fn join_coords(ids: &[CoordId]) -> String {
    ids.iter()
        .map(|id| format!("x{}", id.label()))
        .collect::<Vec<_>>()
        .join(", ")
}
