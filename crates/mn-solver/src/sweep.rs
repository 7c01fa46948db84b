//! Frequency response of a transfer function along `s = jω`.

use mn_algebra::{Complex, RationalFunction};
use mn_core::Real;
use rayon::prelude::*;

use crate::error::{SolverError, SolverResult};

/// Spacing of the angular frequency grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepSpacing {
    Linear,
    /// Equal ratios between neighbours.
    #[default]
    Logarithmic,
}

/// Sweep parameters. Frequencies are angular (rad/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParams {
    pub w_start: Real,
    pub w_stop: Real,
    /// Total number of points, endpoints included.
    pub points: usize,
    pub spacing: SweepSpacing,
}

impl SweepParams {
    pub fn logarithmic(w_start: Real, w_stop: Real, points: usize) -> Self {
        Self {
            w_start,
            w_stop,
            points,
            spacing: SweepSpacing::Logarithmic,
        }
    }

    fn validate(&self) -> SolverResult<()> {
        let invalid = |what: String| Err(SolverError::InvalidSweep { what });
        if !(self.w_start.is_finite() && self.w_stop.is_finite()) {
            return invalid(format!("bounds {} .. {} must be finite", self.w_start, self.w_stop));
        }
        if self.w_start < 0.0 || self.w_stop < self.w_start {
            return invalid(format!(
                "need 0 <= w_start <= w_stop, got {} .. {}",
                self.w_start, self.w_stop
            ));
        }
        if self.spacing == SweepSpacing::Logarithmic && self.w_start == 0.0 {
            return invalid("logarithmic spacing needs w_start > 0".to_string());
        }
        if self.points == 0 {
            return invalid("at least one point is required".to_string());
        }
        Ok(())
    }
}

/// Generate the angular frequency grid.
pub fn generate_frequencies(params: &SweepParams) -> SolverResult<Vec<Real>> {
    params.validate()?;
    if params.points == 1 {
        return Ok(vec![params.w_start]);
    }
    let last = (params.points - 1) as Real;
    let grid = match params.spacing {
        SweepSpacing::Linear => {
            let step = (params.w_stop - params.w_start) / last;
            (0..params.points)
                .map(|i| params.w_start + step * i as Real)
                .collect()
        }
        SweepSpacing::Logarithmic => {
            let ratio = (params.w_stop / params.w_start).ln();
            (0..params.points)
                .map(|i| params.w_start * (ratio * i as Real / last).exp())
                .collect()
        }
    };
    Ok(grid)
}

/// One evaluated frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// Angular frequency (rad/s).
    pub omega: Real,
    pub response: Complex<Real>,
}

impl SweepPoint {
    pub fn magnitude(&self) -> Real {
        self.response.norm()
    }

    pub fn magnitude_db(&self) -> Real {
        20.0 * self.magnitude().log10()
    }

    /// Phase in degrees.
    pub fn phase_deg(&self) -> Real {
        self.response.arg().to_degrees()
    }
}

/// A transfer function sampled on a frequency grid.
///
/// Undamped networks have poles on the imaginary axis; a grid point that
/// lands on one yields a non-finite response rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySweep {
    points: Vec<SweepPoint>,
}

impl FrequencySweep {
    /// Evaluate `tf(jω)` at every grid frequency, in parallel.
    pub fn evaluate(tf: &RationalFunction, params: &SweepParams) -> SolverResult<Self> {
        let omegas = generate_frequencies(params)?;
        tracing::debug!(points = omegas.len(), "frequency sweep");
        let points = omegas
            .par_iter()
            .map(|&omega| SweepPoint {
                omega,
                response: tf.eval_complex(Complex::new(0.0, omega)),
            })
            .collect();
        Ok(Self { points })
    }

    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    pub fn frequencies(&self) -> Vec<Real> {
        self.points.iter().map(|p| p.omega).collect()
    }

    /// `(omega, magnitude in dB)` pairs.
    pub fn magnitude_db(&self) -> Vec<(Real, Real)> {
        self.points.iter().map(|p| (p.omega, p.magnitude_db())).collect()
    }

    /// `(omega, phase in degrees)` pairs.
    pub fn phase_deg(&self) -> Vec<(Real, Real)> {
        self.points.iter().map(|p| (p.omega, p.phase_deg())).collect()
    }
}
