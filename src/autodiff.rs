//! Differentiable evaluators: scalar objectives over fields that also yield
//! their gradient.
//!
//! The trainer only depends on [`Differentiable`]. Objectives with a closed
//! form gradient (like the HKR functional) implement it directly;
//! [`FiniteDifference`] wraps any pure `Fn(&Field) -> HkrResult<f64>`.

use crate::error::{HkrError, HkrResult};
use crate::manifold::Field;

/// Default central-difference step.
pub const DEFAULT_FD_STEP: f64 = 1e-6;

/// A scalar objective with a gradient of the same shape as its input.
pub trait Differentiable {
    /// Evaluate `(value, ∂value/∂field)`.
    fn value_and_grad(&self, field: &Field) -> HkrResult<(f64, Field)>;
}

impl<D: Differentiable + ?Sized> Differentiable for &D {
    fn value_and_grad(&self, field: &Field) -> HkrResult<(f64, Field)> {
        (**self).value_and_grad(field)
    }
}

/// Central-difference gradient of a black-box objective.
///
/// Costs 2·R² + 1 objective evaluations per call.
pub struct FiniteDifference<F> {
    objective: F,
    step: f64,
}

impl<F> FiniteDifference<F>
where
    F: Fn(&Field) -> HkrResult<f64>,
{
    pub fn new(objective: F) -> Self {
        Self {
            objective,
            step: DEFAULT_FD_STEP,
        }
    }

    /// Use a custom step `h` (finite, > 0).
    pub fn with_step(objective: F, step: f64) -> HkrResult<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(HkrError::InvalidParameter(format!(
                "finite-difference step must be positive, got {step}"
            )));
        }
        Ok(Self { objective, step })
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl<F> Differentiable for FiniteDifference<F>
where
    F: Fn(&Field) -> HkrResult<f64>,
{
    fn value_and_grad(&self, field: &Field) -> HkrResult<(f64, Field)> {
        let value = (self.objective)(field)?;
        let h = self.step;
        let mut probe = field.clone();
        let mut grad = Field::zeros(field.nrows(), field.ncols());

        for idx in 0..field.len() {
            let x = field[idx];
            probe[idx] = x + h;
            let plus = (self.objective)(&probe)?;
            probe[idx] = x - h;
            let minus = (self.objective)(&probe)?;
            probe[idx] = x;
            grad[idx] = (plus - minus) / (2.0 * h);
        }

        Ok((value, grad))
    }
}
