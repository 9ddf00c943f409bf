//! τ-evolution: gradient-based minimization of the HKR functional.
//!
//! One run:
//! 1. Clone the initial field into a [`Parameter`] and build a fresh optimizer
//! 2. For exactly `steps` iterations:
//!    a. clear the accumulated gradient
//!    b. evaluate energy and gradient through the [`Differentiable`] objective
//!    c. accumulate the gradient
//!    d. take one optimizer step
//! 3. Return the detached field
//!
//! There is no early stopping and no divergence check. A non-finite energy
//! flows into later steps and into the returned field.

use crate::autodiff::Differentiable;
use crate::error::{HkrError, HkrResult};
use crate::manifold::Field;
use crate::optim::{OptimizerKind, Parameter};

/// Hyperparameters for a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainerConfig {
    /// Learning rate handed to the optimizer.
    pub lr: f64,
    /// Number of optimizer steps.
    pub steps: usize,
    /// Optimizer built at the start of each run.
    pub optimizer: OptimizerKind,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            lr: 1e-2,
            steps: 100,
            optimizer: OptimizerKind::default(),
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> HkrResult<()> {
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(HkrError::InvalidParameter(format!(
                "learning rate must be finite and positive, got {}",
                self.lr
            )));
        }
        Ok(())
    }
}

/// Result of a run that also tracked the energy trajectory.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    /// Final field, no gradient attached.
    pub field: Field,
    /// Energy evaluated at the start of each step (len == steps).
    pub energies: Vec<f64>,
}

/// Minimizes a differentiable objective over a field.
pub struct HkrTrainer<'a, D: ?Sized> {
    objective: &'a D,
    config: TrainerConfig,
}

// No bounds on `D`, so trait-object objectives stay cloneable and printable.
impl<D: ?Sized> Clone for HkrTrainer<'_, D> {
    fn clone(&self) -> Self {
        Self {
            objective: self.objective,
            config: self.config,
        }
    }
}

impl<D: ?Sized> std::fmt::Debug for HkrTrainer<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HkrTrainer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, D: Differentiable + ?Sized> HkrTrainer<'a, D> {
    /// Adam trainer with the given learning rate and step count.
    pub fn new(objective: &'a D, lr: f64, steps: usize) -> Self {
        Self::with_config(
            objective,
            TrainerConfig {
                lr,
                steps,
                ..TrainerConfig::default()
            },
        )
    }

    pub fn with_config(objective: &'a D, config: TrainerConfig) -> Self {
        Self { objective, config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Run `steps` optimizer steps from `field` and return the result.
    pub fn run(&self, field: &Field) -> HkrResult<Field> {
        self.run_with_history(field).map(|outcome| outcome.field)
    }

    /// Like [`run`](Self::run), also returning the energy at every step.
    pub fn run_with_history(&self, field: &Field) -> HkrResult<TrainOutcome> {
        self.config.validate()?;
        let TrainerConfig { lr, steps, optimizer } = self.config;

        let mut param = Parameter::new(field.clone());
        let mut opt = optimizer.build(lr)?;
        let mut energies = Vec::with_capacity(steps);
        let report_every = (steps / 10).max(1);

        log::info!("HKR evolution: {steps} steps, lr={lr}, optimizer={optimizer:?}");

        for step in 0..steps {
            param.zero_grad();
            let (energy, grad) = self.objective.value_and_grad(param.value())?;
            param.accumulate(&grad)?;
            opt.step(&mut param)?;

            log::trace!("step {step}: energy {energy:.6e}");
            if (step + 1) % report_every == 0 {
                log::debug!("HKR evolution {}/{steps}: energy {energy:.6e}", step + 1);
            }
            energies.push(energy);
        }

        if let (Some(first), Some(last)) = (energies.first(), energies.last()) {
            log::info!("HKR evolution done: energy {first:.6e} -> {last:.6e}");
        }

        Ok(TrainOutcome {
            field: param.detach(),
            energies,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
