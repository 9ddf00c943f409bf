//! First-order optimizers over a single field parameter.
//!
//! A [`Parameter`] carries a value and an accumulated gradient; optimizers
//! read the gradient and update the value in place.

use crate::error::{ensure_shape, HkrError, HkrResult};
use crate::manifold::Field;

/// A trainable field with its accumulated gradient.
#[derive(Debug, Clone)]
pub struct Parameter {
    value: Field,
    grad: Field,
}

impl Parameter {
    /// Take ownership of `value` with a zeroed gradient.
    pub fn new(value: Field) -> Self {
        let grad = Field::zeros(value.nrows(), value.ncols());
        Self { value, grad }
    }

    pub fn value(&self) -> &Field {
        &self.value
    }

    pub fn grad(&self) -> &Field {
        &self.grad
    }

    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }

    /// Add `grad` into the accumulated gradient.
    pub fn accumulate(&mut self, grad: &Field) -> HkrResult<()> {
        ensure_shape(self.value.shape(), grad.shape())?;
        self.grad += grad;
        Ok(())
    }

    /// Drop the gradient and return the value.
    pub fn detach(self) -> Field {
        self.value
    }
}

/// Updates a parameter from its accumulated gradient.
pub trait Optimizer {
    fn step(&mut self, param: &mut Parameter) -> HkrResult<()>;
}

/// Plain gradient descent: p ← p − lr·g.
#[derive(Debug, Clone)]
pub struct Sgd {
    lr: f64,
}

impl Sgd {
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, param: &mut Parameter) -> HkrResult<()> {
        param.value -= &param.grad * self.lr;
        Ok(())
    }
}

/// Adam with bias-corrected moment estimates.
///
/// Moment buffers are sized on the first step and pinned to that shape.
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    m: Option<Field>,
    v: Option<Field>,
    t: u32,
}

impl Adam {
    pub fn new(lr: f64) -> Self {
        Self::with_params(lr, 0.9, 0.999, 1e-8)
    }

    pub fn with_params(lr: f64, beta1: f64, beta2: f64, eps: f64) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            eps,
            m: None,
            v: None,
            t: 0,
        }
    }

    /// Number of steps taken.
    pub fn iterations(&self) -> u32 {
        self.t
    }
}

impl Optimizer for Adam {
    fn step(&mut self, param: &mut Parameter) -> HkrResult<()> {
        let shape = param.value.shape();
        let m = self.m.get_or_insert_with(|| Field::zeros(shape.0, shape.1));
        let v = self.v.get_or_insert_with(|| Field::zeros(shape.0, shape.1));
        ensure_shape(m.shape(), shape)?;

        self.t = self.t.saturating_add(1);
        // Past i32::MAX both corrections are 1.0 to machine precision.
        let exp = i32::try_from(self.t).unwrap_or(i32::MAX);
        let (b1, b2) = (self.beta1, self.beta2);
        let bc1 = 1.0 - b1.powi(exp);
        let bc2 = 1.0 - b2.powi(exp);

        for ((p, g), (mi, vi)) in param
            .value
            .iter_mut()
            .zip(param.grad.iter())
            .zip(m.iter_mut().zip(v.iter_mut()))
        {
            *mi = b1 * *mi + (1.0 - b1) * g;
            *vi = b2 * *vi + (1.0 - b2) * g * g;
            let m_hat = *mi / bc1;
            let v_hat = *vi / bc2;
            *p -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
        }
        Ok(())
    }
}

/// Optimizer selection for a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptimizerKind {
    Adam { beta1: f64, beta2: f64, eps: f64 },
    Sgd,
}

impl Default for OptimizerKind {
    fn default() -> Self {
        OptimizerKind::Adam {
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
    }
}

impl OptimizerKind {
    /// Fresh optimizer state for one run.
    pub fn build(&self, lr: f64) -> HkrResult<Box<dyn Optimizer>> {
        match *self {
            OptimizerKind::Adam { beta1, beta2, eps } => {
                let betas_ok = (0.0..1.0).contains(&beta1) && (0.0..1.0).contains(&beta2);
                if !betas_ok || !(eps.is_finite() && eps > 0.0) {
                    return Err(HkrError::InvalidParameter(format!(
                        "adam needs betas in [0, 1) and eps > 0, got ({beta1}, {beta2}, {eps})"
                    )));
                }
                Ok(Box::new(Adam::with_params(lr, beta1, beta2, eps)))
            }
            OptimizerKind::Sgd => Ok(Box::new(Sgd::new(lr))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_grad_clears_accumulation() {
        let mut p = Parameter::new(Field::from_element(2, 2, 1.0));
        p.accumulate(&Field::from_element(2, 2, 0.5)).unwrap();
        p.accumulate(&Field::from_element(2, 2, 0.5)).unwrap();
        assert!(p.grad().iter().all(|g| *g == 1.0));
        p.zero_grad();
        assert!(p.grad().iter().all(|g| *g == 0.0));
    }

    #[test]
    fn accumulate_rejects_wrong_shape() {
        let mut p = Parameter::new(Field::zeros(3, 3));
        assert!(matches!(
            p.accumulate(&Field::zeros(2, 3)),
            Err(HkrError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn sgd_step() {
        let mut p = Parameter::new(Field::from_element(2, 2, 1.0));
        p.accumulate(&Field::from_element(2, 2, 2.0)).unwrap();
        Sgd::new(0.1).step(&mut p).unwrap();
        assert!(p.value().iter().all(|v| (v - 0.8).abs() < 1e-15));
    }

    #[test]
    fn adam_first_step_moves_by_lr() {
        // Bias correction makes the first update ≈ lr·sign(g).
        let mut p = Parameter::new(Field::from_row_slice(1, 3, &[1.0, 1.0, 1.0]));
        p.accumulate(&Field::from_row_slice(1, 3, &[0.5, -3.0, 1e-3])).unwrap();
        let mut adam = Adam::new(0.01);
        adam.step(&mut p).unwrap();
        assert_eq!(adam.iterations(), 1);
        assert!((p.value()[0] - 0.99).abs() < 1e-6);
        assert!((p.value()[1] - 1.01).abs() < 1e-6);
        assert!((p.value()[2] - 0.99).abs() < 1e-4);
    }

    #[test]
    fn adam_zero_gradient_is_noop() {
        let mut p = Parameter::new(Field::from_element(2, 2, 0.3));
        let mut adam = Adam::new(0.1);
        adam.step(&mut p).unwrap();
        assert!(p.value().iter().all(|v| *v == 0.3));
    }

    #[test]
    fn adam_minimizes_quadratic() {
        // f(x) = ½ x², grad = x
        let mut p = Parameter::new(Field::from_element(1, 1, 1.0));
        let mut adam = Adam::new(0.05);
        for _ in 0..500 {
            p.zero_grad();
            let g = p.value().clone();
            p.accumulate(&g).unwrap();
            adam.step(&mut p).unwrap();
        }
        assert!(p.value()[0].abs() < 0.05, "x = {}", p.value()[0]);
    }

    #[test]
    fn adam_step_counter_saturates() {
        let mut p = Parameter::new(Field::from_element(1, 2, 1.0));
        p.accumulate(&Field::from_element(1, 2, 0.5)).unwrap();
        let mut adam = Adam::new(0.01);
        adam.t = u32::MAX - 1;
        adam.step(&mut p).unwrap();
        adam.step(&mut p).unwrap();
        assert_eq!(adam.iterations(), u32::MAX);
        assert!(p.value().iter().all(|v| v.is_finite() && *v < 1.0), "{}", p.value());
    }

    #[test]
    fn adam_rejects_shape_change() {
        let mut adam = Adam::new(0.1);
        adam.step(&mut Parameter::new(Field::zeros(2, 2))).unwrap();
        assert!(adam.step(&mut Parameter::new(Field::zeros(3, 3))).is_err());
    }

    #[test]
    fn build_validates_adam_params() {
        assert!(OptimizerKind::default().build(0.01).is_ok());
        assert!(OptimizerKind::Sgd.build(0.01).is_ok());
        let bad = OptimizerKind::Adam {
            beta1: 1.0,
            beta2: 0.999,
            eps: 1e-8,
        };
        assert!(bad.build(0.01).is_err());
    }
}
