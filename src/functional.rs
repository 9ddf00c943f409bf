//! HKR variational energy.
//!
//! E[f] = ½ ⟨f, e^{τΔ} f⟩,    ∂E/∂f = e^{τΔ} f
//!
//! The gradient formula holds for a symmetric kernel. That is a precondition
//! on the kernel, not something checked here.

use crate::autodiff::Differentiable;
use crate::error::HkrResult;
use crate::heat_kernel::HeatKernel;
use crate::manifold::{Field, S2Manifold};

/// Stateless energy evaluator over a manifold and a heat kernel.
#[derive(Debug, Clone, Copy)]
pub struct HkrFunctional<'a, K> {
    manifold: &'a S2Manifold,
    kernel: &'a K,
}

impl<'a, K: HeatKernel> HkrFunctional<'a, K> {
    pub fn new(manifold: &'a S2Manifold, kernel: &'a K) -> Self {
        Self { manifold, kernel }
    }

    pub fn manifold(&self) -> &'a S2Manifold {
        self.manifold
    }

    pub fn kernel(&self) -> &'a K {
        self.kernel
    }

    /// E[f] = ½ · kernel_norm(f).
    pub fn energy(&self, field: &Field) -> HkrResult<f64> {
        self.manifold.check_shape(field)?;
        Ok(0.5 * self.kernel.kernel_norm(field)?)
    }

    /// ∂E/∂f = e^{τΔ} f.
    pub fn grad(&self, field: &Field) -> HkrResult<Field> {
        self.manifold.check_shape(field)?;
        self.kernel.apply(field)
    }

    /// Energy and gradient, each from its own kernel evaluation.
    pub fn energy_and_grad(&self, field: &Field) -> HkrResult<(f64, Field)> {
        let energy = self.energy(field)?;
        let grad = self.grad(field)?;
        Ok((energy, grad))
    }
}

impl<K: HeatKernel> Differentiable for HkrFunctional<'_, K> {
    fn value_and_grad(&self, field: &Field) -> HkrResult<(f64, Field)> {
        self.energy_and_grad(field)
    }
}
