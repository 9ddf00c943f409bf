//! # hkr-sphere
//!
//! Heat Kernel Regularization (HKR) on a discretized 2-sphere.
//!
//! The HKR energy of a scalar field f on S² is
//!
//! ```text
//! E[f] = ½ ⟨f, e^{τΔ} f⟩
//! ```
//!
//! and penalizes content that survives diffusion for time τ. This crate
//! builds the pieces bottom-up:
//!
//! ```text
//! S2Manifold      (θ, φ) grid, metric, finite-difference Laplace–Beltrami
//!   ↓
//! HeatKernel      e^{τΔ} as apply / kernel_norm
//!   ↓
//! HkrFunctional   energy, gradient
//!   ↓
//! HkrTrainer      optimizer loop over a Differentiable objective
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use hkr_sphere::prelude::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn main() -> HkrResult<()> {
//! let manifold = S2Manifold::new(16, Device::Cpu)?;
//! let kernel = SpectralHeatKernel::new(&manifold, 0.01)?;
//! let functional = HkrFunctional::new(&manifold, &kernel);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let field = manifold.random_field(&mut rng, DEFAULT_FIELD_SCALE);
//! let smoothed = HkrTrainer::new(&functional, 1e-2, 100).run(&field)?;
//! println!("energy {:.4e} -> {:.4e}", functional.energy(&field)?, functional.energy(&smoothed)?);
//! # Ok(())
//! # }
//! ```

pub mod autodiff;
pub mod device;
pub mod error;
pub mod functional;
pub mod heat_kernel;
pub mod manifold;
pub mod optim;
pub mod trainer;

pub mod prelude {
    pub use crate::autodiff::*;
    pub use crate::device::*;
    pub use crate::error::*;
    pub use crate::functional::*;
    pub use crate::heat_kernel::*;
    pub use crate::manifold::*;
    pub use crate::optim::*;
    pub use crate::trainer::*;
}
