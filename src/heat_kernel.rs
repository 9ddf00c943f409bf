//! Heat-kernel operators `e^{τΔ}` on the sphere grid.
//!
//! Two realizations of the heat semigroup:
//!
//! 1. **SpectralHeatKernel** — exact exponential of the periodic 5-point
//!    stencil ∂²_θ + ∂²_φ on the (θ, φ) index torus. The stencil is a
//!    Kronecker sum of two circulant matrices, so
//!
//!    ```text
//!    e^{τ(A_θ ⊕ A_φ)} f = E_θ · f · E_φᵀ,    E = V diag(e^{τλ}) Vᵀ
//!    ```
//!
//!    with each factor diagonalized by `nalgebra::SymmetricEigen`. Every
//!    eigenvalue of A is ≤ 0, so the kernel is symmetric with spectrum in
//!    (0, 1] and `kernel_norm` is never negative.
//!
//! 2. **SeriesHeatKernel** — truncated Taylor series of the manifold's
//!    Laplace–Beltrami stencil. The cotθ term makes that stencil
//!    non-symmetric, so `apply` is not the gradient of `½ kernel_norm`.

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::error::{ensure_shape, HkrError, HkrResult};
use crate::manifold::{Field, S2Manifold};

/// Linear heat operator on fields of a fixed grid.
pub trait HeatKernel {
    /// Diffusion time τ.
    fn tau(&self) -> f64;

    /// Apply `e^{τΔ}` to `field`. Shape-preserving and deterministic.
    fn apply(&self, field: &Field) -> HkrResult<Field>;

    /// Quadratic form ⟨f, e^{τΔ} f⟩ as a plain sum over grid points.
    fn kernel_norm(&self, field: &Field) -> HkrResult<f64> {
        let smoothed = self.apply(field)?;
        Ok(field.dot(&smoothed))
    }
}

fn validate_tau(tau: f64) -> HkrResult<()> {
    if tau.is_finite() && tau >= 0.0 {
        Ok(())
    } else {
        Err(HkrError::InvalidParameter(format!(
            "diffusion time must be finite and non-negative, got {tau}"
        )))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Spectral kernel
// ─────────────────────────────────────────────────────────────────────────────

/// Circulant second-difference matrix of a periodic axis with `n` points.
///
/// Row i holds (1, −2, 1)/h² at columns (i−1, i, i+1) mod n. For n = 2 both
/// neighbours are the same column and their weights add.
pub fn periodic_second_difference(n: usize, h: f64) -> DMatrix<f64> {
    let inv_h2 = 1.0 / (h * h);
    let mut mat = DMatrix::zeros(n, n);
    for i in 0..n {
        mat[(i, i)] -= 2.0 * inv_h2;
        mat[(i, (i + 1) % n)] += inv_h2;
        mat[(i, (i + n - 1) % n)] += inv_h2;
    }
    mat
}

/// `e^{τA}` for symmetric `A`, with the per-mode decay factors e^{τλ}.
fn heat_propagator(generator: DMatrix<f64>, tau: f64) -> (DMatrix<f64>, DVector<f64>) {
    let eigen = SymmetricEigen::new(generator);
    let decay = eigen.eigenvalues.map(|lambda| (tau * lambda).exp());
    let v = &eigen.eigenvectors;
    let prop = v * DMatrix::from_diagonal(&decay) * v.transpose();
    // Remove round-off asymmetry from the reconstruction.
    let prop = (&prop + prop.transpose()) * 0.5;
    (prop, decay)
}

/// Exact heat semigroup of the periodic stencil, diagonalized per axis.
#[derive(Debug, Clone)]
pub struct SpectralHeatKernel {
    tau: f64,
    resolution: usize,
    theta_propagator: DMatrix<f64>,
    phi_propagator: DMatrix<f64>,
    theta_decay: DVector<f64>,
    phi_decay: DVector<f64>,
}

impl SpectralHeatKernel {
    /// Build `e^{τΔ}` for the grid of `manifold`, using its dθ = π/R and
    /// dφ = 2π/R stencil steps.
    pub fn new(manifold: &S2Manifold, tau: f64) -> HkrResult<Self> {
        validate_tau(tau)?;
        let r = manifold.resolution();

        let (theta_propagator, theta_decay) =
            heat_propagator(periodic_second_difference(r, manifold.theta_step()), tau);
        let (phi_propagator, phi_decay) =
            heat_propagator(periodic_second_difference(r, manifold.phi_step()), tau);

        log::debug!(
            "spectral heat kernel: R={r}, tau={tau}, slowest decay {:.3e}",
            theta_decay.min() * phi_decay.min()
        );

        Ok(Self {
            tau,
            resolution: r,
            theta_propagator,
            phi_propagator,
            theta_decay,
            phi_decay,
        })
    }

    /// Propagator acting along θ (left factor).
    pub fn theta_propagator(&self) -> &DMatrix<f64> {
        &self.theta_propagator
    }

    /// Propagator acting along φ (right factor).
    pub fn phi_propagator(&self) -> &DMatrix<f64> {
        &self.phi_propagator
    }

    /// All R² eigenvalues of the kernel, sorted descending.
    pub fn spectrum(&self) -> Vec<f64> {
        let mut vals: Vec<f64> = self
            .theta_decay
            .iter()
            .flat_map(|a| self.phi_decay.iter().map(move |b| a * b))
            .collect();
        vals.sort_by(|a, b| b.total_cmp(a));
        vals
    }
}

impl HeatKernel for SpectralHeatKernel {
    fn tau(&self) -> f64 {
        self.tau
    }

    fn apply(&self, field: &Field) -> HkrResult<Field> {
        ensure_shape((self.resolution, self.resolution), field.shape())?;
        // E_φ is symmetric, so it stands in for its own transpose.
        Ok(&self.theta_propagator * field * &self.phi_propagator)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Series kernel
// ─────────────────────────────────────────────────────────────────────────────

/// `Σ_{k=0}^{terms} (τΔ)^k f / k!` over the Laplace–Beltrami stencil.
///
/// The 1/sin²θ factor near the poles makes high powers of Δ grow fast; keep
/// τ and `terms` small.
#[derive(Debug, Clone)]
pub struct SeriesHeatKernel<'a> {
    manifold: &'a S2Manifold,
    tau: f64,
    terms: usize,
}

impl<'a> SeriesHeatKernel<'a> {
    pub fn new(manifold: &'a S2Manifold, tau: f64, terms: usize) -> HkrResult<Self> {
        validate_tau(tau)?;
        Ok(Self {
            manifold,
            tau,
            terms,
        })
    }

    pub fn terms(&self) -> usize {
        self.terms
    }
}

impl HeatKernel for SeriesHeatKernel<'_> {
    fn tau(&self) -> f64 {
        self.tau
    }

    fn apply(&self, field: &Field) -> HkrResult<Field> {
        self.manifold.check_shape(field)?;
        let mut term = field.clone();
        let mut acc = field.clone();
        for k in 1..=self.terms {
            term = self.manifold.laplacian(&term)? * (self.tau / k as f64);
            acc += &term;
        }
        Ok(acc)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
