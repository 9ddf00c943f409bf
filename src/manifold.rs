//! Discretized 2-sphere S² on a fixed (θ, φ) grid.
//!
//! The grid is R × R: θ ∈ [0, π] varies along axis 0 (rows), φ ∈ [0, 2π]
//! along axis 1 (columns), both sampled with R linearly spaced points,
//! endpoints included.
//!
//! The Laplace–Beltrami operator in spherical coordinates,
//!
//! ```text
//! Δf = ∂²f/∂θ² + cotθ · ∂f/∂θ + (1/sin²θ) · ∂²f/∂φ²
//! ```
//!
//! is approximated by a 5-point stencil with circular wrap on **both** axes.
//! The θ wrap treats the poles as neighbours, a toroidal approximation that is
//! imprecise at the poles. The stencil uses dθ = π/R and dφ = 2π/R even though
//! the grid spans R−1 intervals per axis; both conventions are kept as is.

use std::f64::consts::PI;

use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::device::Device;
use crate::error::{ensure_shape, HkrError, HkrResult};

/// A scalar field sampled on the grid, shape (R, R).
pub type Field = DMatrix<f64>;

/// Additive guard on the 1/sin²θ and cotθ denominators at the poles.
pub const POLE_EPSILON: f64 = 1e-9;

/// Standard deviation used by [`S2Manifold::random_field`] callers by default.
pub const DEFAULT_FIELD_SCALE: f64 = 0.1;

/// The three raw finite-difference pieces of the Laplacian stencil.
#[derive(Debug, Clone)]
pub struct StencilTerms {
    /// (f[i+1,j] − 2f[i,j] + f[i−1,j]) / dθ²
    pub theta_second: Field,
    /// (f[i,j+1] − 2f[i,j] + f[i,j−1]) / dφ²
    pub phi_second: Field,
    /// (f[i+1,j] − f[i−1,j]) / (2dθ)
    pub theta_central: Field,
}

/// Discretized S² with its metric and Laplace–Beltrami stencil.
#[derive(Debug, Clone)]
pub struct S2Manifold {
    resolution: usize,
    device: Device,
    theta: Field,
    phi: Field,
    metric_det: Field,
    area_element: f64,
}

impl S2Manifold {
    /// Build the grid for `resolution` points per axis on `device`.
    ///
    /// Fails with [`HkrError::InvalidResolution`] below 2 and
    /// [`HkrError::DeviceUnavailable`] for devices this build cannot place
    /// fields on.
    pub fn new(resolution: usize, device: Device) -> HkrResult<Self> {
        if resolution < 2 {
            return Err(HkrError::InvalidResolution(resolution));
        }
        if !device.is_available() {
            return Err(HkrError::DeviceUnavailable(device));
        }

        let r = resolution;
        let span = (r - 1) as f64;
        let theta = DMatrix::from_fn(r, r, |i, _| i as f64 * PI / span);
        let phi = DMatrix::from_fn(r, r, |_, j| j as f64 * 2.0 * PI / span);
        let metric_det = theta.map(f64::sin);
        // Fixed normalization, not the quadrature weight of this grid.
        let area_element = 4.0 * PI / (r * r) as f64;

        log::debug!("S² grid: {r}x{r} on {device}, area element {area_element:.6e}");

        Ok(Self {
            resolution,
            device,
            theta,
            phi,
            metric_det,
            area_element,
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Polar angle θ[i, j] = i·π/(R−1).
    pub fn theta(&self) -> &Field {
        &self.theta
    }

    /// Azimuth φ[i, j] = j·2π/(R−1).
    pub fn phi(&self) -> &Field {
        &self.phi
    }

    /// Area density sin θ.
    pub fn metric_det(&self) -> &Field {
        &self.metric_det
    }

    /// 4π / R².
    pub fn area_element(&self) -> f64 {
        self.area_element
    }

    /// Stencil step along θ: π/R.
    pub fn theta_step(&self) -> f64 {
        PI / self.resolution as f64
    }

    /// Stencil step along φ: 2π/R.
    pub fn phi_step(&self) -> f64 {
        2.0 * PI / self.resolution as f64
    }

    /// Shape every field on this manifold must have.
    pub fn shape(&self) -> (usize, usize) {
        (self.resolution, self.resolution)
    }

    /// The zero field.
    pub fn zeros(&self) -> Field {
        DMatrix::zeros(self.resolution, self.resolution)
    }

    pub fn check_shape(&self, field: &Field) -> HkrResult<()> {
        ensure_shape(self.shape(), field.shape())
    }

    /// Raw finite differences of `field` with circular wrap on both axes.
    pub fn stencil_terms(&self, field: &Field) -> HkrResult<StencilTerms> {
        self.check_shape(field)?;

        let r = self.resolution;
        let d_theta = self.theta_step();
        let d_phi = self.phi_step();
        let inv_dt2 = 1.0 / (d_theta * d_theta);
        let inv_dp2 = 1.0 / (d_phi * d_phi);
        let inv_2dt = 1.0 / (2.0 * d_theta);

        let mut theta_second = DMatrix::zeros(r, r);
        let mut phi_second = DMatrix::zeros(r, r);
        let mut theta_central = DMatrix::zeros(r, r);

        for i in 0..r {
            let up = (i + r - 1) % r;
            let down = (i + 1) % r;
            for j in 0..r {
                let left = (j + r - 1) % r;
                let right = (j + 1) % r;
                let centre = field[(i, j)];

                theta_second[(i, j)] = (field[(down, j)] - 2.0 * centre + field[(up, j)]) * inv_dt2;
                phi_second[(i, j)] = (field[(i, right)] - 2.0 * centre + field[(i, left)]) * inv_dp2;
                theta_central[(i, j)] = (field[(down, j)] - field[(up, j)]) * inv_2dt;
            }
        }

        Ok(StencilTerms {
            theta_second,
            phi_second,
            theta_central,
        })
    }

    /// Finite-difference Laplace–Beltrami operator.
    ///
    /// `Δf ≈ f_θθ + f_φφ / (sin²θ + ε) + cosθ / (sinθ + ε) · f_θ`
    ///
    /// Values near the poles can be large; the ε guard keeps them finite
    /// rather than rejecting the field.
    pub fn laplacian(&self, field: &Field) -> HkrResult<Field> {
        let terms = self.stencil_terms(field)?;
        let r = self.resolution;

        Ok(DMatrix::from_fn(r, r, |i, j| {
            let (sin_t, cos_t) = self.theta[(i, j)].sin_cos();
            terms.theta_second[(i, j)]
                + terms.phi_second[(i, j)] / (sin_t * sin_t + POLE_EPSILON)
                + cos_t / (sin_t + POLE_EPSILON) * terms.theta_central[(i, j)]
        }))
    }

    /// I.i.d. standard normal field scaled by `scale`.
    pub fn random_field<R: Rng + ?Sized>(&self, rng: &mut R, scale: f64) -> Field {
        let r = self.resolution;
        DMatrix::from_fn(r, r, |_, _| {
            let z: f64 = StandardNormal.sample(&mut *rng);
            scale * z
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
