//! Error type for HKR operations.

use thiserror::Error;

use crate::device::Device;

/// Root error type for manifold, kernel, functional and trainer failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HkrError {
    /// A field does not match the (R, R) grid of the owning manifold.
    #[error("shape mismatch: expected {expected:?} field, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Grid resolution below the two points per axis linspace needs.
    #[error("invalid resolution {0}: need at least 2 grid points per axis")]
    InvalidResolution(usize),

    /// Requested compute device is not available in this build.
    #[error("device {0} is not available")]
    DeviceUnavailable(Device),

    /// Invalid hyperparameter (τ, learning rate, step size, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type HkrResult<T> = Result<T, HkrError>;

/// Fail with [`HkrError::ShapeMismatch`] unless `actual == expected`.
pub(crate) fn ensure_shape(expected: (usize, usize), actual: (usize, usize)) -> HkrResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(HkrError::ShapeMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shape_mismatch() {
        let err = HkrError::ShapeMismatch {
            expected: (16, 16),
            actual: (8, 16),
        };
        assert_eq!(err.to_string(), "shape mismatch: expected (16, 16) field, got (8, 16)");
    }

    #[test]
    fn display_device_unavailable() {
        let err = HkrError::DeviceUnavailable(Device::Accelerator(1));
        assert_eq!(err.to_string(), "device accelerator:1 is not available");
    }

    #[test]
    fn ensure_shape_accepts_equal() {
        assert!(ensure_shape((4, 4), (4, 4)).is_ok());
        assert!(matches!(
            ensure_shape((4, 4), (4, 5)),
            Err(HkrError::ShapeMismatch { .. })
        ));
    }
}
