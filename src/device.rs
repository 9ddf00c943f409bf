//! Compute placement for grids and fields.

use std::fmt;

/// Where a manifold's grid and fields live.
///
/// Set once at construction. Only [`Device::Cpu`] is backed in this crate;
/// accelerators are typed so callers can express placement without strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Device {
    #[default]
    Cpu,
    /// Accelerator by ordinal.
    Accelerator(usize),
}

impl Device {
    /// Whether fields can be placed on this device.
    pub fn is_available(&self) -> bool {
        matches!(self, Device::Cpu)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Accelerator(index) => write!(f, "accelerator:{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_cpu() {
        assert_eq!(Device::default(), Device::Cpu);
        assert!(Device::Cpu.is_available());
    }

    #[test]
    fn accelerator_not_available() {
        assert!(!Device::Accelerator(0).is_available());
        assert_eq!(Device::Accelerator(0).to_string(), "accelerator:0");
    }
}
