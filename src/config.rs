use crate::constants::*;
use crate::error::{KernelError, Result};

/// Runtime sizing of the frame store and its load windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Total number of frame slots; must be a multiple of `frame_group_size`
    pub frame_store_size: usize,
    pub frame_group_size: usize,
    /// Lines loaded when a program is first created
    pub initial_window: usize,
    /// Lines loaded from the faulting program counter on a fetch miss
    pub demand_window: usize,
}

impl KernelConfig {
    pub fn with_frame_store_size(frame_store_size: usize) -> Self {
        KernelConfig {
            frame_store_size,
            ..Self::default()
        }
    }

    pub fn frame_group_count(&self) -> usize {
        self.frame_store_size / self.frame_group_size
    }

    /// Reject sizings the frame store cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.frame_group_size == 0 {
            return Err(KernelError::InvalidConfig(
                "frame group size must be at least 1".to_string(),
            ));
        }
        if self.frame_store_size == 0 || self.frame_store_size % self.frame_group_size != 0 {
            return Err(KernelError::InvalidConfig(format!(
                "frame store size {} is not a positive multiple of the group size {}",
                self.frame_store_size, self.frame_group_size
            )));
        }
        if self.demand_window == 0 {
            return Err(KernelError::InvalidConfig(
                "demand load window must be at least 1".to_string(),
            ));
        }
        for (label, window) in [("initial", self.initial_window), ("demand", self.demand_window)] {
            if window > self.frame_store_size {
                return Err(KernelError::InvalidConfig(format!(
                    "{} load window {} exceeds frame store size {}",
                    label, window, self.frame_store_size
                )));
            }
        }
        Ok(())
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            frame_store_size: DEFAULT_FRAME_STORE_SIZE,
            frame_group_size: FRAME_GROUP_SIZE,
            initial_window: INITIAL_LOAD_WINDOW,
            demand_window: DEMAND_LOAD_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = KernelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_group_count(), DEFAULT_FRAME_STORE_SIZE / FRAME_GROUP_SIZE);
    }

    #[test]
    fn test_store_size_must_be_group_multiple() {
        let config = KernelConfig::with_frame_store_size(10);
        assert!(matches!(config.validate(), Err(KernelError::InvalidConfig(_))));

        let config = KernelConfig::with_frame_store_size(0);
        assert!(matches!(config.validate(), Err(KernelError::InvalidConfig(_))));
    }

    #[test]
    fn test_window_larger_than_store_rejected() {
        // Two groups fit the demand window but not the six-line initial window
        let config = KernelConfig::with_frame_store_size(3);
        assert!(matches!(config.validate(), Err(KernelError::InvalidConfig(_))));

        let config = KernelConfig {
            initial_window: 3,
            ..KernelConfig::with_frame_store_size(3)
        };
        assert!(config.validate().is_ok());
    }
}
