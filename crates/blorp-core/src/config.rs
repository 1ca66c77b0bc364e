//! # Batch Configuration
//!
//! Sizing of the batch buffer shared by commands and indirect state.

use crate::types::ByteSize;

// =============================================================================
// BATCH CONFIGURATION
// =============================================================================

/// Batch buffer configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Total buffer size; commands grow up from 0, state grows down from here
    pub size: ByteSize,
    /// Words kept free at the end of the command area for the terminator
    pub reserved_words: usize,
}

impl BatchConfig {
    /// Default batch size: 8192 dwords
    pub const DEFAULT_SIZE: ByteSize = ByteSize::from_kib(32);

    /// Create a configuration with a custom buffer size
    pub const fn with_size(size: ByteSize) -> Self {
        Self {
            size,
            reserved_words: 8,
        }
    }

    /// Buffer size in 32-bit words
    pub const fn size_words(&self) -> usize {
        (self.size.as_bytes() / 4) as usize
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::with_size(Self::DEFAULT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_8k_dwords() {
        let config = BatchConfig::default();
        assert_eq!(config.size_words(), 8192);
        assert_eq!(config.reserved_words, 8);
    }
}
