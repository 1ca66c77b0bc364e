//! # Memory Domains
//!
//! Cache domains a relocation declares for its target buffer, so the kernel
//! can flush and invalidate coherently at submission time.

bitflags::bitflags! {
    /// GEM memory domains
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GemDomain: u32 {
        /// CPU cache
        const CPU = 0x0000_0001;
        /// Render cache, used by 2D and 3D drawing
        const RENDER = 0x0000_0002;
        /// Sampler cache, used by texture engine
        const SAMPLER = 0x0000_0004;
        /// Command queue, used to load batch buffers
        const COMMAND = 0x0000_0008;
        /// Instruction cache, used by shader programs
        const INSTRUCTION = 0x0000_0010;
        /// Vertex address cache
        const VERTEX = 0x0000_0020;
        /// GTT domain - aperture and scanout
        const GTT = 0x0000_0040;
    }
}

impl GemDomain {
    /// A write domain names at most one cache.
    pub fn is_valid_write_domain(self) -> bool {
        self.bits().count_ones() <= 1 && !self.contains(GemDomain::CPU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_domain_single_bit() {
        assert!(GemDomain::empty().is_valid_write_domain());
        assert!(GemDomain::RENDER.is_valid_write_domain());
        assert!(!(GemDomain::RENDER | GemDomain::INSTRUCTION).is_valid_write_domain());
        assert!(!GemDomain::CPU.is_valid_write_domain());
    }
}
