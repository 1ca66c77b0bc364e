//! # Indirect State Allocator
//!
//! Aligned state blocks carved downward from the top of the batch buffer.
//! Offsets are relative to the buffer start, which is also the surface and
//! dynamic state base address, so they go into pointer packets unchanged.

use blorp_core::{BufferObject, Error, GemDomain, Result};

use crate::buffer::BatchBuffer;

// =============================================================================
// STATE TAGS
// =============================================================================

/// What a state block holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateTag {
    /// Vertex data for the rectangle
    VertexBuffer,
    /// Per-render-target blend state
    BlendState,
    /// Color calculator state
    CcState,
    /// Depth / stencil state
    DepthStencilState,
    /// Pixel shader push constants
    WmConstants,
    /// Surface state
    SurfaceState,
    /// Binding table
    BindingTable,
    /// Sampler state
    SamplerState,
    /// Color calculator viewport
    CcViewport,
}

impl StateTag {
    /// Human readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::VertexBuffer => "vertex buffer",
            Self::BlendState => "BLEND_STATE",
            Self::CcState => "COLOR_CALC_STATE",
            Self::DepthStencilState => "DEPTH_STENCIL_STATE",
            Self::WmConstants => "WM constants",
            Self::SurfaceState => "SURFACE_STATE",
            Self::BindingTable => "binding table",
            Self::SamplerState => "SAMPLER_STATE",
            Self::CcViewport => "CC_VIEWPORT",
        }
    }
}

/// Record of one state allocation, kept for batch dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateAnnotation {
    /// What the block holds
    pub tag: StateTag,
    /// Byte offset within the batch buffer
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
}

/// An allocated state block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateBlock {
    /// Byte offset within the batch buffer
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
    /// What the block holds
    pub tag: StateTag,
}

impl StateBlock {
    /// Byte offset of word `index` of the block
    pub const fn word_offset(&self, index: usize) -> u32 {
        self.offset + (index as u32) * 4
    }
}

// =============================================================================
// ALLOCATION
// =============================================================================

impl BatchBuffer {
    /// Allocate `size` zeroed bytes of state at `align`.
    ///
    /// # Panics
    ///
    /// If `align` is not a power of two of at least 4, or `size` is not a
    /// non-zero multiple of 4.
    pub fn state_batch(
        &mut self,
        tag: StateTag,
        size: usize,
        align: usize,
    ) -> Result<(StateBlock, &mut [u32])> {
        assert!(
            align.is_power_of_two() && align >= 4,
            "bad state alignment {}",
            align
        );
        assert!(size > 0 && size % 4 == 0, "bad state size {}", size);

        let floor = self.command_high_water() * 4;
        let offset = match self.state_offset.checked_sub(size) {
            Some(top) => top & !(align - 1),
            None => 0,
        };
        if offset < floor || offset + size > self.state_offset {
            return Err(Error::StateSpaceExhausted {
                requested: size,
                alignment: align,
            });
        }

        self.state_offset = offset;
        self.stats.state_blocks += 1;
        self.annotations.push(StateAnnotation {
            tag,
            offset: offset as u32,
            size: size as u32,
        });

        log::trace!("{} @{:#06x} ({} bytes)", tag.name(), offset, size);

        let block = StateBlock {
            offset: offset as u32,
            size: size as u32,
            tag,
        };
        let words = &mut self.map[offset / 4..(offset + size) / 4];
        words.fill(0);
        Ok((block, words))
    }

    /// Turn word `index` of `block` into a pointer to `target`.
    ///
    /// Writes the presumed address and records the relocation.
    pub fn state_reloc(
        &mut self,
        block: &StateBlock,
        index: usize,
        target: &BufferObject,
        read_domains: GemDomain,
        write_domain: GemDomain,
        delta: u32,
    ) {
        assert!(
            (index * 4) < block.size as usize,
            "word {} outside {} block",
            index,
            block.tag.name()
        );
        let offset = block.word_offset(index);
        self.relocs
            .add(offset, target, read_domains, write_domain, delta);
        self.map[offset as usize / 4] = target.presumed_word(delta);
    }

    /// Allocations made so far
    pub fn annotations(&self) -> &[StateAnnotation] {
        &self.annotations
    }

    /// Lowest byte offset currently owned by state
    pub fn state_offset(&self) -> u32 {
        self.state_offset as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blorp_core::{BatchConfig, ByteSize, GpuAddr};

    fn batch_of(bytes: u64) -> BatchBuffer {
        let bo = BufferObject::new(
            1,
            GpuAddr::new(0x10_0000),
            ByteSize::from_bytes(bytes),
            "batch",
        );
        BatchBuffer::new(bo, BatchConfig::with_size(ByteSize::from_bytes(bytes)))
    }

    #[test]
    fn test_blocks_grow_down_aligned() {
        let mut batch = batch_of(4096);
        let (vb, words) = batch
            .state_batch(StateTag::VertexBuffer, 96, 32)
            .expect("space");
        assert_eq!(words.len(), 24);
        assert_eq!(vb.offset, 4096 - 96);

        let (blend, _) = batch
            .state_batch(StateTag::BlendState, 8, 64)
            .expect("space");
        assert_eq!(blend.offset % 64, 0);
        assert!(blend.offset + blend.size <= vb.offset);
        assert_eq!(batch.annotations().len(), 2);
    }

    #[test]
    fn test_blocks_are_zeroed() {
        let mut batch = batch_of(4096);
        let saved = batch.save();
        {
            let (_, words) = batch.state_batch(StateTag::CcState, 24, 64).expect("space");
            words.fill(0xdead_beef);
        }
        batch.reset_to(&saved);

        let (_, words) = batch.state_batch(StateTag::CcState, 24, 64).expect("space");
        assert!(words.iter().all(|&w| w == 0));
    }

    #[test]
    fn test_state_stays_clear_of_open_packet() {
        // 32 words, 8 reserved for the terminator.
        let mut batch = batch_of(128);
        batch.begin(12).expect("space");
        let err = batch
            .state_batch(StateTag::SurfaceState, 48, 32)
            .unwrap_err();
        assert!(matches!(err, Error::StateSpaceExhausted { .. }));
        for _ in 0..12 {
            batch.emit(0);
        }
        batch.end();
    }

    #[test]
    fn test_exhaustion_is_retryable() {
        let mut batch = batch_of(256);
        let err = batch
            .state_batch(StateTag::VertexBuffer, 512, 32)
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_state_reloc_patches_word() {
        let mut batch = batch_of(4096);
        let rt = BufferObject::new(5, GpuAddr::new(0x80_0000), ByteSize::KIB_4, "rt");
        let (surf, _) = batch
            .state_batch(StateTag::SurfaceState, 24, 32)
            .expect("space");
        batch.state_reloc(&surf, 1, &rt, GemDomain::RENDER, GemDomain::RENDER, 0x100);

        assert_eq!(batch.word_at(surf.word_offset(1)), 0x80_0100);
        let reloc = batch
            .relocations()
            .at(surf.word_offset(1))
            .expect("surface reloc");
        assert_eq!(reloc.write_domain, GemDomain::RENDER);
    }

    #[test]
    #[should_panic(expected = "bad state alignment")]
    fn test_non_power_of_two_alignment_panics() {
        let mut batch = batch_of(4096);
        let _ = batch.state_batch(StateTag::CcViewport, 8, 24);
    }
}
