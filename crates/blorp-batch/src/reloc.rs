//! # Relocation Tracker
//!
//! Every word in the batch buffer that holds a graphics address has exactly
//! one entry here. The kernel uses the list to pin the targets, patch the
//! words if a target moved, and flush the declared cache domains.

use alloc::vec::Vec;

use blorp_core::{BufferId, BufferObject, GemDomain, GpuAddr};
use hashbrown::HashMap;

// =============================================================================
// RELOCATION ENTRY
// =============================================================================

/// One pointer field awaiting kernel patching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    /// Byte offset of the pointer word within the batch buffer
    pub offset: u32,
    /// Buffer the word points into
    pub target: BufferId,
    /// Address the target had when the word was written
    pub presumed: GpuAddr,
    /// Addend relative to the start of the target
    pub delta: u32,
    /// Caches the GPU reads the target through
    pub read_domains: GemDomain,
    /// Cache the GPU writes the target through, if any
    pub write_domain: GemDomain,
}

impl Relocation {
    /// Address the pointer word resolves to
    pub fn address(&self) -> GpuAddr {
        self.presumed.offset(self.delta as u64)
    }
}

// =============================================================================
// RELOCATION LIST
// =============================================================================

/// Ordered relocation list with per-offset uniqueness
#[derive(Debug, Default)]
pub struct RelocationList {
    entries: Vec<Relocation>,
    /// offset -> index into `entries`
    by_offset: HashMap<u32, usize>,
}

impl RelocationList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a relocation.
    ///
    /// # Panics
    ///
    /// A second relocation at the same offset, an unaligned offset or an
    /// invalid write domain is a logic error in the emitter.
    pub fn add(
        &mut self,
        offset: u32,
        target: &BufferObject,
        read_domains: GemDomain,
        write_domain: GemDomain,
        delta: u32,
    ) {
        assert!(offset % 4 == 0, "relocation offset {:#x} not dword aligned", offset);
        assert!(
            write_domain.is_valid_write_domain(),
            "invalid write domain {:?}",
            write_domain
        );
        assert!(
            !read_domains.contains(GemDomain::CPU),
            "CPU domain in GPU relocation"
        );

        let index = self.entries.len();
        let previous = self.by_offset.insert(offset, index);
        assert!(
            previous.is_none(),
            "duplicate relocation at batch offset {:#x}",
            offset
        );

        log::trace!(
            "reloc @{:#06x} -> {} (+{:#x}) r={:?} w={:?}",
            offset,
            target.name(),
            delta,
            read_domains,
            write_domain
        );

        self.entries.push(Relocation {
            offset,
            target: target.id(),
            presumed: target.presumed(),
            delta,
            read_domains,
            write_domain,
        });
    }

    /// Relocation recorded for `offset`
    pub fn at(&self, offset: u32) -> Option<&Relocation> {
        self.by_offset.get(&offset).map(|&i| &self.entries[i])
    }

    /// Number of relocations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in recording order
    pub fn iter(&self) -> impl Iterator<Item = &Relocation> {
        self.entries.iter()
    }

    /// Drop every relocation recorded after the first `len`
    pub fn truncate(&mut self, len: usize) {
        for reloc in self.entries.drain(len.min(self.entries.len())..) {
            self.by_offset.remove(&reloc.offset);
        }
    }

    /// Move all entries out, leaving the list empty
    pub fn take(&mut self) -> Vec<Relocation> {
        self.by_offset.clear();
        core::mem::take(&mut self.entries)
    }
}
