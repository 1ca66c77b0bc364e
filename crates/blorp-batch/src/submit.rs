//! # Batch Submission
//!
//! A finished batch and the seam to whatever executes it.

use alloc::vec::Vec;

use blorp_core::{BufferObject, Result};

use crate::decode::{packets, Packet};
use crate::reloc::Relocation;
use crate::state::StateAnnotation;

// =============================================================================
// COMMITTED BATCH
// =============================================================================

/// A terminated batch ready for execution
#[derive(Debug, Clone)]
pub struct CommittedBatch {
    /// Buffer object backing the batch
    pub bo: BufferObject,
    /// Full buffer image, commands and state
    pub image: Vec<u32>,
    /// Bytes of commands including the terminator
    pub used_bytes: usize,
    /// Lowest byte offset owned by state
    pub state_offset: usize,
    /// Relocations in recording order
    pub relocations: Vec<Relocation>,
    /// State allocations in recording order
    pub annotations: Vec<StateAnnotation>,
}

impl CommittedBatch {
    /// Command words, terminator included
    pub fn commands(&self) -> &[u32] {
        &self.image[..self.used_bytes / 4]
    }

    /// Word at a byte offset
    pub fn word_at(&self, offset: u32) -> u32 {
        self.image[offset as usize / 4]
    }

    /// Decoded command packets
    pub fn packets(&self) -> impl Iterator<Item = Packet<'_>> + '_ {
        packets(self.commands()).filter_map(|p| p.ok())
    }

    /// Relocation recorded at `offset`
    pub fn relocation_at(&self, offset: u32) -> Option<&Relocation> {
        self.relocations.iter().find(|r| r.offset == offset)
    }

    /// Every relocated word holds its target's presumed address plus delta.
    ///
    /// This is the condition under which the kernel may skip patching.
    pub fn verify_relocations(&self) -> bool {
        self.relocations
            .iter()
            .all(|r| self.word_at(r.offset) == r.address().low32())
    }
}

// =============================================================================
// SUBMITTER
// =============================================================================

/// Executes finished batches
pub trait BatchSubmitter {
    /// Submit a batch for execution
    fn submit(&mut self, batch: CommittedBatch) -> Result<()>;
}
