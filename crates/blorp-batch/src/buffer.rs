//! # Batch Buffer
//!
//! The command half of the batch buffer object: fixed-length packets are
//! opened with a declared word count, filled word by word and closed with a
//! length check.

use alloc::vec;
use alloc::vec::Vec;

use blorp_core::{BatchConfig, BufferObject, Error, GemDomain, Result};

use crate::reloc::RelocationList;
use crate::state::StateAnnotation;
use crate::submit::CommittedBatch;

/// MI_BATCH_BUFFER_END
pub const MI_BATCH_BUFFER_END: u32 = 0x0A << 23;
/// MI_NOOP
pub const MI_NOOP: u32 = 0;

// =============================================================================
// OPEN PACKET
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct OpenPacket {
    /// Word index of the packet header
    start: usize,
    /// Declared length in words
    declared: usize,
}

impl OpenPacket {
    fn end(&self) -> usize {
        self.start + self.declared
    }
}

// =============================================================================
// SAVED STATE
// =============================================================================

/// Snapshot of the batch cursors, used to abandon a half-built operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedState {
    used: usize,
    state_offset: usize,
    relocs: usize,
    annotations: usize,
}

// =============================================================================
// BATCH BUFFER
// =============================================================================

/// Batch statistics
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    /// Packets closed
    pub packets: u64,
    /// State blocks allocated
    pub state_blocks: u64,
    /// Batches handed out by `finish`
    pub submissions: u64,
    /// Rollbacks to a saved state
    pub rollbacks: u64,
}

/// Batch buffer under construction
///
/// Commands grow up from offset 0, indirect state grows down from the end of
/// the buffer. All offsets handed out are byte offsets within the buffer
/// object, which doubles as surface and dynamic state base address.
#[derive(Debug)]
pub struct BatchBuffer {
    /// Buffer object backing the batch
    bo: BufferObject,
    /// Configuration
    config: BatchConfig,
    /// CPU image of the buffer
    pub(crate) map: Vec<u32>,
    /// Command words emitted
    used: usize,
    /// Lowest byte offset owned by state
    pub(crate) state_offset: usize,
    /// Packet currently being filled
    open: Option<OpenPacket>,
    /// Pointer words awaiting patching
    pub(crate) relocs: RelocationList,
    /// Purpose of every state allocation
    pub(crate) annotations: Vec<StateAnnotation>,
    /// Statistics
    pub(crate) stats: BatchStats,
}

impl BatchBuffer {
    /// Create an empty batch backed by `bo`
    pub fn new(bo: BufferObject, config: BatchConfig) -> Self {
        let words = config.size_words();
        assert!(
            bo.size().as_bytes() >= config.size.as_bytes(),
            "batch buffer object smaller than configured batch"
        );

        Self {
            bo,
            map: vec![0; words],
            used: 0,
            state_offset: words * 4,
            open: None,
            relocs: RelocationList::new(),
            annotations: Vec::new(),
            stats: BatchStats::default(),
            config,
        }
    }

    /// Buffer object backing the batch
    pub fn bo(&self) -> BufferObject {
        self.bo
    }

    /// Configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Command words emitted so far
    pub fn used_words(&self) -> usize {
        self.used
    }

    /// Byte offset the next command word will land at
    pub fn cursor_offset(&self) -> u32 {
        (self.used * 4) as u32
    }

    /// Nothing emitted and no state allocated
    pub fn is_empty(&self) -> bool {
        self.used == 0 && self.state_offset == self.map.len() * 4
    }

    /// Relocations recorded so far
    pub fn relocations(&self) -> &RelocationList {
        &self.relocs
    }

    /// Statistics
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    /// End of the command area as far as state allocation is concerned
    pub(crate) fn command_high_water(&self) -> usize {
        self.open.map_or(self.used, |p| p.end()) + self.config.reserved_words
    }

    /// Word at a byte offset
    pub fn word_at(&self, offset: u32) -> u32 {
        self.map[offset as usize / 4]
    }

    // =========================================================================
    // PACKETS
    // =========================================================================

    /// Open a packet of exactly `words` words.
    ///
    /// # Panics
    ///
    /// If another packet is still open.
    pub fn begin(&mut self, words: usize) -> Result<()> {
        assert!(
            self.open.is_none(),
            "packet begun at word {} while another is open",
            self.used
        );
        assert!(words > 0, "empty packet");

        let limit = self.state_offset / 4;
        let available = limit.saturating_sub(self.used + self.config.reserved_words);
        if words > available {
            return Err(Error::BatchFull {
                requested: words,
                available,
            });
        }

        self.open = Some(OpenPacket {
            start: self.used,
            declared: words,
        });
        Ok(())
    }

    /// Append one word to the open packet
    pub fn emit(&mut self, word: u32) {
        let Some(packet) = self.open else {
            panic!("word emitted outside of a packet");
        };
        assert!(
            self.used < packet.end(),
            "packet at word {} overflows its declared length {}",
            packet.start,
            packet.declared
        );

        self.map[self.used] = word;
        self.used += 1;
    }

    /// Append a pointer word and its relocation
    pub fn emit_reloc(
        &mut self,
        target: &BufferObject,
        read_domains: GemDomain,
        write_domain: GemDomain,
        delta: u32,
    ) {
        let offset = self.cursor_offset();
        self.relocs
            .add(offset, target, read_domains, write_domain, delta);
        self.emit(target.presumed_word(delta));
    }

    /// Close the open packet.
    ///
    /// # Panics
    ///
    /// If the words emitted differ from the declared length.
    pub fn end(&mut self) {
        let Some(packet) = self.open.take() else {
            panic!("packet ended without begin");
        };
        let emitted = self.used - packet.start;
        assert_eq!(
            emitted, packet.declared,
            "packet at word {} declared {} words but emitted {}",
            packet.start, packet.declared, emitted
        );

        log::trace!(
            "packet {:#010x} len {} @{:#06x}",
            self.map[packet.start],
            packet.declared,
            packet.start * 4
        );
        self.stats.packets += 1;
    }

    /// Open, fill and close a packet from a word array
    pub fn emit_packet<const N: usize>(&mut self, words: [u32; N]) -> Result<()> {
        self.begin(N)?;
        for word in words {
            self.emit(word);
        }
        self.end();
        Ok(())
    }

    // =========================================================================
    // ROLLBACK
    // =========================================================================

    /// Snapshot the cursors before starting an operation
    pub fn save(&self) -> SavedState {
        assert!(self.open.is_none(), "save with an open packet");
        SavedState {
            used: self.used,
            state_offset: self.state_offset,
            relocs: self.relocs.len(),
            annotations: self.annotations.len(),
        }
    }

    /// Discard everything emitted since `saved`
    pub fn reset_to(&mut self, saved: &SavedState) {
        self.open = None;
        self.used = saved.used;
        self.state_offset = saved.state_offset;
        self.relocs.truncate(saved.relocs);
        self.annotations.truncate(saved.annotations);
        self.stats.rollbacks += 1;
        log::debug!(
            "batch rolled back to {} words, state @{:#x}",
            saved.used,
            saved.state_offset
        );
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Terminate the command stream and hand the batch out, leaving this
    /// buffer empty for the next operation.
    pub fn finish(&mut self) -> CommittedBatch {
        assert!(self.open.is_none(), "batch finished with an open packet");

        // The reserved tail always has room for the terminator.
        self.map[self.used] = MI_BATCH_BUFFER_END;
        self.used += 1;
        if self.used % 2 != 0 {
            self.map[self.used] = MI_NOOP;
            self.used += 1;
        }

        let words = self.map.len();
        let committed = CommittedBatch {
            bo: self.bo,
            image: core::mem::replace(&mut self.map, vec![0; words]),
            used_bytes: self.used * 4,
            state_offset: self.state_offset,
            relocations: self.relocs.take(),
            annotations: core::mem::take(&mut self.annotations),
        };

        log::debug!(
            "batch finished: {} command bytes, {} state bytes, {} relocations",
            committed.used_bytes,
            words * 4 - committed.state_offset,
            committed.relocations.len()
        );

        self.used = 0;
        self.state_offset = words * 4;
        self.stats.submissions += 1;
        committed
    }
}
