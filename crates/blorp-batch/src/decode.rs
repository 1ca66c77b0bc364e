//! # Command Stream Decoder
//!
//! Splits a command stream back into packets using the header length
//! encoding. Used for batch dumps and by tests asserting packet order.

use core::fmt;

use crate::buffer::MI_BATCH_BUFFER_END;

// =============================================================================
// PACKET
// =============================================================================

/// One decoded packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    /// Byte offset of the header
    pub offset: u32,
    /// Packet words, header first
    pub words: &'a [u32],
}

impl<'a> Packet<'a> {
    /// Header word
    pub fn header(&self) -> u32 {
        self.words[0]
    }

    /// Command type, opcode and sub-opcode (upper 16 header bits)
    pub fn opcode(&self) -> u16 {
        (self.header() >> 16) as u16
    }

    /// Total length in words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false, a packet has at least its header
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word `index` of the packet, header is 0
    pub fn dw(&self, index: usize) -> u32 {
        self.words[index]
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Decoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Header length runs past the end of the stream
    Truncated {
        /// Byte offset of the header
        offset: u32,
        /// Words the header declares
        declared: usize,
    },
    /// Command type this decoder does not know
    UnknownType {
        /// Byte offset of the header
        offset: u32,
        /// Header word
        header: u32,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { offset, declared } => write!(
                f,
                "packet at {:#x} declares {} words past end of stream",
                offset, declared
            ),
            Self::UnknownType { offset, header } => {
                write!(f, "unknown command type {:#010x} at {:#x}", header, offset)
            }
        }
    }
}

// =============================================================================
// DECODER
// =============================================================================

const CMD_TYPE_MI: u32 = 0;
const CMD_TYPE_2D: u32 = 2;
const CMD_TYPE_3D: u32 = 3;

fn packet_len(header: u32) -> Option<usize> {
    match header >> 29 {
        CMD_TYPE_MI => {
            let opcode = (header >> 23) & 0x3f;
            if opcode < 0x10 {
                Some(1)
            } else {
                Some((header & 0x3f) as usize + 2)
            }
        }
        CMD_TYPE_2D | CMD_TYPE_3D => Some((header & 0xff) as usize + 2),
        _ => None,
    }
}

/// Iterator over the packets of a command stream
#[derive(Debug, Clone)]
pub struct Packets<'a> {
    words: &'a [u32],
    pos: usize,
    done: bool,
}

impl<'a> Iterator for Packets<'a> {
    type Item = Result<Packet<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.words.len() {
            return None;
        }

        let header = self.words[self.pos];
        let offset = (self.pos * 4) as u32;
        let Some(len) = packet_len(header) else {
            self.done = true;
            return Some(Err(DecodeError::UnknownType { offset, header }));
        };

        if self.pos + len > self.words.len() {
            self.done = true;
            return Some(Err(DecodeError::Truncated {
                offset,
                declared: len,
            }));
        }

        let words = &self.words[self.pos..self.pos + len];
        self.pos += len;
        if header == MI_BATCH_BUFFER_END {
            self.done = true;
        }
        Some(Ok(Packet { offset, words }))
    }
}

/// Decode `words` packet by packet, stopping after MI_BATCH_BUFFER_END
pub fn packets(words: &[u32]) -> Packets<'_> {
    Packets {
        words,
        pos: 0,
        done: false,
    }
}
