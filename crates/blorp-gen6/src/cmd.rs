//! # Gen6 Command Table
//!
//! Opcode and fixed length of every packet the BLORP path emits.

use static_assertions::const_assert_eq;

// =============================================================================
// COMMAND DESCRIPTOR
// =============================================================================

/// A fixed-length command packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    /// Packet name
    pub name: &'static str,
    /// Command type, opcode and sub-opcode (upper 16 header bits)
    pub opcode: u16,
    /// Total length in words, header included
    pub len: usize,
}

impl Command {
    const fn new(name: &'static str, opcode: u16, len: usize) -> Self {
        Self { name, opcode, len }
    }

    /// Header word with packet-specific `flags` in the low 16 bits
    #[inline]
    pub const fn header(self, flags: u32) -> u32 {
        (self.opcode as u32) << 16 | flags | (self.len as u32 - 2)
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// STATE_BASE_ADDRESS
pub const STATE_BASE_ADDRESS: Command = Command::new("STATE_BASE_ADDRESS", 0x6101, 10);
/// PIPE_CONTROL
pub const PIPE_CONTROL: Command = Command::new("PIPE_CONTROL", 0x7a00, 5);
/// 3DSTATE_BINDING_TABLE_POINTERS
pub const BINDING_TABLE_POINTERS: Command =
    Command::new("3DSTATE_BINDING_TABLE_POINTERS", 0x7801, 4);
/// 3DSTATE_SAMPLER_STATE_POINTERS
pub const SAMPLER_STATE_POINTERS: Command =
    Command::new("3DSTATE_SAMPLER_STATE_POINTERS", 0x7802, 4);
/// 3DSTATE_URB
pub const URB: Command = Command::new("3DSTATE_URB", 0x7805, 3);
/// 3DSTATE_VERTEX_BUFFERS, one buffer
pub const VERTEX_BUFFERS: Command = Command::new("3DSTATE_VERTEX_BUFFERS", 0x7808, 5);
/// 3DSTATE_VERTEX_ELEMENTS, two elements
pub const VERTEX_ELEMENTS: Command = Command::new("3DSTATE_VERTEX_ELEMENTS", 0x7809, 5);
/// 3DSTATE_VIEWPORT_STATE_POINTERS
pub const VIEWPORT_STATE_POINTERS: Command =
    Command::new("3DSTATE_VIEWPORT_STATE_POINTERS", 0x780d, 4);
/// 3DSTATE_CC_STATE_POINTERS
pub const CC_STATE_POINTERS: Command = Command::new("3DSTATE_CC_STATE_POINTERS", 0x780e, 4);
/// 3DSTATE_VS
pub const VS: Command = Command::new("3DSTATE_VS", 0x7810, 6);
/// 3DSTATE_GS
pub const GS: Command = Command::new("3DSTATE_GS", 0x7811, 7);
/// 3DSTATE_CLIP
pub const CLIP: Command = Command::new("3DSTATE_CLIP", 0x7812, 4);
/// 3DSTATE_SF
pub const SF: Command = Command::new("3DSTATE_SF", 0x7813, 20);
/// 3DSTATE_WM
pub const WM: Command = Command::new("3DSTATE_WM", 0x7814, 9);
/// 3DSTATE_CONSTANT_VS
pub const CONSTANT_VS: Command = Command::new("3DSTATE_CONSTANT_VS", 0x7815, 5);
/// 3DSTATE_CONSTANT_GS
pub const CONSTANT_GS: Command = Command::new("3DSTATE_CONSTANT_GS", 0x7816, 5);
/// 3DSTATE_CONSTANT_PS
pub const CONSTANT_PS: Command = Command::new("3DSTATE_CONSTANT_PS", 0x7817, 5);
/// 3DSTATE_SAMPLE_MASK
pub const SAMPLE_MASK: Command = Command::new("3DSTATE_SAMPLE_MASK", 0x7818, 2);
/// 3DSTATE_DRAWING_RECTANGLE
pub const DRAWING_RECTANGLE: Command = Command::new("3DSTATE_DRAWING_RECTANGLE", 0x7900, 4);
/// 3DSTATE_DEPTH_BUFFER
pub const DEPTH_BUFFER: Command = Command::new("3DSTATE_DEPTH_BUFFER", 0x7905, 7);
/// 3DSTATE_MULTISAMPLE
pub const MULTISAMPLE: Command = Command::new("3DSTATE_MULTISAMPLE", 0x790d, 3);
/// 3DSTATE_STENCIL_BUFFER
pub const STENCIL_BUFFER: Command = Command::new("3DSTATE_STENCIL_BUFFER", 0x790e, 3);
/// 3DSTATE_HIER_DEPTH_BUFFER
pub const HIER_DEPTH_BUFFER: Command = Command::new("3DSTATE_HIER_DEPTH_BUFFER", 0x790f, 3);
/// 3DSTATE_CLEAR_PARAMS
pub const CLEAR_PARAMS: Command = Command::new("3DSTATE_CLEAR_PARAMS", 0x7910, 2);
/// 3DPRIMITIVE
pub const PRIMITIVE: Command = Command::new("3DPRIMITIVE", 0x7b00, 6);

// Lengths fixed by the hardware
const_assert_eq!(STATE_BASE_ADDRESS.len, 10);
const_assert_eq!(VERTEX_BUFFERS.len, 1 + 4);
const_assert_eq!(VERTEX_ELEMENTS.len, 1 + 2 * 2);
const_assert_eq!(SF.len, 20);
const_assert_eq!(WM.len, 9);
const_assert_eq!(DEPTH_BUFFER.len, 7);

/// Every command above, for decoding
pub const ALL: &[Command] = &[
    STATE_BASE_ADDRESS,
    PIPE_CONTROL,
    BINDING_TABLE_POINTERS,
    SAMPLER_STATE_POINTERS,
    URB,
    VERTEX_BUFFERS,
    VERTEX_ELEMENTS,
    VIEWPORT_STATE_POINTERS,
    CC_STATE_POINTERS,
    VS,
    GS,
    CLIP,
    SF,
    WM,
    CONSTANT_VS,
    CONSTANT_GS,
    CONSTANT_PS,
    SAMPLE_MASK,
    DRAWING_RECTANGLE,
    DEPTH_BUFFER,
    MULTISAMPLE,
    STENCIL_BUFFER,
    HIER_DEPTH_BUFFER,
    CLEAR_PARAMS,
    PRIMITIVE,
];

/// Look a command up by the upper 16 bits of its header
pub fn lookup(opcode: u16) -> Option<&'static Command> {
    ALL.iter().find(|c| c.opcode == opcode)
}

/// Packet name for an opcode, for batch dumps
pub fn name_of(opcode: u16) -> &'static str {
    lookup(opcode).map_or("UNKNOWN", |c| c.name)
}
