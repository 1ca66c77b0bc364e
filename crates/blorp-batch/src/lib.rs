//! # BLORP Batch System
//!
//! Batch buffer construction for fixed-layout GPU command streams.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                         Batch Buffer Object                       │
//! │                                                                   │
//! │  0 ──▶ command packets ──▶ used     state_offset ◀── state ◀── end │
//! │        (begin / emit / end)          (aligned state blocks)       │
//! │                                                                   │
//! │  ┌──────────────────┐      every pointer word      ┌───────────┐  │
//! │  │ RelocationList   │ ◀──────────────────────────── │  emitters │  │
//! │  └──────────────────┘                               └───────────┘  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submission Flow
//!
//! 1. Emitters open packets with a declared length and fill them
//! 2. Indirect state is carved from the top of the same buffer
//! 3. Pointer words are written together with their relocation
//! 4. `finish` terminates the stream and hands out a [`CommittedBatch`]
//! 5. A [`BatchSubmitter`] passes it on to the kernel

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod buffer;
pub mod decode;
pub mod reloc;
pub mod state;
pub mod submit;

// Re-exports
pub use buffer::{BatchBuffer, BatchStats, SavedState, MI_BATCH_BUFFER_END, MI_NOOP};
pub use decode::{packets, DecodeError, Packet, Packets};
pub use reloc::{Relocation, RelocationList};
pub use state::{StateAnnotation, StateBlock, StateTag};
pub use submit::{BatchSubmitter, CommittedBatch};
