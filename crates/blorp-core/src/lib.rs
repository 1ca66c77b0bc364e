//! # BLORP Core
//!
//! Foundational types shared by the batch layer and the generation-specific
//! emitters.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      blorp-core                             │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Types     │  │   Domains   │  │     Error           │  │
//! │  │ (GpuAddr,   │  │ (read/write │  │   Handling          │  │
//! │  │  BufferObj) │  │  flags)     │  │                     │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two failure classes exist across the stack. Logic defects that would
//! corrupt hardware state (length mismatches, duplicate relocations, bit
//! fields overflowing) panic. Running out of batch or state space is an
//! [`Error`] the caller recovers from by flushing and retrying.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use config::BatchConfig;
pub use domain::GemDomain;
pub use error::{Error, Result};
pub use types::*;
