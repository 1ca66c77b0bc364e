//! # BLORP for Sandy Bridge
//!
//! Blits, color clears and HiZ operations expressed as a single RECTLIST
//! draw through the Gen6 3D pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            Gen6Blorp                             │
//! │   BlorpParams ──► validate ──► ExecPlan ──► step table           │
//! │                                                 │                │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────▼──┐ ┌────────┐  │
//! │  │ pipeline │ │  vertex  │ │ cc / wm  │ │  stages  │ │ depth  │  │
//! │  │  flush   │ │          │ │  state   │ │          │ │  draw  │  │
//! │  └────┬─────┘ └────┬─────┘ └────┬─────┘ └────┬─────┘ └───┬────┘  │
//! │       └────────────┴───── pack / cmd ────────┴───────────┘       │
//! └──────────────────────────────┬───────────────────────────────────┘
//!                                ▼
//!                    blorp-batch BatchBuffer
//! ```
//!
//! ## Usage
//!
//! 1. Describe the operation with [`BlorpParams`]
//! 2. Call [`Gen6Blorp::run`] with a [`WmProgramSource`] and a submitter
//! 3. Call [`Gen6Blorp::flush`] once no more operations follow
//!
//! Every packet word is assembled from named bit fields ([`pack::Field`]);
//! a value that does not fit its field panics rather than corrupting the
//! neighbouring bits.

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

pub mod cmd;
pub mod device;
pub mod emit;
pub mod exec;
pub mod pack;
pub mod params;
pub mod program;
pub mod regs;
pub mod surface;

// Re-exports
pub use device::DeviceInfo;
pub use exec::{steps_for, DepthPath, ExecPlan, Gen6Blorp, PixelPath, Step, STEPS};
pub use params::{
    BlorpParams, CoordTransform, DepthFormat, DepthInfo, HizBuffer, HizLayout, HizOp, WmParams,
    WmPushConstants,
};
pub use program::{WmProgData, WmProgram, WmProgramSource};
pub use surface::{PixelFormat, SurfaceFormat, SurfaceInfo, TextureTarget, Tiling};
