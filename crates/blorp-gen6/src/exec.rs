//! # Operation Execution
//!
//! One BLORP operation is a fixed sequence of steps. Which steps run and
//! which variant of a step runs is decided up front from the parameters:
//!
//! ```text
//!   BlorpParams ──► ExecPlan { pixel, depth } ──► STEPS filtered by plan
//!                                                      │
//!                                  each step emits into the BatchBuffer
//! ```
//!
//! An operation is all-or-nothing: any error rolls the batch back to where
//! the operation started.

use blorp_batch::{BatchBuffer, BatchSubmitter};
use blorp_core::{BufferObject, GemDomain, Result};

use crate::device::DeviceInfo;
use crate::emit::{cc, depth, draw, flush, pipeline, stages, vertex, wm_state};
use crate::params::BlorpParams;
use crate::program::{WmProgram, WmProgramSource};
use crate::regs::sampler0;

// =============================================================================
// PLAN
// =============================================================================

/// Pixel pipeline variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelPath {
    /// A program runs; blend, surface and sampler state are needed
    Program,
    /// Depth-only operation, no pixel dispatch
    NoProgram,
}

/// Depth buffer variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthPath {
    /// Program the depth miptree with HiZ
    Config,
    /// Null depth buffer
    Disable,
}

/// Variants chosen for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecPlan {
    /// Pixel pipeline variant
    pub pixel: PixelPath,
    /// Depth buffer variant
    pub depth: DepthPath,
}

impl ExecPlan {
    /// Plan for `params`
    pub fn for_params(params: &BlorpParams) -> Self {
        Self {
            pixel: if params.use_wm_prog() {
                PixelPath::Program
            } else {
                PixelPath::NoProgram
            },
            depth: if params.depth.is_some() {
                DepthPath::Config
            } else {
                DepthPath::Disable
            },
        }
    }
}

// =============================================================================
// STEPS
// =============================================================================

/// One stage of the emission sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Post-sync non-zero workaround flush
    Flush,
    /// Multisample state and sample mask
    Multisample,
    /// STATE_BASE_ADDRESS
    StateBaseAddress,
    /// Vertex data, buffers and elements
    Vertices,
    /// URB split
    Urb,
    /// BLEND_STATE and COLOR_CALC_STATE
    BlendState,
    /// DEPTH_STENCIL_STATE
    DepthStencilState,
    /// CC state pointers
    CcStatePointers,
    /// Push constants
    WmConstants,
    /// Surface states and binding table
    Surfaces,
    /// Sampler state and its pointers
    Sampler,
    /// VS off
    VsDisable,
    /// GS off
    GsDisable,
    /// Clipper pass-through
    Clip,
    /// Strips and fans
    Sf,
    /// PS push constant buffer, enabled or disabled
    ConstantPs,
    /// Windower
    Wm,
    /// PS binding table pointer
    BindingTablePointers,
    /// CC viewport
    Viewport,
    /// Depth, HiZ and stencil buffers, configured or null
    Depth,
    /// Depth clear value
    ClearParams,
    /// Drawing rectangle
    DrawingRectangle,
    /// 3DPRIMITIVE
    Primitive,
}

/// Emission order of every step
pub const STEPS: &[Step] = &[
    Step::Flush,
    Step::Multisample,
    Step::StateBaseAddress,
    Step::Vertices,
    Step::Urb,
    Step::BlendState,
    Step::DepthStencilState,
    Step::CcStatePointers,
    Step::WmConstants,
    Step::Surfaces,
    Step::Sampler,
    Step::VsDisable,
    Step::GsDisable,
    Step::Clip,
    Step::Sf,
    Step::ConstantPs,
    Step::Wm,
    Step::BindingTablePointers,
    Step::Viewport,
    Step::Depth,
    Step::ClearParams,
    Step::DrawingRectangle,
    Step::Primitive,
];

impl Step {
    /// Whether the step runs under `plan`
    pub fn enabled(self, plan: &ExecPlan) -> bool {
        match self {
            Self::BlendState
            | Self::WmConstants
            | Self::Surfaces
            | Self::Sampler
            | Self::BindingTablePointers => plan.pixel == PixelPath::Program,
            _ => true,
        }
    }
}

/// Steps that run under `plan`, in order
pub fn steps_for(plan: ExecPlan) -> impl Iterator<Item = Step> {
    STEPS.iter().copied().filter(move |step| step.enabled(&plan))
}

/// State offsets produced by earlier steps and read by later ones
#[derive(Debug, Default)]
struct Pass {
    program: Option<WmProgram>,
    blend: u32,
    cc: u32,
    depth_stencil: u32,
    push_consts: u32,
    binding_table: u32,
}

// =============================================================================
// EXECUTOR
// =============================================================================

/// BLORP on Sandy Bridge
///
/// Owns the batch being built. Operations are appended with [`exec`] and
/// the batch is handed to a submitter with [`flush`].
///
/// [`exec`]: Gen6Blorp::exec
/// [`flush`]: Gen6Blorp::flush
#[derive(Debug)]
pub struct Gen6Blorp {
    device: DeviceInfo,
    batch: BatchBuffer,
    workaround_bo: BufferObject,
}

impl Gen6Blorp {
    /// Executor for `device` emitting into `batch`. `workaround_bo` is the
    /// scratch target of post-sync writes.
    pub fn new(device: DeviceInfo, batch: BatchBuffer, workaround_bo: BufferObject) -> Self {
        Self {
            device,
            batch,
            workaround_bo,
        }
    }

    /// Device limits
    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// Batch being built
    pub fn batch(&self) -> &BatchBuffer {
        &self.batch
    }

    /// Append one operation to the batch.
    ///
    /// Parameters are validated and the program fetched before anything is
    /// emitted. If the batch runs out of room midway, everything this call
    /// emitted is discarded.
    pub fn exec(&mut self, params: &BlorpParams, programs: &mut dyn WmProgramSource) -> Result<()> {
        params.validate()?;

        let plan = ExecPlan::for_params(params);
        let program = match plan.pixel {
            PixelPath::Program => Some(programs.wm_program(params)?),
            PixelPath::NoProgram => None,
        };

        log::debug!(
            "blorp: ({}, {})..({}, {}) x{} {:?} hiz {:?}",
            params.x0,
            params.y0,
            params.x1,
            params.y1,
            params.num_layers,
            plan,
            params.hiz_op
        );

        let saved = self.batch.save();
        let mut pass = Pass {
            program,
            ..Pass::default()
        };

        for step in steps_for(plan) {
            if let Err(err) = self.run_step(step, params, &mut pass) {
                log::debug!("blorp: {:?} failed: {}", step, err);
                self.batch.reset_to(&saved);
                return Err(err);
            }
        }
        Ok(())
    }

    /// [`exec`](Self::exec), retrying once on an empty batch when a
    /// partly filled one runs out of room.
    pub fn run(
        &mut self,
        params: &BlorpParams,
        programs: &mut dyn WmProgramSource,
        submitter: &mut dyn BatchSubmitter,
    ) -> Result<()> {
        let had_work = !self.batch.is_empty();
        match self.exec(params, programs) {
            Err(err) if err.is_retryable() && had_work => {
                log::warn!("blorp: {}, flushing batch and retrying", err);
                self.flush(submitter)?;
                self.exec(params, programs)
            }
            result => result,
        }
    }

    /// Terminate the batch and submit it. Does nothing if the batch is
    /// empty.
    pub fn flush(&mut self, submitter: &mut dyn BatchSubmitter) -> Result<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        let committed = self.batch.finish();
        log::trace!(
            "blorp: submitting {} bytes from {}",
            committed.used_bytes,
            committed.bo.name()
        );
        submitter.submit(committed)
    }

    fn run_step(&mut self, step: Step, params: &BlorpParams, pass: &mut Pass) -> Result<()> {
        let batch = &mut self.batch;
        log::trace!("blorp: {:?} @{:#x}", step, batch.cursor_offset());

        match step {
            Step::Flush => flush::emit_post_sync_nonzero_flush(batch, &self.workaround_bo),
            Step::Multisample => {
                pipeline::emit_multisample(batch, params.dst.num_samples)?;
                pipeline::emit_sample_mask(batch, params.dst.num_samples)
            }
            Step::StateBaseAddress => {
                let cache = params.wm.as_ref().map(|wm| &wm.program_cache);
                pipeline::emit_state_base_address(batch, cache)
            }
            Step::Vertices => vertex::emit_vertices(batch, params).map(drop),
            Step::Urb => pipeline::emit_urb_config(batch, &self.device),
            Step::BlendState => {
                pass.blend = cc::emit_blend_state(batch, params.num_draw_buffers)?;
                pass.cc = cc::emit_cc_state(batch)?;
                Ok(())
            }
            Step::DepthStencilState => {
                pass.depth_stencil = cc::emit_depth_stencil_state(batch, params.hiz_op)?;
                Ok(())
            }
            Step::CcStatePointers => {
                cc::emit_cc_state_pointers(batch, pass.blend, pass.depth_stencil, pass.cc)
            }
            Step::WmConstants => {
                if let Some(wm) = &params.wm {
                    pass.push_consts = wm_state::emit_wm_constants(batch, &wm.push_consts)?;
                }
                Ok(())
            }
            Step::Surfaces => {
                let renderbuffer = wm_state::emit_surface_state(
                    batch,
                    &params.dst,
                    GemDomain::RENDER,
                    GemDomain::RENDER,
                )?;
                let texture = match &params.src {
                    Some(src) => wm_state::emit_surface_state(
                        batch,
                        src,
                        GemDomain::SAMPLER,
                        GemDomain::empty(),
                    )?,
                    None => 0,
                };
                pass.binding_table = wm_state::emit_binding_table(batch, renderbuffer, texture)?;
                Ok(())
            }
            Step::Sampler => {
                let sampler =
                    wm_state::emit_sampler_state(batch, sampler0::MAPFILTER_LINEAR, 0, true)?;
                wm_state::emit_sampler_state_pointers(batch, sampler)
            }
            Step::VsDisable => stages::emit_vs_disable(batch),
            Step::GsDisable => stages::emit_gs_disable(batch),
            Step::Clip => stages::emit_clip_disable(batch),
            Step::Sf => stages::emit_sf_config(batch, params),
            Step::ConstantPs => match pass.program {
                Some(_) => stages::emit_constant_ps(batch, pass.push_consts),
                None => stages::emit_constant_ps_disable(batch),
            },
            Step::Wm => stages::emit_wm_config(batch, &self.device, params, pass.program.as_ref()),
            Step::BindingTablePointers => {
                stages::emit_binding_table_pointers(batch, pass.binding_table)
            }
            Step::Viewport => draw::emit_viewport_state(batch).map(drop),
            Step::Depth => match &params.depth {
                Some(info) => depth::emit_depth_stencil_config(batch, params.hiz_op, info),
                None => depth::emit_depth_disable(batch),
            },
            Step::ClearParams => draw::emit_clear_params(batch, params.depth.as_ref()),
            Step::DrawingRectangle => draw::emit_drawing_rectangle(batch, params),
            Step::Primitive => draw::emit_primitive(batch, params),
        }
    }
}
