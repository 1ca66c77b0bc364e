//! # Color Calculator and Depth-Stencil State

use blorp_batch::{BatchBuffer, StateTag};
use blorp_core::Result;

use crate::cmd;
use crate::pack::pack;
use crate::params::HizOp;
use crate::regs::{blend1, ds2, pointers};

/// Words of one BLEND_STATE entry
pub const BLEND_STATE_WORDS: usize = 2;
/// Words of COLOR_CALC_STATE
pub const CC_STATE_WORDS: usize = 6;
/// Words of DEPTH_STENCIL_STATE
pub const DEPTH_STENCIL_STATE_WORDS: usize = 3;

/// BLEND_STATE, one entry per draw buffer, blending off but clamping to
/// the render target format.
pub fn emit_blend_state(batch: &mut BatchBuffer, num_draw_buffers: u32) -> Result<u32> {
    assert!(num_draw_buffers > 0, "blend state without draw buffers");

    let size = num_draw_buffers as usize * BLEND_STATE_WORDS * 4;
    let (block, words) = batch.state_batch(StateTag::BlendState, size, 64)?;
    let b1 = pack(&[
        (blend1::POST_BLEND_CLAMP, 1),
        (blend1::PRE_BLEND_CLAMP, 1),
        (blend1::CLAMP_RANGE, blend1::CLAMPRANGE_FORMAT),
    ]);
    for entry in words.chunks_exact_mut(BLEND_STATE_WORDS) {
        entry[1] = b1;
    }
    Ok(block.offset)
}

/// COLOR_CALC_STATE, all zero
pub fn emit_cc_state(batch: &mut BatchBuffer) -> Result<u32> {
    let (block, _) = batch.state_batch(StateTag::CcState, CC_STATE_WORDS * 4, 64)?;
    Ok(block.offset)
}

/// DEPTH_STENCIL_STATE
///
/// Depth writes are always on. A depth resolve also enables the depth test
/// with a NEVER comparison.
pub fn emit_depth_stencil_state(batch: &mut BatchBuffer, hiz_op: HizOp) -> Result<u32> {
    let (block, words) = batch.state_batch(
        StateTag::DepthStencilState,
        DEPTH_STENCIL_STATE_WORDS * 4,
        64,
    )?;
    words[2] = match hiz_op {
        HizOp::DepthResolve => pack(&[
            (ds2::DEPTH_WRITE_ENABLE, 1),
            (ds2::DEPTH_TEST_FUNC, ds2::COMPAREFUNCTION_NEVER),
            (ds2::DEPTH_TEST_ENABLE, 1),
        ]),
        _ => pack(&[(ds2::DEPTH_WRITE_ENABLE, 1)]),
    };
    Ok(block.offset)
}

/// 3DSTATE_CC_STATE_POINTERS, offsets relative to the dynamic state base
pub fn emit_cc_state_pointers(
    batch: &mut BatchBuffer,
    blend_offset: u32,
    depth_stencil_offset: u32,
    cc_offset: u32,
) -> Result<()> {
    packet!(
        batch,
        cmd::CC_STATE_POINTERS,
        0,
        [
            blend_offset | pointers::CC_POINTER_VALID,
            depth_stencil_offset | pointers::CC_POINTER_VALID,
            cc_offset | pointers::CC_POINTER_VALID,
        ],
    )
}
