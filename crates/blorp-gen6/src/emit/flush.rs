//! # Workaround Flushes
//!
//! PIPE_CONTROL sequences Gen6 needs around a BLORP operation.

use blorp_batch::BatchBuffer;
use blorp_core::{BufferObject, GemDomain, Result};

use crate::cmd;
use crate::pack::pack;
use crate::regs::pipe_control::*;

/// PIPE_CONTROL with `flags` and no post-sync operation
pub fn emit_pipe_control_flush(batch: &mut BatchBuffer, flags: u32) -> Result<()> {
    packet!(batch, cmd::PIPE_CONTROL, 0, [flags, 0, 0, 0])
}

/// PIPE_CONTROL with a post-sync write of `imm` into `bo` at `offset`
pub fn emit_pipe_control_write(
    batch: &mut BatchBuffer,
    flags: u32,
    bo: &BufferObject,
    offset: u32,
    imm: u64,
) -> Result<()> {
    batch.begin(cmd::PIPE_CONTROL.len)?;
    batch.emit(cmd::PIPE_CONTROL.header(0));
    batch.emit(flags);
    batch.emit_reloc(
        bo,
        GemDomain::INSTRUCTION,
        GemDomain::INSTRUCTION,
        offset | GLOBAL_GTT_WRITE,
    );
    batch.emit(imm as u32);
    batch.emit((imm >> 32) as u32);
    batch.end();
    Ok(())
}

/// Gen6 requires a CS stall with a non-zero post-sync operation before
/// certain state changes; a scoreboard stall must precede it.
pub fn emit_post_sync_nonzero_flush(batch: &mut BatchBuffer, workaround_bo: &BufferObject) -> Result<()> {
    emit_pipe_control_flush(batch, pack(&[(CS_STALL, 1), (STALL_AT_SCOREBOARD, 1)]))?;
    emit_pipe_control_write(batch, pack(&[(WRITE_IMMEDIATE, 1)]), workaround_bo, 0, 0)
}

/// Stall on depth, flush the depth cache and stall again before the depth
/// buffer is reprogrammed.
pub fn emit_depth_stall_flushes(batch: &mut BatchBuffer) -> Result<()> {
    emit_pipe_control_flush(batch, pack(&[(DEPTH_STALL, 1)]))?;
    emit_pipe_control_flush(batch, pack(&[(DEPTH_CACHE_FLUSH, 1)]))?;
    emit_pipe_control_flush(batch, pack(&[(DEPTH_STALL, 1)]))
}
