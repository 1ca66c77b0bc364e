//! # Depth Buffer
//!
//! 3DSTATE_DEPTH_BUFFER, 3DSTATE_HIER_DEPTH_BUFFER and
//! 3DSTATE_STENCIL_BUFFER, always emitted as a triple after the depth
//! stall flushes.

use blorp_batch::BatchBuffer;
use blorp_core::{GemDomain, Result};

use super::flush::emit_depth_stall_flushes;
use crate::cmd;
use crate::pack::pack;
use crate::params::{DepthInfo, HizOp};
use crate::regs::{depth1, depth3, depth4, depthformat, hiz1, surf0, surftype};

/// Program the depth miptree with HiZ and separate stencil enabled.
///
/// HiZ operations on LOD 0 may use a width and height padded past the
/// logical size to meet the 8x4 alignment of fast depth clears.
pub fn emit_depth_stencil_config(
    batch: &mut BatchBuffer,
    hiz_op: HizOp,
    depth: &DepthInfo,
) -> Result<()> {
    let (surftype, slices) = depth.surface_type_and_depth();
    let lod = depth.lod();
    let (width, height) = if hiz_op != HizOp::None && lod == 0 {
        (depth.width, depth.height)
    } else {
        (depth.logical_width0, depth.logical_height0)
    };

    log::trace!(
        "depth buffer {}x{} lod {} slices {} type {}",
        width,
        height,
        lod,
        slices,
        surftype
    );

    emit_depth_stall_flushes(batch)?;

    batch.begin(cmd::DEPTH_BUFFER.len)?;
    batch.emit(cmd::DEPTH_BUFFER.header(0));
    batch.emit(pack(&[
        (depth1::PITCH, depth.pitch - 1),
        (depth1::FORMAT, depth.format.hw()),
        (depth1::SEPARATE_STENCIL, 1),
        (depth1::HIZ_ENABLE, 1),
        (depth1::TILE_WALK, depth1::TILEWALK_YMAJOR),
        (depth1::TILED, 1),
        (depth1::TYPE, surftype),
    ]));
    batch.emit_reloc(&depth.bo, GemDomain::RENDER, GemDomain::RENDER, 0);
    batch.emit(pack(&[
        (depth3::MIPLAYOUT, surf0::MIPLAYOUT_BELOW),
        (depth3::LOD, lod),
        (depth3::WIDTH, width - 1),
        (depth3::HEIGHT, height - 1),
    ]));
    batch.emit(pack(&[
        (depth4::DEPTH, slices - 1),
        (depth4::MIN_ARRAY_ELEMENT, depth.layer),
        (depth4::RT_VIEW_EXTENT, slices - 1),
    ]));
    batch.emit(0);
    batch.emit(0);
    batch.end();

    let hiz = &depth.hiz;
    batch.begin(cmd::HIER_DEPTH_BUFFER.len)?;
    batch.emit(cmd::HIER_DEPTH_BUFFER.header(0));
    batch.emit(pack(&[(hiz1::PITCH, hiz.pitch - 1)]));
    batch.emit_reloc(
        &hiz.bo,
        GemDomain::RENDER,
        GemDomain::RENDER,
        hiz.level_offset(lod),
    );
    batch.end();

    packet!(batch, cmd::STENCIL_BUFFER, 0, [0, 0])
}

/// Null depth buffer, no HiZ, no stencil
pub fn emit_depth_disable(batch: &mut BatchBuffer) -> Result<()> {
    emit_depth_stall_flushes(batch)?;

    let dw1 = pack(&[
        (depth1::FORMAT, depthformat::D32_FLOAT),
        (depth1::TYPE, surftype::SURFACE_NULL),
    ]);
    packet!(batch, cmd::DEPTH_BUFFER, 0, [dw1, 0, 0, 0, 0, 0])?;
    packet!(batch, cmd::HIER_DEPTH_BUFFER, 0, [0, 0])?;
    packet!(batch, cmd::STENCIL_BUFFER, 0, [0, 0])
}
