//! # Vertex Input
//!
//! The rectangle is drawn as a RECTLIST of three vertices in screen space:
//!
//! ```text
//!   v2 ------ implied
//!    |        |
//!    |        |
//!   v0 ----- v1
//! ```
//!
//! With the VS disabled the clipper loads each VUE straight from the URB, so
//! the vertex data is laid out as a complete VUE: reserved, render target
//! array index, viewport index and point width (all zero) followed by the
//! position.

use blorp_batch::{BatchBuffer, StateTag};
use blorp_core::{GemDomain, Result};
use static_assertions::const_assert_eq;

use crate::cmd;
use crate::pack::pack;
use crate::params::BlorpParams;
use crate::regs::{vb0, ve0, ve1};
use crate::surface::SurfaceFormat;

/// Floats per VUE
pub const NUM_VUE_ELEMS: usize = 8;
/// Vertices in the rectangle
pub const NUM_VERTICES: usize = 3;
/// Bytes of vertex data
pub const VBO_SIZE: usize = NUM_VERTICES * NUM_VUE_ELEMS * 4;

const_assert_eq!(VBO_SIZE, 96);

/// VUE contents for the rectangle, in draw order
pub fn rect_vertices(params: &BlorpParams) -> [f32; NUM_VERTICES * NUM_VUE_ELEMS] {
    let (x0, y0) = (params.x0 as f32, params.y0 as f32);
    let (x1, y1) = (params.x1 as f32, params.y1 as f32);
    [
        0.0, 0.0, 0.0, 0.0, x0, y1, 0.0, 1.0, // v0
        0.0, 0.0, 0.0, 0.0, x1, y1, 0.0, 1.0, // v1
        0.0, 0.0, 0.0, 0.0, x0, y0, 0.0, 1.0, // v2
    ]
}

/// Vertex data, 3DSTATE_VERTEX_BUFFERS and 3DSTATE_VERTEX_ELEMENTS
pub fn emit_vertices(batch: &mut BatchBuffer, params: &BlorpParams) -> Result<u32> {
    let vertices = rect_vertices(params);
    let (block, words) = batch.state_batch(StateTag::VertexBuffer, VBO_SIZE, 32)?;
    words.copy_from_slice(bytemuck::cast_slice(&vertices));
    let vertex_offset = block.offset;

    let batch_bo = batch.bo();
    batch.begin(cmd::VERTEX_BUFFERS.len)?;
    batch.emit(cmd::VERTEX_BUFFERS.header(0));
    batch.emit(pack(&[
        (vb0::INDEX, 0),
        (vb0::ACCESS_INSTANCEDATA, 0),
        (vb0::PITCH, (NUM_VUE_ELEMS * 4) as u32),
    ]));
    // Start and inclusive end address
    batch.emit_reloc(&batch_bo, GemDomain::VERTEX, GemDomain::empty(), vertex_offset);
    batch.emit_reloc(
        &batch_bo,
        GemDomain::VERTEX,
        GemDomain::empty(),
        vertex_offset + VBO_SIZE as u32 - 1,
    );
    batch.emit(0);
    batch.end();

    // Two elements fetch dwords 0-3 and 4-7 of each VUE.
    let components = pack(&[
        (ve1::COMPONENT_0, ve1::STORE_SRC),
        (ve1::COMPONENT_1, ve1::STORE_SRC),
        (ve1::COMPONENT_2, ve1::STORE_SRC),
        (ve1::COMPONENT_3, ve1::STORE_SRC),
    ]);
    let element = |src_offset: u32| {
        pack(&[
            (ve0::VALID, 1),
            (ve0::FORMAT, SurfaceFormat::R32G32B32A32Float.hw()),
            (ve0::SRC_OFFSET, src_offset),
        ])
    };
    packet!(
        batch,
        cmd::VERTEX_ELEMENTS,
        0,
        [element(0), components, element(16), components],
    )?;

    Ok(vertex_offset)
}
