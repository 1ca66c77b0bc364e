//! # Rasterization and Draw
//!
//! Viewport, depth clear value, drawing rectangle and the final
//! 3DPRIMITIVE.

use blorp_batch::{BatchBuffer, StateTag};
use blorp_core::Result;

use crate::cmd;
use crate::pack::pack;
use crate::params::{BlorpParams, DepthInfo};
use crate::regs::{drawrect2, pointers, prim0};

/// Bytes of CC_VIEWPORT
pub const CC_VIEWPORT_SIZE: usize = 8;

/// CC_VIEWPORT with the full [0, 1] depth range, then
/// 3DSTATE_VIEWPORT_STATE_POINTERS updating only the CC viewport.
pub fn emit_viewport_state(batch: &mut BatchBuffer) -> Result<u32> {
    let (block, words) = batch.state_batch(StateTag::CcViewport, CC_VIEWPORT_SIZE, 32)?;
    words[0] = 0.0f32.to_bits();
    words[1] = 1.0f32.to_bits();

    packet!(
        batch,
        cmd::VIEWPORT_STATE_POINTERS,
        pointers::CC_VIEWPORT_MODIFY,
        [0, 0, block.offset],
    )?;
    Ok(block.offset)
}

/// 3DSTATE_CLEAR_PARAMS
///
/// The clear value is always marked valid, zero when there is no depth
/// target.
pub fn emit_clear_params(batch: &mut BatchBuffer, depth: Option<&DepthInfo>) -> Result<()> {
    let value = depth.map_or(0, |d| d.clear_value);
    packet!(batch, cmd::CLEAR_PARAMS, pointers::DEPTH_CLEAR_VALID, [value])
}

/// 3DSTATE_DRAWING_RECTANGLE clipped to the rectangle's far corner
pub fn emit_drawing_rectangle(batch: &mut BatchBuffer, params: &BlorpParams) -> Result<()> {
    let x_max = params.x0.max(params.x1) - 1;
    let y_max = params.y0.max(params.y1) - 1;
    let dw2 = pack(&[
        (drawrect2::X_MAX, x_max & 0xffff),
        (drawrect2::Y_MAX, y_max),
    ]);
    packet!(batch, cmd::DRAWING_RECTANGLE, 0, [0, dw2, 0])
}

/// 3DPRIMITIVE: three RECTLIST vertices, one instance per layer
pub fn emit_primitive(batch: &mut BatchBuffer, params: &BlorpParams) -> Result<()> {
    let flags = pack(&[
        (prim0::TOPOLOGY, prim0::RECTLIST),
        (prim0::ACCESS_RANDOM, prim0::ACCESS_SEQUENTIAL),
    ]);
    packet!(
        batch,
        cmd::PRIMITIVE,
        flags,
        [
            super::vertex::NUM_VERTICES as u32,
            0,
            params.num_layers,
            0,
            0,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::testing;

    #[test]
    fn test_viewport_depth_range() {
        let mut batch = testing::batch();
        let offset = emit_viewport_state(&mut batch).expect("space");
        assert_eq!(offset % 32, 0);
        assert_eq!(f32::from_bits(batch.word_at(offset)), 0.0);
        assert_eq!(f32::from_bits(batch.word_at(offset + 4)), 1.0);
        assert_eq!(testing::emitted(&batch)[0], [0x780d_1002, 0, 0, offset]);
    }

    #[test]
    fn test_clear_params_without_depth() {
        let mut batch = testing::batch();
        emit_clear_params(&mut batch, None).expect("space");
        assert_eq!(testing::emitted(&batch)[0], [0x7910_8000, 0]);
    }

    #[test]
    fn test_drawing_rectangle_uses_far_corner() {
        let mut batch = testing::batch();
        let params = BlorpParams::new(testing::surface(2, 0x20_0000, 64, 64), 40, 30, 8, 4);
        emit_drawing_rectangle(&mut batch, &params).expect("space");
        assert_eq!(testing::emitted(&batch)[0], [0x7900_0002, 0, 39 | 29 << 16, 0]);
    }

    #[test]
    fn test_primitive_rectlist_per_layer() {
        let mut batch = testing::batch();
        let mut params = BlorpParams::new(testing::surface(2, 0x20_0000, 64, 64), 0, 0, 64, 64);
        params.num_layers = 6;
        emit_primitive(&mut batch, &params).expect("space");
        assert_eq!(
            testing::emitted(&batch)[0],
            [0x7b00_3c04, 3, 0, 6, 0, 0]
        );
    }
}
