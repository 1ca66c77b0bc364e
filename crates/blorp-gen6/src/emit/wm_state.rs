//! # Pixel Shader State
//!
//! Push constants, surface states, binding table and sampler used when a
//! pixel program runs.

use core::mem::size_of;

use blorp_batch::{BatchBuffer, StateTag};
use blorp_core::{GemDomain, Result};

use crate::cmd;
use crate::pack::{pack, Field};
use crate::params::WmPushConstants;
use crate::regs::{
    pointers, sampler0, sampler1, sampler2, sampler3, surf0, surf2, surf3, surf4, surf5, surftype,
};
use crate::surface::{SurfaceInfo, Tiling};

/// Words of SURFACE_STATE
pub const SURFACE_STATE_WORDS: usize = 6;
/// Binding table slot of the render target
pub const RENDERBUFFER_BINDING_TABLE_INDEX: usize = 0;
/// Binding table slot of the source texture
pub const TEXTURE_BINDING_TABLE_INDEX: usize = 1;
/// Binding table entries
pub const NUM_BINDING_TABLE_ENTRIES: usize = 2;
/// Words of SAMPLER_STATE
pub const SAMPLER_STATE_WORDS: usize = 4;

const PUSH_CONST_WORDS: usize = size_of::<WmPushConstants>() / 4;

// =============================================================================
// PUSH CONSTANTS
// =============================================================================

/// Copy the push constants into state
pub fn emit_wm_constants(batch: &mut BatchBuffer, consts: &WmPushConstants) -> Result<u32> {
    let (block, words) = batch.state_batch(
        StateTag::WmConstants,
        size_of::<WmPushConstants>(),
        32,
    )?;
    words.copy_from_slice(bytemuck::cast_ref::<_, [u32; PUSH_CONST_WORDS]>(consts));
    Ok(block.offset)
}

// =============================================================================
// SURFACE STATE
// =============================================================================

fn tiling_bits(tiling: Tiling) -> [(Field, u32); 2] {
    let (tiled, tiled_y) = match tiling {
        Tiling::None => (0, 0),
        Tiling::X => (1, 0),
        Tiling::Y => (1, 1),
    };
    [(surf3::TILED, tiled), (surf3::TILED_Y, tiled_y)]
}

fn multisample_count(num_samples: u32) -> u32 {
    if num_samples > 1 {
        surf4::MULTISAMPLECOUNT_4
    } else {
        surf4::MULTISAMPLECOUNT_1
    }
}

/// SURFACE_STATE for a render target or texture.
///
/// The base address relocation points at the tile holding the slice; the
/// remainder goes into the x/y offset fields.
///
/// # Panics
///
/// If the intra-tile offset cannot be expressed, since the hardware drops
/// the low bits of x and y.
pub fn emit_surface_state(
    batch: &mut BatchBuffer,
    surface: &SurfaceInfo,
    read_domains: GemDomain,
    write_domain: GemDomain,
) -> Result<u32> {
    let (width, height) = surface.hw_size();
    let (tile_offset, tile_x, tile_y) = surface.compute_tile_offsets();
    assert!(tile_x % 4 == 0, "surface x offset {} not a multiple of 4", tile_x);
    assert!(tile_y % 2 == 0, "surface y offset {} not a multiple of 2", tile_y);

    let [tiled, tiled_y] = tiling_bits(surface.hw_tiling());
    let dw = [
        pack(&[
            (surf0::TYPE, surftype::SURFACE_2D),
            (surf0::MIPLAYOUT, surf0::MIPLAYOUT_BELOW),
            (surf0::CUBEFACE_ENABLES, surf0::ALL_CUBE_FACES),
            (surf0::FORMAT, surface.format.surface_format().hw()),
        ]),
        0,
        pack(&[
            (surf2::LOD, 0),
            (surf2::WIDTH, width - 1),
            (surf2::HEIGHT, height - 1),
        ]),
        pack(&[
            tiled,
            tiled_y,
            (surf3::DEPTH, 0),
            (surf3::PITCH, surface.hw_pitch() - 1),
        ]),
        pack(&[(surf4::MULTISAMPLECOUNT, multisample_count(surface.num_samples))]),
        pack(&[
            (surf5::X_OFFSET, tile_x / 4),
            (surf5::Y_OFFSET, tile_y / 2),
            (surf5::VERTICAL_ALIGN, (surface.align_h == 4) as u32),
        ]),
    ];

    let (block, words) = batch.state_batch(
        StateTag::SurfaceState,
        SURFACE_STATE_WORDS * 4,
        32,
    )?;
    words.copy_from_slice(&dw);
    batch.state_reloc(&block, 1, &surface.bo, read_domains, write_domain, tile_offset);
    Ok(block.offset)
}

/// Binding table with the render target and, if any, the texture
pub fn emit_binding_table(
    batch: &mut BatchBuffer,
    renderbuffer_offset: u32,
    texture_offset: u32,
) -> Result<u32> {
    let (block, words) = batch.state_batch(
        StateTag::BindingTable,
        NUM_BINDING_TABLE_ENTRIES * 4,
        32,
    )?;
    words[RENDERBUFFER_BINDING_TABLE_INDEX] = renderbuffer_offset;
    words[TEXTURE_BINDING_TABLE_INDEX] = texture_offset;
    Ok(block.offset)
}

// =============================================================================
// SAMPLER
// =============================================================================

/// SAMPLER_STATE with clamped addressing and no mipmapping.
///
/// The base level is always 0; the miptree's first level is not taken into
/// account for LOD clamping.
pub fn emit_sampler_state(
    batch: &mut BatchBuffer,
    filter: u32,
    max_lod: u32,
    non_normalized_coords: bool,
) -> Result<u32> {
    let dw = [
        pack(&[
            (sampler0::LOD_PRECLAMP, 1),
            (sampler0::BASE_LEVEL, 0),
            (sampler0::MIP_FILTER, sampler0::MIPFILTER_NONE),
            (sampler0::MAG_FILTER, filter),
            (sampler0::MIN_FILTER, filter),
            (sampler0::LOD_BIAS, 0),
            (sampler0::SHADOW_FUNCTION, 0),
        ]),
        pack(&[
            (sampler1::MIN_LOD, 0),
            (sampler1::MAX_LOD, max_lod),
            (sampler1::S_WRAP, sampler1::TEXCOORDMODE_CLAMP),
            (sampler1::T_WRAP, sampler1::TEXCOORDMODE_CLAMP),
            (sampler1::R_WRAP, sampler1::TEXCOORDMODE_CLAMP),
        ]),
        pack(&[(sampler2::BORDER_COLOR_POINTER, 0)]),
        pack(&[
            (sampler3::MAX_ANISO, sampler3::ANISORATIO_2),
            (sampler3::ADDRESS_ROUNDING, sampler3::ADDRESS_ROUNDING_ALL),
            (sampler3::NON_NORMALIZED_COORD, non_normalized_coords as u32),
        ]),
    ];

    let (block, words) = batch.state_batch(
        StateTag::SamplerState,
        SAMPLER_STATE_WORDS * 4,
        32,
    )?;
    words.copy_from_slice(&dw);
    Ok(block.offset)
}

/// 3DSTATE_SAMPLER_STATE_POINTERS; only the PS table is populated
pub fn emit_sampler_state_pointers(batch: &mut BatchBuffer, sampler_offset: u32) -> Result<()> {
    packet!(
        batch,
        cmd::SAMPLER_STATE_POINTERS,
        pointers::VS_SAMPLER_STATE_CHANGE
            | pointers::GS_SAMPLER_STATE_CHANGE
            | pointers::PS_SAMPLER_STATE_CHANGE,
        [0, 0, sampler_offset],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::testing;

    #[test]
    fn test_push_constants_copied() {
        let mut batch = testing::batch();
        let consts = WmPushConstants {
            dst_x0: 3,
            dst_x1: 67,
            src_z: 2,
            ..Default::default()
        };
        let offset = emit_wm_constants(&mut batch, &consts).expect("space");
        assert_eq!(offset % 32, 0);
        assert_eq!(batch.word_at(offset), 3);
        assert_eq!(batch.word_at(offset + 4), 67);
        assert_eq!(batch.word_at(offset + 40), 2);
    }

    #[test]
    fn test_render_target_surface() {
        let mut batch = testing::batch();
        let surf = testing::surface(2, 0x20_0000, 64, 32).with_tiling(Tiling::X);
        let offset =
            emit_surface_state(&mut batch, &surf, GemDomain::RENDER, GemDomain::RENDER).expect("space");

        let dw0 = batch.word_at(offset);
        assert_eq!(surf0::TYPE.extract(dw0), surftype::SURFACE_2D);
        assert_eq!(surf0::FORMAT.extract(dw0), 0x0c7);
        assert_eq!(dw0 & 0x3f, 0x3f);
        assert_eq!(batch.word_at(offset + 4), 0x20_0000);
        assert_eq!(batch.word_at(offset + 8), 63 << 6 | 31 << 19);
        assert_eq!(batch.word_at(offset + 12), 1 << 1 | 255 << 3);

        let reloc = batch.relocations().at(offset + 4).expect("surface base reloc");
        assert_eq!(reloc.write_domain, GemDomain::RENDER);
    }

    #[test]
    fn test_multisampled_texture_surface() {
        let mut batch = testing::batch();
        let mut surf = testing::surface(3, 0x28_0000, 128, 128)
            .with_tiling(Tiling::Y)
            .with_samples(4)
            .with_offset(36, 34);
        surf.align_h = 4;
        let offset =
            emit_surface_state(&mut batch, &surf, GemDomain::SAMPLER, GemDomain::empty()).expect("space");

        // Width and height in pixels, not samples
        let dw2 = batch.word_at(offset + 8);
        assert_eq!(surf2::WIDTH.extract(dw2), 63);
        assert_eq!(surf2::HEIGHT.extract(dw2), 63);
        assert_eq!(batch.word_at(offset + 12) & 3, 3);
        assert_eq!(surf4::MULTISAMPLECOUNT.extract(batch.word_at(offset + 16)), 2);

        // 32 texels per Y tile row, 32 rows: x 36 -> tile 1 + 4, y 34 -> tile 1 + 2
        let dw5 = batch.word_at(offset + 20);
        assert_eq!(surf5::X_OFFSET.extract(dw5), 1);
        assert_eq!(surf5::Y_OFFSET.extract(dw5), 1);
        assert_eq!(surf5::VERTICAL_ALIGN.extract(dw5), 1);

        let reloc = batch.relocations().at(offset + 4).expect("surface base reloc");
        assert_eq!(reloc.delta, 32 * 512 + 4096);
        assert_eq!(reloc.read_domains, GemDomain::SAMPLER);
        assert!(reloc.write_domain.is_empty());
    }

    #[test]
    #[should_panic(expected = "not a multiple of 4")]
    fn test_misaligned_tile_offset_panics() {
        let mut batch = testing::batch();
        let surf = testing::surface(3, 0x28_0000, 128, 128)
            .with_tiling(Tiling::Y)
            .with_offset(2, 0);
        let _ = emit_surface_state(&mut batch, &surf, GemDomain::SAMPLER, GemDomain::empty());
    }

    #[test]
    fn test_binding_table_slots() {
        let mut batch = testing::batch();
        let offset = emit_binding_table(&mut batch, 0xfa0, 0).expect("space");
        assert_eq!(batch.word_at(offset), 0xfa0);
        assert_eq!(batch.word_at(offset + 4), 0);
    }

    #[test]
    fn test_sampler_state() {
        let mut batch = testing::batch();
        let offset =
            emit_sampler_state(&mut batch, sampler0::MAPFILTER_LINEAR, 0, true).expect("space");
        let ss0 = batch.word_at(offset);
        assert_eq!(sampler0::MIN_FILTER.extract(ss0), 1);
        assert_eq!(sampler0::MAG_FILTER.extract(ss0), 1);
        assert_eq!(sampler0::LOD_PRECLAMP.extract(ss0), 1);
        assert_eq!(batch.word_at(offset + 4), 2 | 2 << 3 | 2 << 6);
        assert_eq!(batch.word_at(offset + 12), 1 | 0x3f << 13);

        emit_sampler_state_pointers(&mut batch, offset).expect("space");
        assert_eq!(
            testing::emitted(&batch)[0],
            [0x7802_1302, 0, 0, offset]
        );
    }
}
