//! # Operation Parameters
//!
//! Immutable description of one blit, clear or resolve, and the checks it
//! must pass before anything is emitted.

use arrayvec::ArrayVec;
use blorp_core::{BufferObject, Error, Result};
use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert;

use crate::regs::depthformat;
use crate::surface::{SurfaceInfo, TextureTarget, Tiling};

/// Largest surface dimension Gen6 addresses
pub const MAX_SURFACE_DIM: u32 = 8192;
/// Largest surface pitch in bytes
pub const MAX_PITCH: u32 = 128 * 1024;
/// Mip levels a miptree can have
pub const MAX_LEVELS: usize = 14;
/// Depth buffer render target view extent limit
pub const MAX_DEPTH_EXTENT: u32 = 512;

// =============================================================================
// HIZ
// =============================================================================

/// Hierarchical depth operation performed by the rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HizOp {
    /// Not a HiZ operation
    #[default]
    None,
    /// Fast depth clear
    DepthClear,
    /// Resolve HiZ into the depth buffer
    DepthResolve,
    /// Rebuild HiZ from the depth buffer
    HizResolve,
}

/// Slice arrangement of the HiZ miptree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HizLayout {
    /// Each level holds all of its slices
    #[default]
    AllLodInEachSlice,
    /// All slices of a level sit together, level origins differ
    AllSlicesAtEachLod,
}

/// HiZ buffer attached to a depth miptree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HizBuffer {
    /// Backing buffer object
    pub bo: BufferObject,
    /// Row pitch in bytes
    pub pitch: u32,
    /// Tiling of the HiZ miptree
    pub tiling: Tiling,
    /// Bytes per HiZ texel
    pub cpp: u32,
    /// Slice arrangement
    pub layout: HizLayout,
    /// Texel origin of each level
    pub level_origins: ArrayVec<(u32, u32), MAX_LEVELS>,
}

impl HizBuffer {
    /// Byte offset of level `lod` within the HiZ buffer
    pub fn level_offset(&self, lod: u32) -> u32 {
        match self.layout {
            HizLayout::AllLodInEachSlice => 0,
            HizLayout::AllSlicesAtEachLod => {
                let (x, y) = self.level_origins[lod as usize];
                crate::surface::aligned_offset(self.tiling, self.pitch, self.cpp, x, y)
            }
        }
    }
}

// =============================================================================
// DEPTH TARGET
// =============================================================================

/// Depth buffer formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFormat {
    /// 32-bit float
    D32Float,
    /// 24-bit depth with stencil
    D24UnormS8,
    /// 24-bit depth, 8 bits unused
    D24UnormX8,
    /// 16-bit depth
    D16Unorm,
}

impl DepthFormat {
    /// Value of the 3DSTATE_DEPTH_BUFFER format field
    pub const fn hw(self) -> u32 {
        match self {
            Self::D32Float => depthformat::D32_FLOAT,
            Self::D24UnormS8 => depthformat::D24_UNORM_S8_UINT,
            Self::D24UnormX8 => depthformat::D24_UNORM_X8_UINT,
            Self::D16Unorm => depthformat::D16_UNORM,
        }
    }
}

/// Depth miptree the operation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthInfo {
    /// Backing buffer object
    pub bo: BufferObject,
    /// Row pitch in bytes
    pub pitch: u32,
    /// Format
    pub format: DepthFormat,
    /// Texture target of the miptree
    pub target: TextureTarget,
    /// Level 0 width
    pub logical_width0: u32,
    /// Level 0 height
    pub logical_height0: u32,
    /// Level 0 depth or layer count
    pub logical_depth0: u32,
    /// First level of the miptree
    pub first_level: u32,
    /// Level being operated on
    pub level: u32,
    /// Layer being operated on
    pub layer: u32,
    /// Width covered by a HiZ op, padded to the hardware alignment
    pub width: u32,
    /// Height covered by a HiZ op, padded to the hardware alignment
    pub height: u32,
    /// Packed depth clear value
    pub clear_value: u32,
    /// Attached HiZ buffer
    pub hiz: HizBuffer,
}

impl DepthInfo {
    /// Level relative to the first level of the miptree
    pub const fn lod(&self) -> u32 {
        self.level - self.first_level
    }

    /// Hardware surface type and slice count; cubes are programmed as 2D
    /// with six slices per cube.
    pub const fn surface_type_and_depth(&self) -> (u32, u32) {
        let depth = if self.logical_depth0 > 1 {
            self.logical_depth0
        } else {
            1
        };
        if self.target.is_cube() {
            (crate::regs::surftype::SURFACE_2D, depth.saturating_mul(6))
        } else {
            (self.target.surface_type(), depth)
        }
    }
}

// =============================================================================
// PIXEL PROGRAM INPUTS
// =============================================================================

/// Linear mapping of one destination axis onto the source
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct CoordTransform {
    /// Scale
    pub multiplier: f32,
    /// Offset
    pub offset: f32,
}

/// Push constants read by the BLORP pixel program
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct WmPushConstants {
    /// Destination rectangle
    pub dst_x0: u32,
    pub dst_x1: u32,
    pub dst_y0: u32,
    pub dst_y1: u32,
    /// Rectangle grid limits for scaled blits
    pub rect_grid_x1: f32,
    pub rect_grid_y1: f32,
    /// Destination to source transform
    pub x_transform: CoordTransform,
    pub y_transform: CoordTransform,
    /// Source layer
    pub src_z: u32,
    /// Pad to a whole number of registers
    pub pad: [u32; 5],
}

/// Size of a general register in bytes
pub const REG_SIZE: usize = 32;

const_assert!(core::mem::size_of::<WmPushConstants>() % REG_SIZE == 0);

/// Registers of push constant data
pub const NUM_PUSH_CONST_REGS: u32 = (core::mem::size_of::<WmPushConstants>() / REG_SIZE) as u32;

const_assert!(NUM_PUSH_CONST_REGS > 0);

/// Inputs for an operation that runs a pixel program
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WmParams {
    /// Buffer holding compiled kernels, the instruction base
    pub program_cache: BufferObject,
    /// Push constant payload
    pub push_consts: WmPushConstants,
}

// =============================================================================
// OPERATION
// =============================================================================

/// One BLORP operation
#[derive(Debug, Clone, PartialEq)]
pub struct BlorpParams {
    /// Destination surface
    pub dst: SurfaceInfo,
    /// Source surface for blits
    pub src: Option<SurfaceInfo>,
    /// Depth target for clears and resolves
    pub depth: Option<DepthInfo>,
    /// Rectangle
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    /// Instances drawn, one per layer
    pub num_layers: u32,
    /// HiZ operation
    pub hiz_op: HizOp,
    /// Color attachments written by the program
    pub num_draw_buffers: u32,
    /// Outputs the SF passes to the pixel program
    pub num_varyings: u32,
    /// Pixel program inputs; `None` for operations without a program
    pub wm: Option<WmParams>,
}

impl BlorpParams {
    /// An operation covering `dst` from (x0, y0) to (x1, y1), one layer,
    /// no program and no depth.
    pub fn new(dst: SurfaceInfo, x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            dst,
            src: None,
            depth: None,
            x0,
            y0,
            x1,
            y1,
            num_layers: 1,
            hiz_op: HizOp::None,
            num_draw_buffers: 1,
            num_varyings: 0,
            wm: None,
        }
    }

    /// Whether a pixel program runs
    pub const fn use_wm_prog(&self) -> bool {
        self.wm.is_some()
    }

    /// Reject input the hardware cannot be programmed for
    pub fn validate(&self) -> Result<()> {
        validate_surface(&self.dst)?;
        if let Some(src) = &self.src {
            validate_surface(src)?;
        }

        if self.x0 == self.x1 || self.y0 == self.y1 {
            return Err(Error::InvalidParameter("empty rectangle"));
        }
        if self.x0.max(self.x1) > MAX_SURFACE_DIM || self.y0.max(self.y1) > MAX_SURFACE_DIM {
            return Err(Error::InvalidParameter("rectangle outside addressable range"));
        }
        if self.num_layers == 0 {
            return Err(Error::InvalidParameter("zero layers"));
        }
        if self.use_wm_prog() && self.num_draw_buffers == 0 {
            return Err(Error::InvalidParameter("program without draw buffers"));
        }
        if self.num_varyings > 32 {
            return Err(Error::InvalidParameter("too many varyings"));
        }

        match &self.depth {
            Some(depth) => validate_depth(depth)?,
            None if self.hiz_op != HizOp::None => {
                return Err(Error::InvalidParameter("HiZ operation without depth target"));
            }
            None => {}
        }
        Ok(())
    }
}

fn validate_surface(surf: &SurfaceInfo) -> Result<()> {
    if !matches!(surf.num_samples, 0 | 1 | 4) {
        return Err(Error::NotSupported("sample count"));
    }
    let (width, height) = surf.hw_size();
    if width == 0 || height == 0 || width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
        return Err(Error::InvalidParameter("surface size"));
    }
    if surf.pitch == 0 || surf.hw_pitch() > MAX_PITCH {
        return Err(Error::InvalidParameter("surface pitch"));
    }
    // SURFACE_STATE drops the low bits of the intra-tile offset
    let (_, tile_x, tile_y) = surf.compute_tile_offsets();
    if tile_x % 4 != 0 || tile_y % 2 != 0 {
        return Err(Error::InvalidParameter("surface offset alignment"));
    }
    Ok(())
}

fn validate_depth(depth: &DepthInfo) -> Result<()> {
    if depth.level < depth.first_level {
        return Err(Error::InvalidParameter("depth level below first level"));
    }
    let lod = depth.lod();
    if lod as usize >= MAX_LEVELS {
        return Err(Error::InvalidParameter("depth level"));
    }
    if depth.pitch == 0 || depth.pitch > MAX_PITCH || depth.hiz.pitch == 0 || depth.hiz.pitch > MAX_PITCH {
        return Err(Error::InvalidParameter("depth pitch"));
    }
    for (w, h) in [
        (depth.logical_width0, depth.logical_height0),
        (depth.width, depth.height),
    ] {
        if w == 0 || h == 0 || w > MAX_SURFACE_DIM || h > MAX_SURFACE_DIM {
            return Err(Error::InvalidParameter("depth size"));
        }
    }

    let (_, slices) = depth.surface_type_and_depth();
    if slices > MAX_DEPTH_EXTENT || depth.layer >= slices {
        return Err(Error::InvalidParameter("depth layer count"));
    }
    let hiz = &depth.hiz;
    if !hiz.tiling.supports_cpp(hiz.cpp) {
        return Err(Error::InvalidParameter("HiZ cpp"));
    }
    if hiz.layout == HizLayout::AllSlicesAtEachLod {
        let Some(&(x, y)) = hiz.level_origins.get(lod as usize) else {
            return Err(Error::InvalidParameter("HiZ level origin missing"));
        };
        if !hiz.tiling.is_tile_aligned(hiz.cpp, x, y) {
            return Err(Error::InvalidParameter("HiZ level origin alignment"));
        }
    }
    Ok(())
}
