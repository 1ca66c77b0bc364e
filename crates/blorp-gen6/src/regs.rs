//! # Gen6 Register Fields
//!
//! Field tables for every word the BLORP path packs, plus the enumerated
//! values written into them. One module per packet or state structure,
//! named after the word index.

#![allow(missing_docs)]

use crate::pack::Field;

// =============================================================================
// PIPE CONTROL
// =============================================================================

pub mod pipe_control {
    use super::Field;

    pub const DEPTH_CACHE_FLUSH: Field = Field::bit("depth cache flush", 0);
    pub const STALL_AT_SCOREBOARD: Field = Field::bit("stall at scoreboard", 1);
    pub const DEPTH_STALL: Field = Field::bit("depth stall", 13);
    pub const WRITE_IMMEDIATE: Field = Field::bit("write immediate", 14);
    pub const CS_STALL: Field = Field::bit("cs stall", 20);

    /// Set in the address word of a post-sync write on Gen6
    pub const GLOBAL_GTT_WRITE: u32 = 1 << 2;
}

// =============================================================================
// MULTISAMPLE
// =============================================================================

pub mod multisample {
    use super::Field;

    pub const NUM_SAMPLES: Field = Field::new("number of multisamples", 1, 3);
    pub const PIXEL_LOCATION: Field = Field::bit("pixel location", 4);

    pub const NUMSAMPLES_1: u32 = 0;
    pub const NUMSAMPLES_4: u32 = 2;
    pub const PIXEL_LOCATION_CENTER: u32 = 0;

    /// Standard 4x sample positions
    pub const POSITIONS_4X: u32 = 0xae2ae662;
}

// =============================================================================
// VERTEX FETCH
// =============================================================================

pub mod vb0 {
    use super::Field;

    pub const INDEX: Field = Field::new("buffer index", 26, 6);
    pub const ACCESS_INSTANCEDATA: Field = Field::bit("instance data access", 20);
    pub const PITCH: Field = Field::new("buffer pitch", 0, 12);
}

pub mod ve0 {
    use super::Field;

    pub const VALID: Field = Field::bit("valid", 25);
    pub const FORMAT: Field = Field::new("source format", 16, 9);
    pub const SRC_OFFSET: Field = Field::new("source offset", 0, 12);
}

pub mod ve1 {
    use super::Field;

    pub const COMPONENT_0: Field = Field::new("component 0 control", 28, 3);
    pub const COMPONENT_1: Field = Field::new("component 1 control", 24, 3);
    pub const COMPONENT_2: Field = Field::new("component 2 control", 20, 3);
    pub const COMPONENT_3: Field = Field::new("component 3 control", 16, 3);

    pub const STORE_SRC: u32 = 1;
}

pub mod urb1 {
    use super::Field;

    pub const VS_ENTRIES: Field = Field::new("VS number of URB entries", 0, 16);
}

// =============================================================================
// COLOR CALCULATOR
// =============================================================================

pub mod blend1 {
    use super::Field;

    pub const POST_BLEND_CLAMP: Field = Field::bit("post-blend clamp enable", 0);
    pub const PRE_BLEND_CLAMP: Field = Field::bit("pre-blend clamp enable", 1);
    pub const CLAMP_RANGE: Field = Field::new("clamp range", 2, 2);

    pub const CLAMPRANGE_FORMAT: u32 = 2;
}

pub mod ds2 {
    use super::Field;

    pub const DEPTH_WRITE_ENABLE: Field = Field::bit("depth write enable", 26);
    pub const DEPTH_TEST_FUNC: Field = Field::new("depth test function", 27, 3);
    pub const DEPTH_TEST_ENABLE: Field = Field::bit("depth test enable", 31);

    pub const COMPAREFUNCTION_NEVER: u32 = 1;
}

// =============================================================================
// SURFACE STATE
// =============================================================================

pub mod surf0 {
    use super::Field;

    pub const CUBEFACE_ENABLES: Field = Field::new("cube face enables", 0, 6);
    pub const MIPLAYOUT: Field = Field::bit("mip map layout", 10);
    pub const FORMAT: Field = Field::new("surface format", 18, 9);
    pub const TYPE: Field = Field::new("surface type", 29, 3);

    pub const ALL_CUBE_FACES: u32 = 0x3f;
    pub const MIPLAYOUT_BELOW: u32 = 0;
}

pub mod surf2 {
    use super::Field;

    pub const LOD: Field = Field::new("mip count / lod", 2, 4);
    pub const WIDTH: Field = Field::new("width", 6, 13);
    pub const HEIGHT: Field = Field::new("height", 19, 13);
}

pub mod surf3 {
    use super::Field;

    pub const TILED_Y: Field = Field::bit("tile walk y", 0);
    pub const TILED: Field = Field::bit("tiled surface", 1);
    pub const PITCH: Field = Field::new("surface pitch", 3, 17);
    pub const DEPTH: Field = Field::new("depth", 21, 11);
}

pub mod surf4 {
    use super::Field;

    pub const MULTISAMPLECOUNT: Field = Field::new("number of multisamples", 4, 3);

    pub const MULTISAMPLECOUNT_1: u32 = 0;
    pub const MULTISAMPLECOUNT_4: u32 = 2;
}

pub mod surf5 {
    use super::Field;

    pub const Y_OFFSET: Field = Field::new("y offset", 20, 4);
    pub const VERTICAL_ALIGN: Field = Field::bit("vertical alignment", 24);
    pub const X_OFFSET: Field = Field::new("x offset", 25, 7);
}

/// Hardware surface types
pub mod surftype {
    pub const SURFACE_1D: u32 = 0;
    pub const SURFACE_2D: u32 = 1;
    pub const SURFACE_3D: u32 = 2;
    pub const SURFACE_CUBE: u32 = 3;
    pub const SURFACE_NULL: u32 = 7;
}

// =============================================================================
// SAMPLER STATE
// =============================================================================

pub mod sampler0 {
    use super::Field;

    pub const SHADOW_FUNCTION: Field = Field::new("shadow function", 0, 3);
    pub const LOD_BIAS: Field = Field::new("texture lod bias", 3, 11);
    pub const MIN_FILTER: Field = Field::new("min mode filter", 14, 3);
    pub const MAG_FILTER: Field = Field::new("mag mode filter", 17, 3);
    pub const MIP_FILTER: Field = Field::new("mip mode filter", 20, 2);
    pub const BASE_LEVEL: Field = Field::new("base mip level", 22, 5);
    pub const LOD_PRECLAMP: Field = Field::bit("lod preclamp enable", 28);

    pub const MAPFILTER_LINEAR: u32 = 1;
    pub const MIPFILTER_NONE: u32 = 0;
}

pub mod sampler1 {
    use super::Field;

    pub const R_WRAP: Field = Field::new("r address control", 0, 3);
    pub const T_WRAP: Field = Field::new("t address control", 3, 3);
    pub const S_WRAP: Field = Field::new("s address control", 6, 3);
    pub const MAX_LOD: Field = Field::new("max lod", 12, 10);
    pub const MIN_LOD: Field = Field::new("min lod", 22, 10);

    pub const TEXCOORDMODE_CLAMP: u32 = 2;
}

pub mod sampler2 {
    use super::Field;

    pub const BORDER_COLOR_POINTER: Field = Field::new("border color pointer", 5, 27);
}

pub mod sampler3 {
    use super::Field;

    pub const NON_NORMALIZED_COORD: Field = Field::bit("non-normalized coordinates", 0);
    pub const ADDRESS_ROUNDING: Field = Field::new("address rounding enables", 13, 6);
    pub const MAX_ANISO: Field = Field::new("maximum anisotropy", 19, 3);

    /// Round on min and mag for U, V and R
    pub const ADDRESS_ROUNDING_ALL: u32 = 0x3f;
    pub const ANISORATIO_2: u32 = 0;
}

// =============================================================================
// FIXED FUNCTION STAGES
// =============================================================================

pub mod clip2 {
    use super::Field;

    pub const PERSPECTIVE_DIVIDE_DISABLE: Field = Field::bit("perspective divide disable", 9);
}

pub mod sf1 {
    use super::Field;

    pub const URB_ENTRY_READ_OFFSET: Field = Field::new("vertex URB entry read offset", 4, 6);
    pub const URB_ENTRY_READ_LENGTH: Field = Field::new("vertex URB entry read length", 11, 5);
    pub const NUM_OUTPUTS: Field = Field::new("number of SF outputs", 22, 6);

    pub const READ_OFFSET: u32 = 1;
    pub const READ_LENGTH: u32 = 1;
}

pub mod sf3 {
    use super::Field;

    pub const MSRAST_MODE: Field = Field::new("multisample rasterization mode", 18, 2);

    pub const MSRAST_ON_PATTERN: u32 = 3;
}

pub mod wm2 {
    use super::Field;

    pub const SAMPLER_COUNT: Field = Field::new("sampler count", 27, 3);

    /// Between one and four samplers
    pub const SAMPLER_COUNT_1_4: u32 = 1;
}

pub mod wm4 {
    use super::Field;

    pub const DISPATCH_START_GRF_0: Field = Field::new("dispatch GRF start register 0", 16, 7);
    pub const HIZ_RESOLVE: Field = Field::bit("hierarchical depth buffer resolve", 27);
    pub const DEPTH_RESOLVE: Field = Field::bit("depth buffer resolve", 28);
    pub const DEPTH_CLEAR: Field = Field::bit("depth buffer clear", 30);
}

pub mod wm5 {
    use super::Field;

    pub const DISPATCH_16: Field = Field::bit("16 pixel dispatch enable", 1);
    pub const LINE_AA_WIDTH: Field = Field::new("line antialiasing region width", 14, 2);
    pub const LINE_END_CAP_AA_WIDTH: Field = Field::new("line end cap aa region width", 16, 2);
    pub const DISPATCH_ENABLE: Field = Field::bit("thread dispatch enable", 19);
    pub const KILL_ENABLE: Field = Field::bit("pixel shader kill pixel", 22);
    pub const MAX_THREADS: Field = Field::new("maximum number of threads", 25, 7);

    pub const LINE_AA_WIDTH_1_0: u32 = 1;
    pub const LINE_END_CAP_AA_WIDTH_0_5: u32 = 0;
}

pub mod wm6 {
    use super::Field;

    pub const MSDISPMODE: Field = Field::bit("multisample dispatch mode", 0);
    pub const MSRAST_MODE: Field = Field::new("multisample rasterization mode", 1, 2);

    pub const MSDISPMODE_PERSAMPLE: u32 = 0;
    pub const MSDISPMODE_PERPIXEL: u32 = 1;
    pub const MSRAST_OFF_PIXEL: u32 = 0;
    pub const MSRAST_ON_PATTERN: u32 = 3;
}

// =============================================================================
// POINTER PACKETS
// =============================================================================

/// Header flags of the pointer packets
pub mod pointers {
    pub const VS_SAMPLER_STATE_CHANGE: u32 = 1 << 8;
    pub const GS_SAMPLER_STATE_CHANGE: u32 = 1 << 9;
    pub const PS_SAMPLER_STATE_CHANGE: u32 = 1 << 12;
    pub const BINDING_TABLE_MODIFY_PS: u32 = 1 << 12;
    pub const CC_VIEWPORT_MODIFY: u32 = 1 << 12;
    pub const CONSTANT_BUFFER_0_ENABLE: u32 = 1 << 12;
    pub const DEPTH_CLEAR_VALID: u32 = 1 << 15;

    /// Low bit of every CC_STATE_POINTERS entry
    pub const CC_POINTER_VALID: u32 = 1;
}

// =============================================================================
// DEPTH BUFFER
// =============================================================================

pub mod depth1 {
    use super::Field;

    pub const PITCH: Field = Field::new("surface pitch", 0, 17);
    pub const FORMAT: Field = Field::new("surface format", 18, 3);
    pub const SEPARATE_STENCIL: Field = Field::bit("separate stencil buffer enable", 21);
    pub const HIZ_ENABLE: Field = Field::bit("hierarchical depth buffer enable", 22);
    pub const TILE_WALK: Field = Field::bit("tile walk", 26);
    pub const TILED: Field = Field::bit("tiled surface", 27);
    pub const TYPE: Field = Field::new("surface type", 29, 3);

    pub const TILEWALK_YMAJOR: u32 = 1;
}

pub mod depth3 {
    use super::Field;

    pub const MIPLAYOUT: Field = Field::bit("mip map layout", 1);
    pub const LOD: Field = Field::new("lod", 2, 4);
    pub const WIDTH: Field = Field::new("width", 6, 13);
    pub const HEIGHT: Field = Field::new("height", 19, 13);
}

pub mod depth4 {
    use super::Field;

    pub const RT_VIEW_EXTENT: Field = Field::new("render target view extent", 1, 9);
    pub const MIN_ARRAY_ELEMENT: Field = Field::new("minimum array element", 10, 11);
    pub const DEPTH: Field = Field::new("depth", 21, 11);
}

pub mod hiz1 {
    use super::Field;

    pub const PITCH: Field = Field::new("surface pitch", 0, 17);
}

/// Depth buffer formats
pub mod depthformat {
    pub const D32_FLOAT: u32 = 1;
    pub const D24_UNORM_S8_UINT: u32 = 2;
    pub const D24_UNORM_X8_UINT: u32 = 3;
    pub const D16_UNORM: u32 = 5;
}

// =============================================================================
// DRAWING
// =============================================================================

pub mod drawrect2 {
    use super::Field;

    pub const X_MAX: Field = Field::new("clipped drawing rectangle x max", 0, 16);
    pub const Y_MAX: Field = Field::new("clipped drawing rectangle y max", 16, 16);
}

pub mod prim0 {
    use super::Field;

    pub const TOPOLOGY: Field = Field::new("primitive topology type", 10, 5);
    pub const ACCESS_RANDOM: Field = Field::bit("vertex access type", 15);

    pub const RECTLIST: u32 = 0x0f;
    pub const ACCESS_SEQUENTIAL: u32 = 0;
}
