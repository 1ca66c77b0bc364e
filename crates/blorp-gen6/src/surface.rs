//! # Surfaces
//!
//! Surface descriptors, format translation and intra-tile offset math.

use blorp_core::BufferObject;

use crate::regs::surftype;

// =============================================================================
// FORMATS
// =============================================================================

/// Hardware surface formats used by BLORP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SurfaceFormat {
    /// R32G32B32A32_FLOAT
    R32G32B32A32Float = 0x000,
    /// R16G16B16A16_FLOAT
    R16G16B16A16Float = 0x084,
    /// B8G8R8A8_UNORM
    B8G8R8A8Unorm = 0x0c0,
    /// R8G8B8A8_UNORM
    R8G8B8A8Unorm = 0x0c7,
    /// R32_FLOAT
    R32Float = 0x0d8,
    /// R24_UNORM_X8_TYPELESS
    R24UnormX8Typeless = 0x0d9,
    /// B8G8R8X8_UNORM
    B8G8R8X8Unorm = 0x0e9,
    /// B5G6R5_UNORM
    B5G6R5Unorm = 0x100,
    /// R16_UNORM
    R16Unorm = 0x10a,
    /// R8_UNORM
    R8Unorm = 0x140,
}

impl SurfaceFormat {
    /// Value of the SURFACE_STATE format field
    pub const fn hw(self) -> u32 {
        self as u32
    }
}

/// Pixel formats a BLORP surface can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 32-bit float RGBA
    Rgba32Float,
    /// 16-bit float RGBA
    Rgba16Float,
    /// 8-bit BGRA
    Bgra8,
    /// 8-bit RGBA
    Rgba8,
    /// 8-bit BGR, alpha ignored
    Bgrx8,
    /// 16-bit 565
    Rgb565,
    /// Single 32-bit float channel
    R32Float,
    /// Single 16-bit channel
    R16,
    /// Single 8-bit channel
    R8,
    /// Depth 24 bits in a 32-bit texel
    Depth24X8,
    /// Depth 32-bit float
    Depth32Float,
    /// Depth 16 bits
    Depth16,
    /// W-tiled stencil, sampled as R8
    Stencil8,
}

impl PixelFormat {
    /// Bytes per texel
    pub const fn cpp(self) -> u32 {
        match self {
            Self::Rgba32Float => 16,
            Self::Rgba16Float => 8,
            Self::Bgra8 | Self::Rgba8 | Self::Bgrx8 | Self::R32Float => 4,
            Self::Depth24X8 | Self::Depth32Float => 4,
            Self::Rgb565 | Self::R16 | Self::Depth16 => 2,
            Self::R8 | Self::Stencil8 => 1,
        }
    }

    /// Format programmed into SURFACE_STATE
    pub const fn surface_format(self) -> SurfaceFormat {
        match self {
            Self::Rgba32Float => SurfaceFormat::R32G32B32A32Float,
            Self::Rgba16Float => SurfaceFormat::R16G16B16A16Float,
            Self::Bgra8 => SurfaceFormat::B8G8R8A8Unorm,
            Self::Rgba8 => SurfaceFormat::R8G8B8A8Unorm,
            Self::Bgrx8 => SurfaceFormat::B8G8R8X8Unorm,
            Self::Rgb565 => SurfaceFormat::B5G6R5Unorm,
            Self::R32Float | Self::Depth32Float => SurfaceFormat::R32Float,
            Self::Depth24X8 => SurfaceFormat::R24UnormX8Typeless,
            Self::R16 | Self::Depth16 => SurfaceFormat::R16Unorm,
            Self::R8 | Self::Stencil8 => SurfaceFormat::R8Unorm,
        }
    }
}

// =============================================================================
// TILING
// =============================================================================

/// Memory tiling of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tiling {
    /// Linear
    #[default]
    None,
    /// X-major tiles, 512 bytes x 8 rows
    X,
    /// Y-major tiles, 128 bytes x 32 rows
    Y,
}

/// Size of every tile in bytes
pub const TILE_SIZE: u32 = 4096;

impl Tiling {
    /// Tile width in bytes and height in rows, `None` for linear
    pub const fn tile_dims(self) -> Option<(u32, u32)> {
        match self {
            Self::None => None,
            Self::X => Some((512, 8)),
            Self::Y => Some((128, 32)),
        }
    }

    /// Masks selecting the intra-tile part of a texel position
    pub const fn tile_masks(self, cpp: u32) -> (u32, u32) {
        match self.tile_dims() {
            Some((w, h)) => (w / cpp - 1, h - 1),
            None => (0, 0),
        }
    }

    /// Whether `cpp` divides the tile width into whole texels
    pub const fn supports_cpp(self, cpp: u32) -> bool {
        cpp.is_power_of_two() && cpp <= 16
    }

    /// Whether texel (`x`, `y`) starts a tile; always true for linear
    pub const fn is_tile_aligned(self, cpp: u32, x: u32, y: u32) -> bool {
        let (mask_x, mask_y) = self.tile_masks(cpp);
        x & mask_x == 0 && y & mask_y == 0
    }
}

/// Byte offset of the tile containing texel (`x`, `y`).
///
/// For tiled surfaces `x` and `y` must sit on a tile boundary.
pub fn aligned_offset(tiling: Tiling, pitch: u32, cpp: u32, x: u32, y: u32) -> u32 {
    match tiling.tile_dims() {
        None => y * pitch + x * cpp,
        Some((tile_w, tile_h)) => {
            assert!(x % (tile_w / cpp) == 0, "x {} not tile aligned", x);
            assert!(y % tile_h == 0, "y {} not tile aligned", y);
            y * pitch + (x * cpp / tile_w) * TILE_SIZE
        }
    }
}

// =============================================================================
// TEXTURE TARGETS
// =============================================================================

/// Texture target of the miptree backing a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureTarget {
    /// 1D
    Tex1D,
    /// 1D array
    Tex1DArray,
    /// 2D
    #[default]
    Tex2D,
    /// 2D array
    Tex2DArray,
    /// Rectangle
    Rect,
    /// 2D multisample
    Tex2DMultisample,
    /// 2D multisample array
    Tex2DMultisampleArray,
    /// 3D
    Tex3D,
    /// Cube map
    Cube,
    /// Cube map array
    CubeArray,
}

impl TextureTarget {
    /// Hardware surface type
    pub const fn surface_type(self) -> u32 {
        match self {
            Self::Tex1D | Self::Tex1DArray => surftype::SURFACE_1D,
            Self::Tex2D
            | Self::Tex2DArray
            | Self::Rect
            | Self::Tex2DMultisample
            | Self::Tex2DMultisampleArray => surftype::SURFACE_2D,
            Self::Tex3D => surftype::SURFACE_3D,
            Self::Cube | Self::CubeArray => surftype::SURFACE_CUBE,
        }
    }

    /// Cube or cube array
    pub const fn is_cube(self) -> bool {
        matches!(self, Self::Cube | Self::CubeArray)
    }
}

// =============================================================================
// SURFACE DESCRIPTOR
// =============================================================================

/// One color surface read or written by the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    /// Buffer object holding the miptree
    pub bo: BufferObject,
    /// Width; in samples for multisampled surfaces
    pub width: u32,
    /// Height; in samples for multisampled surfaces
    pub height: u32,
    /// Row pitch in bytes
    pub pitch: u32,
    /// Tiling
    pub tiling: Tiling,
    /// Sample count, 0 or 1 when single sampled
    pub num_samples: u32,
    /// Pixel format
    pub format: PixelFormat,
    /// X of the slice within the miptree, in texels
    pub x_offset: u32,
    /// Y of the slice within the miptree, in rows
    pub y_offset: u32,
    /// Vertical alignment of the miptree
    pub align_h: u32,
    /// W-tiled stencil accessed as Y-tiled R8
    pub map_stencil_as_y_tiled: bool,
}

impl SurfaceInfo {
    /// Single-sampled linear surface at the start of `bo`
    pub fn new(bo: BufferObject, width: u32, height: u32, pitch: u32, format: PixelFormat) -> Self {
        Self {
            bo,
            width,
            height,
            pitch,
            tiling: Tiling::None,
            num_samples: 1,
            format,
            x_offset: 0,
            y_offset: 0,
            align_h: 2,
            map_stencil_as_y_tiled: false,
        }
    }

    /// Set tiling
    pub fn with_tiling(mut self, tiling: Tiling) -> Self {
        self.tiling = tiling;
        self
    }

    /// Set sample count
    pub fn with_samples(mut self, num_samples: u32) -> Self {
        self.num_samples = num_samples;
        self
    }

    /// Set the slice position within the miptree
    pub fn with_offset(mut self, x: u32, y: u32) -> Self {
        self.x_offset = x;
        self.y_offset = y;
        self
    }

    /// Multisampled (IMS layout)
    pub const fn is_multisampled(&self) -> bool {
        self.num_samples > 1
    }

    /// Width and height as the hardware counts them, in pixels
    pub const fn hw_size(&self) -> (u32, u32) {
        if self.is_multisampled() {
            (self.width / 2, self.height / 2)
        } else {
            (self.width, self.height)
        }
    }

    /// Tiling the hardware sees
    pub const fn hw_tiling(&self) -> Tiling {
        if self.map_stencil_as_y_tiled {
            Tiling::Y
        } else {
            self.tiling
        }
    }

    /// Pitch the hardware sees
    pub const fn hw_pitch(&self) -> u32 {
        if self.map_stencil_as_y_tiled {
            self.pitch * 2
        } else {
            self.pitch
        }
    }

    /// Split the slice offset into a tile-aligned byte offset and the
    /// remaining intra-tile x/y.
    pub fn compute_tile_offsets(&self) -> (u32, u32, u32) {
        let cpp = self.format.cpp();
        let tiling = self.hw_tiling();
        let (mask_x, mask_y) = tiling.tile_masks(cpp);
        let tile_x = self.x_offset & mask_x;
        let tile_y = self.y_offset & mask_y;
        let offset = aligned_offset(
            tiling,
            self.hw_pitch(),
            cpp,
            self.x_offset & !mask_x,
            self.y_offset & !mask_y,
        );
        (offset, tile_x, tile_y)
    }
}
