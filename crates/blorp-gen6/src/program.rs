//! # Pixel Program Source
//!
//! The pixel program is compiled and cached elsewhere; emission only needs
//! its kernel offset and a few properties of the compiled code.

use blorp_core::Result;

use crate::params::BlorpParams;

/// Properties of a compiled BLORP pixel program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WmProgData {
    /// First register holding push constants
    pub first_curbe_grf: u32,
    /// Program runs once per sample on multisampled destinations
    pub persample_msaa_dispatch: bool,
}

/// A program ready to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmProgram {
    /// Offset of the kernel from the instruction base address
    pub kernel_offset: u32,
    /// Program properties
    pub prog_data: WmProgData,
}

/// Supplies the pixel program for an operation
pub trait WmProgramSource {
    /// Program for `params`, compiling it if needed
    fn wm_program(&mut self, params: &BlorpParams) -> Result<WmProgram>;
}

/// A fixed, precompiled program
impl WmProgramSource for WmProgram {
    fn wm_program(&mut self, _params: &BlorpParams) -> Result<WmProgram> {
        Ok(*self)
    }
}
