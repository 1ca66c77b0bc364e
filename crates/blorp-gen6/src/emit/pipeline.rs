//! # Pipeline Setup
//!
//! Multisample configuration, state base addresses and the URB split.

use blorp_batch::BatchBuffer;
use blorp_core::{BufferObject, Error, GemDomain, Result};

use crate::cmd;
use crate::device::DeviceInfo;
use crate::pack::pack;
use crate::regs::{multisample, urb1};

/// 3DSTATE_MULTISAMPLE for `num_samples` (0, 1 or 4)
pub fn emit_multisample(batch: &mut BatchBuffer, num_samples: u32) -> Result<()> {
    let (count, positions) = match num_samples {
        0 | 1 => (multisample::NUMSAMPLES_1, 0),
        4 => (multisample::NUMSAMPLES_4, multisample::POSITIONS_4X),
        _ => return Err(Error::NotSupported("sample count")),
    };

    let dw1 = pack(&[
        (multisample::PIXEL_LOCATION, multisample::PIXEL_LOCATION_CENTER),
        (multisample::NUM_SAMPLES, count),
    ]);
    packet!(batch, cmd::MULTISAMPLE, 0, [dw1, positions])
}

/// 3DSTATE_SAMPLE_MASK enabling every sample
pub fn emit_sample_mask(batch: &mut BatchBuffer, num_samples: u32) -> Result<()> {
    let mask = if num_samples > 1 {
        (1 << num_samples) - 1
    } else {
        1
    };
    packet!(batch, cmd::SAMPLE_MASK, 0, [mask])
}

/// STATE_BASE_ADDRESS
///
/// Surface and dynamic state live in the batch buffer itself. The
/// instruction base points at the program cache only when a program runs.
/// Every address word carries the modify-enable bit.
pub fn emit_state_base_address(
    batch: &mut BatchBuffer,
    program_cache: Option<&BufferObject>,
) -> Result<()> {
    let batch_bo = batch.bo();

    batch.begin(cmd::STATE_BASE_ADDRESS.len)?;
    batch.emit(cmd::STATE_BASE_ADDRESS.header(0));
    // General state, MOCS 0
    batch.emit(1);
    // Surface state
    batch.emit_reloc(&batch_bo, GemDomain::SAMPLER, GemDomain::empty(), 1);
    // Dynamic state
    batch.emit_reloc(
        &batch_bo,
        GemDomain::RENDER | GemDomain::INSTRUCTION,
        GemDomain::empty(),
        1,
    );
    // Indirect object
    batch.emit(1);
    // Instruction
    match program_cache {
        Some(cache) => batch.emit_reloc(cache, GemDomain::INSTRUCTION, GemDomain::empty(), 1),
        None => batch.emit(1),
    }
    // Upper bounds. The dynamic bound must be real or sampler border color
    // pointers are rejected.
    batch.emit(1);
    batch.emit(0xfffff001);
    batch.emit(1);
    batch.emit(1);
    batch.end();
    Ok(())
}

/// 3DSTATE_URB giving the whole URB to the VS
///
/// The VS is disabled but the clipper still reads VUEs from the URB.
pub fn emit_urb_config(batch: &mut BatchBuffer, device: &DeviceInfo) -> Result<()> {
    let dw1 = pack(&[(urb1::VS_ENTRIES, device.max_vs_entries)]);
    packet!(batch, cmd::URB, 0, [dw1, 0])
}
