//! # Shader Stages
//!
//! VS and GS are switched off, the clipper only passes the rectangle
//! through, and the WM is configured in full whether or not a program runs.

use blorp_batch::BatchBuffer;
use blorp_core::Result;

use crate::cmd;
use crate::device::DeviceInfo;
use crate::pack::pack;
use crate::params::{BlorpParams, HizOp, NUM_PUSH_CONST_REGS};
use crate::program::WmProgram;
use crate::regs::{clip2, pointers, sf1, sf3, wm2, wm4, wm5, wm6};

/// Disable VS push constants and the VS itself.
///
/// Toggling the VS needs a CS stall with post-sync write beforehand, which
/// the operation's leading flush provides.
pub fn emit_vs_disable(batch: &mut BatchBuffer) -> Result<()> {
    super::zero_packet(batch, cmd::CONSTANT_VS)?;
    super::zero_packet(batch, cmd::VS)
}

/// Disable GS push constants and the GS itself
pub fn emit_gs_disable(batch: &mut BatchBuffer) -> Result<()> {
    super::zero_packet(batch, cmd::CONSTANT_GS)?;
    super::zero_packet(batch, cmd::GS)
}

/// 3DSTATE_CLIP
///
/// RECTLIST needs the clipper out of normal mode; all-zero leaves it
/// disabled. Perspective divide is skipped as well.
pub fn emit_clip_disable(batch: &mut BatchBuffer) -> Result<()> {
    let dw2 = pack(&[(clip2::PERSPECTIVE_DIVIDE_DISABLE, 1)]);
    packet!(batch, cmd::CLIP, 0, [0, dw2, 0])
}

/// 3DSTATE_SF
///
/// Viewport transform off and solid fill, both required for RECTLIST.
pub fn emit_sf_config(batch: &mut BatchBuffer, params: &BlorpParams) -> Result<()> {
    let mut body = [0u32; cmd::SF.len - 1];
    body[0] = pack(&[
        (sf1::NUM_OUTPUTS, params.num_varyings),
        (sf1::URB_ENTRY_READ_LENGTH, sf1::READ_LENGTH),
        (sf1::URB_ENTRY_READ_OFFSET, sf1::READ_OFFSET),
    ]);
    if params.dst.is_multisampled() {
        body[2] = pack(&[(sf3::MSRAST_MODE, sf3::MSRAST_ON_PATTERN)]);
    }
    super::packet_words(batch, cmd::SF, 0, body)
}

/// 3DSTATE_CONSTANT_PS pointing buffer 0 at the push constants
pub fn emit_constant_ps(batch: &mut BatchBuffer, push_const_offset: u32) -> Result<()> {
    packet!(
        batch,
        cmd::CONSTANT_PS,
        pointers::CONSTANT_BUFFER_0_ENABLE,
        [push_const_offset + (NUM_PUSH_CONST_REGS - 1), 0, 0, 0],
    )
}

/// 3DSTATE_CONSTANT_PS with every buffer off
pub fn emit_constant_ps_disable(batch: &mut BatchBuffer) -> Result<()> {
    super::zero_packet(batch, cmd::CONSTANT_PS)
}

/// 3DSTATE_WM
///
/// Max threads is programmed even without a program; zero hangs the GPU.
pub fn emit_wm_config(
    batch: &mut BatchBuffer,
    device: &DeviceInfo,
    params: &BlorpParams,
    program: Option<&WmProgram>,
) -> Result<()> {
    assert!(device.max_wm_threads > 0, "device reports zero WM threads");

    let hiz = match params.hiz_op {
        HizOp::None => None,
        HizOp::DepthClear => Some(wm4::DEPTH_CLEAR),
        HizOp::DepthResolve => Some(wm4::DEPTH_RESOLVE),
        HizOp::HizResolve => Some(wm4::HIZ_RESOLVE),
    };
    let mut dw4 = hiz.map_or(0, |field| pack(&[(field, 1)]));

    let mut dw5 = pack(&[
        (wm5::LINE_AA_WIDTH, wm5::LINE_AA_WIDTH_1_0),
        (wm5::LINE_END_CAP_AA_WIDTH, wm5::LINE_END_CAP_AA_WIDTH_0_5),
        (wm5::MAX_THREADS, device.max_wm_threads - 1),
    ]);

    let kernel = program.map_or(0, |p| p.kernel_offset);
    let mut dw2 = 0;
    if let Some(program) = program {
        dw2 |= pack(&[(wm2::SAMPLER_COUNT, wm2::SAMPLER_COUNT_1_4)]);
        dw4 |= pack(&[(wm4::DISPATCH_START_GRF_0, program.prog_data.first_curbe_grf)]);
        dw5 |= pack(&[
            (wm5::DISPATCH_16, 1),
            (wm5::KILL_ENABLE, 1),
            (wm5::DISPATCH_ENABLE, 1),
        ]);
    }

    // No barycentric interpolation and no SF inputs.
    let dw6 = if params.dst.is_multisampled() {
        let persample = program.map_or(false, |p| p.prog_data.persample_msaa_dispatch);
        pack(&[
            (wm6::MSRAST_MODE, wm6::MSRAST_ON_PATTERN),
            (
                wm6::MSDISPMODE,
                if persample {
                    wm6::MSDISPMODE_PERSAMPLE
                } else {
                    wm6::MSDISPMODE_PERPIXEL
                },
            ),
        ])
    } else {
        pack(&[
            (wm6::MSRAST_MODE, wm6::MSRAST_OFF_PIXEL),
            (wm6::MSDISPMODE, wm6::MSDISPMODE_PERSAMPLE),
        ])
    };

    // No scratch space and no other kernels.
    packet!(batch, cmd::WM, 0, [kernel, dw2, 0, dw4, dw5, dw6, 0, 0])
}

/// 3DSTATE_BINDING_TABLE_POINTERS, PS table only
pub fn emit_binding_table_pointers(batch: &mut BatchBuffer, binding_table_offset: u32) -> Result<()> {
    packet!(
        batch,
        cmd::BINDING_TABLE_POINTERS,
        pointers::BINDING_TABLE_MODIFY_PS,
        [0, 0, binding_table_offset],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::testing;
    use crate::program::WmProgData;

    fn params() -> BlorpParams {
        BlorpParams::new(testing::surface(2, 0x20_0000, 64, 64), 0, 0, 64, 64)
    }

    #[test]
    fn test_vs_gs_disable_are_all_zero() {
        let mut batch = testing::batch();
        emit_vs_disable(&mut batch).expect("space");
        emit_gs_disable(&mut batch).expect("space");

        let pkts = testing::emitted(&batch);
        let lens: alloc::vec::Vec<usize> = pkts.iter().map(|p| p.len()).collect();
        assert_eq!(lens, [5, 6, 5, 7]);
        assert!(pkts.iter().all(|p| p[1..].iter().all(|&w| w == 0)));
        assert_eq!(pkts[3][0], 0x7811_0005);
    }

    #[test]
    fn test_clip_and_sf() {
        let mut batch = testing::batch();
        let mut params = params();
        params.num_varyings = 2;
        emit_clip_disable(&mut batch).expect("space");
        emit_sf_config(&mut batch, &params).expect("space");

        let pkts = testing::emitted(&batch);
        assert_eq!(pkts[0], [0x7812_0002, 0, 1 << 9, 0]);
        assert_eq!(pkts[1].len(), 20);
        assert_eq!(pkts[1][1], 2 << 22 | 1 << 11 | 1 << 4);
        assert_eq!(pkts[1][3], 0);
    }

    #[test]
    fn test_sf_msaa_on_pattern() {
        let mut batch = testing::batch();
        let mut params = params();
        params.dst = params.dst.with_samples(4);
        emit_sf_config(&mut batch, &params).expect("space");
        assert_eq!(testing::emitted(&batch)[0][3], 3 << 18);
    }

    #[test]
    fn test_constant_ps_enable() {
        let mut batch = testing::batch();
        emit_constant_ps(&mut batch, 0xf80).expect("space");
        emit_constant_ps_disable(&mut batch).expect("space");

        let pkts = testing::emitted(&batch);
        assert_eq!(pkts[0], [0x7817_1003, 0xf81, 0, 0, 0]);
        assert_eq!(pkts[1], [0x7817_0003, 0, 0, 0, 0]);
    }

    #[test]
    fn test_wm_without_program_keeps_thread_count() {
        let mut batch = testing::batch();
        let mut params = params();
        params.hiz_op = HizOp::DepthClear;
        emit_wm_config(&mut batch, &DeviceInfo::gt1(), &params, None).expect("space");

        let wm = &testing::emitted(&batch)[0];
        assert_eq!(wm.len(), 9);
        assert_eq!(wm[1], 0);
        assert_eq!(wm[2], 0);
        assert_eq!(wm[4], 1 << 30);
        assert_eq!(wm5::MAX_THREADS.extract(wm[5]), 39);
        assert_eq!(wm5::DISPATCH_ENABLE.extract(wm[5]), 0);
        assert_eq!(wm[6], 0);
    }

    #[test]
    fn test_wm_with_program_msaa() {
        let mut batch = testing::batch();
        let mut params = params();
        params.dst = params.dst.with_samples(4);
        let program = WmProgram {
            kernel_offset: 0x440,
            prog_data: WmProgData {
                first_curbe_grf: 2,
                persample_msaa_dispatch: false,
            },
        };
        emit_wm_config(&mut batch, &DeviceInfo::gt2(), &params, Some(&program)).expect("space");

        let wm = &testing::emitted(&batch)[0];
        assert_eq!(wm[1], 0x440);
        assert_eq!(wm[2], 1 << 27);
        assert_eq!(wm[4], 2 << 16);
        assert_eq!(wm[5], 1 << 14 | 79 << 25 | 1 << 1 | 1 << 22 | 1 << 19);
        assert_eq!(wm[6], 3 << 1 | 1);
    }

    #[test]
    #[should_panic(expected = "zero WM threads")]
    fn test_zero_threads_panics() {
        let mut batch = testing::batch();
        let device = DeviceInfo {
            max_wm_threads: 0,
            ..DeviceInfo::gt1()
        };
        let _ = emit_wm_config(&mut batch, &device, &params(), None);
    }

    #[test]
    fn test_binding_table_pointers() {
        let mut batch = testing::batch();
        emit_binding_table_pointers(&mut batch, 0xfe0).expect("space");
        assert_eq!(testing::emitted(&batch)[0], [0x7801_1002, 0, 0, 0xfe0]);
    }
}
