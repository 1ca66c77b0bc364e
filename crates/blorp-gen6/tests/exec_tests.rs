//! Integration tests for Gen6Blorp using a recording submitter.
//!
//! Each test runs one or more complete operations, submits the batch and
//! inspects the decoded command stream and the state it points at.

use arrayvec::ArrayVec;
use blorp_batch::{BatchBuffer, BatchSubmitter, CommittedBatch, Packet, MI_BATCH_BUFFER_END};
use blorp_core::{BatchConfig, BufferObject, ByteSize, Error, GpuAddr, Result};
use blorp_gen6::cmd;
use blorp_gen6::regs::{depth1, depth3, depth4, ds2, surf2, surftype, wm6};
use blorp_gen6::{
    BlorpParams, DepthFormat, DepthInfo, DeviceInfo, Gen6Blorp, HizBuffer, HizLayout, HizOp,
    PixelFormat, SurfaceInfo, TextureTarget, Tiling, WmParams, WmProgData, WmProgram,
    WmProgramSource, WmPushConstants,
};

const BATCH_ADDR: u64 = 0x10_0000;

/// Submitter that keeps every batch it is handed.
#[derive(Debug, Default)]
struct RecordingSubmitter {
    batches: Vec<CommittedBatch>,
}

impl BatchSubmitter for RecordingSubmitter {
    fn submit(&mut self, batch: CommittedBatch) -> Result<()> {
        self.batches.push(batch);
        Ok(())
    }
}

/// Program source that counts lookups.
#[derive(Debug)]
struct CountingPrograms {
    program: WmProgram,
    calls: usize,
}

impl CountingPrograms {
    fn new() -> Self {
        Self {
            program: WmProgram {
                kernel_offset: 0x800,
                prog_data: WmProgData {
                    first_curbe_grf: 2,
                    persample_msaa_dispatch: false,
                },
            },
            calls: 0,
        }
    }
}

impl WmProgramSource for CountingPrograms {
    fn wm_program(&mut self, _params: &BlorpParams) -> Result<WmProgram> {
        self.calls += 1;
        Ok(self.program)
    }
}

fn blorp_with(batch_size: ByteSize) -> Gen6Blorp {
    let bo = BufferObject::new(1, GpuAddr::new(BATCH_ADDR), ByteSize::KIB_4, "batch");
    let wa = BufferObject::new(9, GpuAddr::new(0x7000), ByteSize::KIB_4, "workaround");
    Gen6Blorp::new(
        DeviceInfo::gt2(),
        BatchBuffer::new(bo, BatchConfig::with_size(batch_size)),
        wa,
    )
}

fn blorp() -> Gen6Blorp {
    blorp_with(ByteSize::KIB_4)
}

fn dst(width: u32, height: u32) -> SurfaceInfo {
    let bo = BufferObject::new(2, GpuAddr::new(0x20_0000), ByteSize::from_kib(256), "dst");
    SurfaceInfo::new(bo, width, height, width * 4, PixelFormat::Rgba8)
}

fn wm_params() -> WmParams {
    WmParams {
        program_cache: BufferObject::new(
            3,
            GpuAddr::new(0x30_0000),
            ByteSize::from_kib(64),
            "program cache",
        ),
        push_consts: WmPushConstants {
            dst_x1: 64,
            dst_y1: 64,
            ..WmPushConstants::default()
        },
    }
}

fn depth(target: TextureTarget, depth0: u32) -> DepthInfo {
    DepthInfo {
        bo: BufferObject::new(5, GpuAddr::new(0x50_0000), ByteSize::from_kib(512), "depth"),
        pitch: 256,
        format: DepthFormat::D24UnormX8,
        target,
        logical_width0: 64,
        logical_height0: 64,
        logical_depth0: depth0,
        first_level: 0,
        level: 0,
        layer: 0,
        width: 64,
        height: 64,
        clear_value: 0x3f80_0000,
        hiz: HizBuffer {
            bo: BufferObject::new(6, GpuAddr::new(0x60_0000), ByteSize::from_kib(64), "hiz"),
            pitch: 128,
            tiling: Tiling::Y,
            cpp: 1,
            layout: HizLayout::AllLodInEachSlice,
            level_origins: ArrayVec::new(),
        },
    }
}

fn depth_op(hiz_op: HizOp, info: DepthInfo) -> BlorpParams {
    let mut params = BlorpParams::new(dst(64, 64), 0, 0, 64, 64);
    params.hiz_op = hiz_op;
    params.depth = Some(info);
    params
}

fn submit_one(blorp: &mut Gen6Blorp, params: &BlorpParams) -> CommittedBatch {
    let mut programs = CountingPrograms::new();
    let mut submitter = RecordingSubmitter::default();
    blorp
        .run(params, &mut programs, &mut submitter)
        .expect("operation fits");
    blorp.flush(&mut submitter).expect("submitted");
    assert_eq!(submitter.batches.len(), 1);
    submitter.batches.remove(0)
}

fn names(batch: &CommittedBatch) -> Vec<&'static str> {
    batch
        .packets()
        .filter(|p| p.header() != MI_BATCH_BUFFER_END)
        .map(|p| cmd::name_of(p.opcode()))
        .collect()
}

fn find<'a>(batch: &'a CommittedBatch, command: cmd::Command) -> Packet<'a> {
    batch
        .packets()
        .find(|p| p.opcode() == command.opcode)
        .unwrap_or_else(|| panic!("{} not emitted", command.name))
}

// =============================================================================
// END TO END
// =============================================================================

#[test]
fn test_program_op_packet_order() {
    let mut blorp = blorp();
    let mut params = BlorpParams::new(dst(64, 64), 0, 0, 64, 64);
    params.wm = Some(wm_params());
    let batch = submit_one(&mut blorp, &params);

    assert_eq!(
        names(&batch),
        [
            "PIPE_CONTROL",
            "PIPE_CONTROL",
            "3DSTATE_MULTISAMPLE",
            "3DSTATE_SAMPLE_MASK",
            "STATE_BASE_ADDRESS",
            "3DSTATE_VERTEX_BUFFERS",
            "3DSTATE_VERTEX_ELEMENTS",
            "3DSTATE_URB",
            "3DSTATE_CC_STATE_POINTERS",
            "3DSTATE_SAMPLER_STATE_POINTERS",
            "3DSTATE_CONSTANT_VS",
            "3DSTATE_VS",
            "3DSTATE_CONSTANT_GS",
            "3DSTATE_GS",
            "3DSTATE_CLIP",
            "3DSTATE_SF",
            "3DSTATE_CONSTANT_PS",
            "3DSTATE_WM",
            "3DSTATE_BINDING_TABLE_POINTERS",
            "3DSTATE_VIEWPORT_STATE_POINTERS",
            "PIPE_CONTROL",
            "PIPE_CONTROL",
            "PIPE_CONTROL",
            "3DSTATE_DEPTH_BUFFER",
            "3DSTATE_HIER_DEPTH_BUFFER",
            "3DSTATE_STENCIL_BUFFER",
            "3DSTATE_CLEAR_PARAMS",
            "3DSTATE_DRAWING_RECTANGLE",
            "3DPRIMITIVE",
        ]
    );
    assert_eq!(batch.used_bytes % 8, 0);
}

#[test]
fn test_rectangle_vertices_and_draw() {
    let mut blorp = blorp();
    let mut params = BlorpParams::new(dst(64, 64), 0, 0, 64, 64);
    params.wm = Some(wm_params());
    let batch = submit_one(&mut blorp, &params);

    let vb = find(&batch, cmd::VERTEX_BUFFERS);
    let vertices = vb.dw(2) - BATCH_ADDR as u32;
    assert_eq!(vb.dw(3) - vb.dw(2), 95);

    // Position is the second half of each 8-float VUE
    let position = |vertex: u32, component: u32| {
        f32::from_bits(batch.word_at(vertices + vertex * 32 + 16 + component * 4))
    };
    assert_eq!((position(0, 0), position(0, 1)), (0.0, 64.0));
    assert_eq!((position(1, 0), position(1, 1)), (64.0, 64.0));
    assert_eq!((position(2, 0), position(2, 1)), (0.0, 0.0));
    assert_eq!(position(2, 3), 1.0);

    let prim = find(&batch, cmd::PRIMITIVE);
    assert_eq!(prim.dw(1), 3);
    assert_eq!(prim.dw(3), 1);

    let rect = find(&batch, cmd::DRAWING_RECTANGLE);
    assert_eq!(rect.dw(2), 63 | 63 << 16);
}

#[test]
fn test_program_op_uses_program_cache() {
    let mut blorp = blorp();
    let mut params = BlorpParams::new(dst(64, 64), 0, 0, 64, 64);
    params.wm = Some(wm_params());

    let mut programs = CountingPrograms::new();
    let mut submitter = RecordingSubmitter::default();
    blorp.run(&params, &mut programs, &mut submitter).expect("fits");
    blorp.flush(&mut submitter).expect("submitted");
    assert_eq!(programs.calls, 1);

    let batch = &submitter.batches[0];
    let sba = find(batch, cmd::STATE_BASE_ADDRESS);
    assert_eq!(sba.dw(5), 0x30_0000 | 1);
    assert_eq!(find(batch, cmd::WM).dw(1), 0x800);
    assert!(batch.verify_relocations());
}

#[test]
fn test_blit_binds_source_texture() {
    let mut blorp = blorp();
    let src_bo = BufferObject::new(7, GpuAddr::new(0x70_0000), ByteSize::from_kib(256), "src");
    let mut params = BlorpParams::new(dst(64, 64), 0, 0, 64, 64);
    params.src = Some(SurfaceInfo::new(src_bo, 64, 64, 256, PixelFormat::Rgba8));
    params.wm = Some(wm_params());
    let batch = submit_one(&mut blorp, &params);

    let table = find(&batch, cmd::BINDING_TABLE_POINTERS).dw(3);
    let texture = batch.word_at(table + 4);
    assert_ne!(texture, 0);
    assert_eq!(batch.word_at(texture + 4), 0x70_0000);

    let reloc = batch.relocation_at(texture + 4).expect("texture address reloc");
    assert!(reloc.write_domain.is_empty());
    assert!(batch.verify_relocations());
}

// =============================================================================
// DEPTH
// =============================================================================

#[test]
fn test_null_depth_without_depth_target() {
    let mut blorp = blorp();
    let mut params = BlorpParams::new(dst(64, 64), 0, 0, 64, 64);
    params.wm = Some(wm_params());
    let batch = submit_one(&mut blorp, &params);

    let db = find(&batch, cmd::DEPTH_BUFFER);
    assert_eq!(depth1::TYPE.extract(db.dw(1)), surftype::SURFACE_NULL);
    assert!((2..7).all(|i| db.dw(i) == 0));
    assert!(find(&batch, cmd::HIER_DEPTH_BUFFER).words[1..].iter().all(|&w| w == 0));
    assert!(find(&batch, cmd::STENCIL_BUFFER).words[1..].iter().all(|&w| w == 0));
    assert_eq!(find(&batch, cmd::CLEAR_PARAMS).words, [0x7910_8000, 0]);
}

#[test]
fn test_depth_resolve_and_clear_state() {
    let mut blorp = blorp();
    let resolve = submit_one(&mut blorp, &depth_op(HizOp::DepthResolve, depth(TextureTarget::Tex2D, 1)));
    let clear = submit_one(&mut blorp, &depth_op(HizOp::DepthClear, depth(TextureTarget::Tex2D, 1)));

    let ds_word = |batch: &CommittedBatch| {
        let ptr = find(batch, cmd::CC_STATE_POINTERS).dw(2);
        batch.word_at((ptr & !1) + 8)
    };

    let word = ds_word(&resolve);
    assert_eq!(ds2::DEPTH_TEST_ENABLE.extract(word), 1);
    assert_eq!(ds2::DEPTH_TEST_FUNC.extract(word), ds2::COMPAREFUNCTION_NEVER);
    assert_eq!(ds_word(&clear), 1 << 26);

    // Depth-only operations dispatch no pixel threads
    let wm = find(&clear, cmd::WM);
    assert_eq!(wm.dw(1), 0);
    assert_eq!(wm.dw(4), 1 << 30);
    assert_eq!(find(&clear, cmd::CLEAR_PARAMS).dw(1), 0x3f80_0000);
    assert!(!names(&clear).contains(&"3DSTATE_BINDING_TABLE_POINTERS"));
}

#[test]
fn test_cube_depth_programmed_as_2d_array() {
    let mut blorp = blorp();
    let mut info = depth(TextureTarget::Cube, 1);
    info.layer = 3;
    let batch = submit_one(&mut blorp, &depth_op(HizOp::HizResolve, info));

    let db = find(&batch, cmd::DEPTH_BUFFER);
    assert_eq!(depth1::TYPE.extract(db.dw(1)), surftype::SURFACE_2D);
    assert_eq!(depth1::FORMAT.extract(db.dw(1)), 3);
    assert_eq!(db.dw(2), 0x50_0000);
    assert_eq!(depth3::WIDTH.extract(db.dw(3)), 63);
    assert_eq!(depth4::DEPTH.extract(db.dw(4)), 5);
    assert_eq!(depth4::MIN_ARRAY_ELEMENT.extract(db.dw(4)), 3);

    let hiz = find(&batch, cmd::HIER_DEPTH_BUFFER);
    assert_eq!(hiz.dw(1), 127);
    assert_eq!(hiz.dw(2), 0x60_0000);
    assert!(batch.verify_relocations());
}

// =============================================================================
// MULTISAMPLING
// =============================================================================

#[test]
fn test_msaa_destination_halves_surface_size() {
    let mut blorp = blorp();
    let mut params = BlorpParams::new(dst(128, 64).with_samples(4), 0, 0, 128, 64);
    params.wm = Some(wm_params());
    let batch = submit_one(&mut blorp, &params);

    let table = find(&batch, cmd::BINDING_TABLE_POINTERS).dw(3);
    let surface = batch.word_at(table);
    let dw2 = batch.word_at(surface + 8);
    assert_eq!(surf2::WIDTH.extract(dw2), 63);
    assert_eq!(surf2::HEIGHT.extract(dw2), 31);

    assert_eq!(find(&batch, cmd::MULTISAMPLE).dw(1), 2 << 1);
    assert_eq!(find(&batch, cmd::SAMPLE_MASK).dw(1), 0xf);
    let wm = find(&batch, cmd::WM);
    assert_eq!(wm6::MSRAST_MODE.extract(wm.dw(6)), wm6::MSRAST_ON_PATTERN);
}

// =============================================================================
// FAILURE AND RETRY
// =============================================================================

#[test]
fn test_full_batch_is_flushed_and_retried() {
    let mut blorp = blorp_with(ByteSize::from_kib(1));
    let mut programs = CountingPrograms::new();
    let mut submitter = RecordingSubmitter::default();
    let params = BlorpParams::new(dst(64, 64), 0, 0, 64, 64);

    blorp.run(&params, &mut programs, &mut submitter).expect("first fits");
    assert!(submitter.batches.is_empty());

    blorp.run(&params, &mut programs, &mut submitter).expect("retried");
    assert_eq!(submitter.batches.len(), 1);
    assert_eq!(blorp.batch().stats().rollbacks, 1);

    blorp.flush(&mut submitter).expect("submitted");
    assert_eq!(submitter.batches.len(), 2);
    for batch in &submitter.batches {
        let draws = names(batch).iter().filter(|&&n| n == "3DPRIMITIVE").count();
        assert_eq!(draws, 1);
        assert!(batch.verify_relocations());
    }
}

#[test]
fn test_operation_larger_than_batch_fails_cleanly() {
    let mut blorp = blorp_with(ByteSize::from_bytes(512));
    let mut programs = CountingPrograms::new();
    let mut submitter = RecordingSubmitter::default();
    let params = BlorpParams::new(dst(64, 64), 0, 0, 64, 64);

    let err = blorp
        .run(&params, &mut programs, &mut submitter)
        .expect_err("cannot fit");
    assert!(err.is_retryable());
    assert!(blorp.batch().is_empty());
    assert!(submitter.batches.is_empty());
}

#[test]
fn test_invalid_params_emit_nothing() {
    let mut blorp = blorp();
    let mut programs = CountingPrograms::new();
    let mut submitter = RecordingSubmitter::default();

    let mut params = BlorpParams::new(dst(64, 64), 0, 0, 64, 64);
    blorp.run(&params, &mut programs, &mut submitter).expect("valid");
    let used = blorp.batch().used_words();

    params.num_layers = 0;
    assert_eq!(
        blorp.run(&params, &mut programs, &mut submitter),
        Err(Error::InvalidParameter("zero layers"))
    );

    let eight = BlorpParams::new(dst(64, 64).with_samples(8), 0, 0, 64, 64);
    assert_eq!(
        blorp.run(&eight, &mut programs, &mut submitter),
        Err(Error::NotSupported("sample count"))
    );

    assert_eq!(blorp.batch().used_words(), used);
    assert_eq!(programs.calls, 0);
    assert!(submitter.batches.is_empty());
}

#[test]
fn test_unprogrammable_layout_rejected_before_emission() {
    let mut blorp = blorp();
    let mut programs = CountingPrograms::new();
    let mut submitter = RecordingSubmitter::default();

    let mut info = depth(TextureTarget::Tex2D, 1);
    info.hiz.layout = HizLayout::AllSlicesAtEachLod;
    info.hiz.level_origins.push((0, 0));
    info.hiz.cpp = 0;
    assert_eq!(
        blorp.run(&depth_op(HizOp::DepthResolve, info), &mut programs, &mut submitter),
        Err(Error::InvalidParameter("HiZ cpp"))
    );

    let cube = depth(TextureTarget::Cube, u32::MAX / 2);
    assert_eq!(
        blorp.run(&depth_op(HizOp::HizResolve, cube), &mut programs, &mut submitter),
        Err(Error::InvalidParameter("depth layer count"))
    );

    let odd = dst(64, 64).with_tiling(Tiling::X).with_offset(6, 0);
    assert_eq!(
        blorp.run(&BlorpParams::new(odd, 0, 0, 64, 64), &mut programs, &mut submitter),
        Err(Error::InvalidParameter("surface offset alignment"))
    );

    assert_eq!(blorp.batch().used_words(), 0);
    assert!(submitter.batches.is_empty());
}

#[test]
fn test_flush_of_empty_batch_submits_nothing() {
    let mut blorp = blorp();
    let mut submitter = RecordingSubmitter::default();
    blorp.flush(&mut submitter).expect("nothing to do");
    assert!(submitter.batches.is_empty());
}
