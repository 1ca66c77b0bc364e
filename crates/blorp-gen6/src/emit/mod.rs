//! # Per-Stage Emitters
//!
//! Each emitter turns parameters and device limits into packets, state
//! blocks and relocations in the batch it is handed. None of them keep
//! state between calls.

use blorp_batch::BatchBuffer;
use blorp_core::Result;

use crate::cmd::Command;

/// Emit `$cmd` with header `$flags` followed by a literal body
///
/// A body whose word count disagrees with the command table fails to
/// build.
macro_rules! packet {
    ($batch:expr, $cmd:expr, $flags:expr, [$($word:expr),+ $(,)?] $(,)?) => {{
        static_assertions::const_assert_eq!($cmd.len, 1 + [$(stringify!($word)),+].len());
        $crate::emit::packet_words($batch, $cmd, $flags, [$($word),+])
    }};
}

pub mod cc;
pub mod depth;
pub mod draw;
pub mod flush;
pub mod pipeline;
pub mod stages;
pub mod vertex;
pub mod wm_state;

/// Emit `cmd` with header `flags` followed by `body`
///
/// Callers with a literal body go through `packet!`; a computed body must
/// be sized from the command table.
pub(crate) fn packet_words<const N: usize>(
    batch: &mut BatchBuffer,
    cmd: Command,
    flags: u32,
    body: [u32; N],
) -> Result<()> {
    batch.begin(cmd.len)?;
    batch.emit(cmd.header(flags));
    for word in body {
        batch.emit(word);
    }
    batch.end();
    Ok(())
}

/// An all-zero packet
pub(crate) fn zero_packet(batch: &mut BatchBuffer, cmd: Command) -> Result<()> {
    batch.begin(cmd.len)?;
    batch.emit(cmd.header(0));
    for _ in 1..cmd.len {
        batch.emit(0);
    }
    batch.end();
    Ok(())
}
