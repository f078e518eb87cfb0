//! Multi-stage register sequencer
//!
//! Panel and touch controller bring-up is an ordered list of register
//! writes, optionally interleaved with delays. Most stages are constant
//! scripts, but at least one chip family cannot continue until a value
//! written earlier has been read back, so a stage may also be a function of
//! the running sequencer state ([`StageKind::Dynamic`]).
//!
//! The sequencer aborts on the first failing write and reports the failing
//! stage index. Partially applied stages are not rolled back: hardware
//! state after a failed sequence is undefined and callers must re-run the
//! full sequence from the top (some registers are write-only latches, so
//! mid-sequence resume is not generally safe).

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::bus::{BusError, BusTransport};

/// Maximum bytes a sequence may capture via read-back
pub const CAPTURE_LEN: usize = 16;

/// One declarative sequencer operation
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeqOp {
    /// Write `data` to the register at `addr`
    Write {
        /// Register address
        addr: u32,
        /// Payload bytes
        data: &'static [u8],
    },
    /// Read `len` bytes from `addr` and append them to the capture buffer
    ReadCapture {
        /// Register address
        addr: u32,
        /// Bytes to read (at most [`CAPTURE_LEN`])
        len: usize,
    },
    /// Pause before the next operation
    DelayMs(u32),
}

/// A stage computed from the running state instead of a constant script
pub type StageFn = fn(&mut StageState, &mut dyn BusTransport) -> Result<(), BusError>;

/// How a stage produces its register traffic
#[derive(Debug)]
pub enum StageKind {
    /// Fixed list of operations
    Script(&'static [SeqOp]),
    /// Function of the state captured by earlier stages
    Dynamic(StageFn),
}

/// One bring-up stage
#[derive(Debug)]
pub struct InitStage {
    /// Short label for diagnostics
    pub name: &'static str,
    /// Stage body
    pub kind: StageKind,
}

/// State threaded through a running sequence
///
/// Holds the bytes captured by [`SeqOp::ReadCapture`], in capture order.
/// The buffer is sized for the largest read-back any variant declares;
/// bytes past [`CAPTURE_LEN`] are dropped.
#[derive(Debug, Default)]
pub struct StageState {
    captured: Vec<u8, CAPTURE_LEN>,
}

impl StageState {
    /// Fresh state with nothing captured
    pub fn new() -> Self {
        Self {
            captured: Vec::new(),
        }
    }

    /// All bytes captured so far, oldest first
    pub fn captured(&self) -> &[u8] {
        &self.captured
    }

    /// Append read-back bytes
    pub fn capture(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.captured.push(b).is_err() {
                break;
            }
        }
    }
}

/// Sequence aborted: the failing stage index plus the underlying bus error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceError {
    /// Index into the stage list where the sequence halted
    pub stage: usize,
    /// The bus error that halted it
    pub cause: BusError,
}

/// Execute `stages` in order against `bus`
///
/// Halts at the first failing write or read; later stages are never
/// touched. See the module docs for the no-rollback policy.
pub fn run_stages(
    stages: &[InitStage],
    bus: &mut dyn BusTransport,
    delay: &mut dyn DelayNs,
) -> Result<(), SequenceError> {
    let mut state = StageState::new();

    for (index, stage) in stages.iter().enumerate() {
        let result = match &stage.kind {
            StageKind::Script(ops) => run_script(ops, &mut state, bus, delay),
            StageKind::Dynamic(f) => f(&mut state, bus),
        };
        if let Err(cause) = result {
            return Err(SequenceError {
                stage: index,
                cause,
            });
        }
    }

    Ok(())
}

fn run_script(
    ops: &[SeqOp],
    state: &mut StageState,
    bus: &mut dyn BusTransport,
    delay: &mut dyn DelayNs,
) -> Result<(), BusError> {
    for op in ops {
        match *op {
            SeqOp::Write { addr, data } => bus.write(addr, data)?,
            SeqOp::ReadCapture { addr, len } => {
                let mut buf = [0u8; CAPTURE_LEN];
                let len = len.min(CAPTURE_LEN);
                bus.read(addr, &mut buf[..len])?;
                state.capture(&buf[..len]);
            }
            SeqOp::DelayMs(ms) => delay.delay_ms(ms),
        }
    }
    Ok(())
}
