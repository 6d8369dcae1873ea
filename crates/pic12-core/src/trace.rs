//! Deterministic trace events emitted at cycle boundaries.

use crate::encoding::Op;
use crate::state::run_state::ResetCause;

/// One observable event per instruction cycle or reset, emitted only when a
/// sink is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TraceEvent {
    /// An instruction was decoded and executed.
    Executed {
        /// Fetch address of the instruction.
        pc: u16,
        /// Decoded instruction.
        op: Op,
    },
    /// The cycle was consumed by a pending skip.
    Skipped {
        /// Fetch address of the skipped word.
        pc: u16,
        /// The raw word that was skipped.
        word: u16,
    },
    /// The fetched word matched no opcode pattern.
    Illegal {
        /// Fetch address of the offending word.
        pc: u16,
        /// The raw word.
        word: u16,
    },
    /// A reset was applied.
    Reset {
        /// Reset cause.
        cause: ResetCause,
    },
}

/// Sink trait for per-cycle trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}
