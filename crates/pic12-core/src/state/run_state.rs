//! Reset causes and the running/asleep state machine.

use super::registers::{
    FSR, FSR_FIXED_BITS, PCL, STATUS, STATUS_GPWUF, STATUS_PAGE_MASK, STATUS_POR, STATUS_TO,
};
use super::{Cpu, RESET_VECTOR, TRIS_RESET};
use crate::state::option_reg::OptionReg;
use crate::trace::TraceEvent;

/// Execution state of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CpuState {
    /// Fetching and executing one instruction per cycle.
    #[default]
    Running,
    /// Suspended by SLEEP; only cycle bookkeeping and the watchdog advance.
    Asleep,
}

/// Observable cause of the most recent reset, each with its own STATUS
/// signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ResetCause {
    /// Initial power-up state.
    PowerOn,
    /// MCLR pin transition while running.
    MclrNormal,
    /// MCLR pin transition while asleep.
    MclrSleep,
    /// Watchdog timeout while running.
    WdtNormal,
    /// Watchdog timeout while asleep.
    WdtSleep,
    /// Qualifying pin change while asleep with wake-on-change enabled.
    WakePin,
}

const STATUS_LOW3: u8 = 0b0000_0111;
const STATUS_LOW4: u8 = 0b0000_1111;
const STATUS_LOW5: u8 = 0b0001_1111;

impl Cpu {
    /// Applies a reset in place.
    ///
    /// Every cause reinitializes OPTION, TRIS, the timing counters, and the
    /// skip/sleep latches, forces the fixed FSR bits, and rewrites STATUS
    /// with the cause's signature. All causes except [`ResetCause::WakePin`]
    /// also reload the program counter with the reset vector; a pin-change
    /// wake resumes at the instruction after SLEEP, which is where the
    /// program counter already rests.
    pub fn reset(&mut self, cause: ResetCause) {
        self.in_reset = true;
        let status = self.raw(STATUS);
        let signature = match cause {
            ResetCause::PowerOn => STATUS_POR,
            ResetCause::MclrNormal => status & STATUS_LOW5,
            ResetCause::MclrSleep => STATUS_TO | (status & STATUS_LOW3),
            ResetCause::WdtNormal => status & STATUS_LOW4,
            ResetCause::WdtSleep => status & STATUS_LOW3,
            ResetCause::WakePin => STATUS_GPWUF | STATUS_TO | (status & STATUS_LOW3),
        };
        self.set_raw(STATUS, signature);
        if cause != ResetCause::WakePin {
            self.pc = RESET_VECTOR;
            self.set_raw(PCL, 0xFF);
            self.pc_hold = true;
        }
        self.set_raw(FSR, self.raw(FSR) | FSR_FIXED_BITS);
        self.option = OptionReg::default();
        self.tris = TRIS_RESET;
        self.prescaler = 0;
        self.inhibit = 0;
        self.watchdog = 0;
        self.skip_next = false;
        self.state = CpuState::Running;
        self.last_reset = cause;
        self.in_reset = false;
        self.trace_event(TraceEvent::Reset { cause });
    }

    /// Page-select bits contributed by STATUS to `GOTO`/`CALL` targets,
    /// already shifted into program-counter bits 10:9.
    #[must_use]
    pub fn page_bits(&self) -> u16 {
        u16::from(self.raw(STATUS) & STATUS_PAGE_MASK) << 4
    }
}
