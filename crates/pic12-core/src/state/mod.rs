//! Architectural CPU state aggregate.

/// OPTION register view.
pub mod option_reg;
/// Register-file addressing semantics.
pub mod registers;
/// Reset causes and the running/asleep state machine.
pub mod run_state;

use crate::config::ConfigWord;
use crate::gpio::PinHook;
use crate::loader::Firmware;
use crate::trace::{TraceEvent, TraceSink};
use option_reg::OptionReg;
use registers::{FSR, OSCCAL, PCL, REGISTER_COUNT, STATUS, STATUS_POR};
use run_state::{CpuState, ResetCause};

/// Program-memory size in 12-bit words.
pub const PROGRAM_WORDS: usize = 512;
/// Depth of the hardware call stack.
pub const STACK_DEPTH: usize = 2;
/// Program-counter value loaded by every full reset (top of program memory).
pub const RESET_VECTOR: u16 = 0x1FF;
/// Mask applied when fetching: the effective program counter is 9 bits.
pub const FETCH_MASK: u16 = 0x1FF;
/// Mask of the stored program counter, which keeps two extra page-select
/// bits above the fetch range for `GOTO`/`CALL` paging.
pub const PC_MASK: u16 = 0x7FF;
/// Power-on value of the oscillator-calibration register (fixed placeholder).
pub const OSCCAL_POR: u8 = 0xFE;
/// Reset value of the GPIO direction register (all pins inputs).
pub const TRIS_RESET: u8 = 0x3F;

/// Complete state of one simulated core.
///
/// The aggregate is exclusively owned by the driving host; one call to
/// [`Cpu::step`] is one atomic instruction cycle. Fields are public so tests
/// and debugger-style hosts can inspect and pre-load state directly; the
/// register array should normally be accessed through [`Cpu::register`] and
/// [`Cpu::set_register`], which apply the address-dependent semantics.
pub struct Cpu {
    /// Program memory, one 12-bit instruction word per slot.
    pub program: [u16; PROGRAM_WORDS],
    /// Raw register-file storage. Reads and writes of the special addresses
    /// are transformed; see [`Cpu::register`].
    pub regs: [u8; REGISTER_COUNT],
    /// Accumulator.
    pub w: u8,
    /// Stored program counter (11 bits live; fetch masks to 9).
    pub pc: u16,
    /// Two-level return stack, most recent call in slot 0.
    pub stack: [u16; STACK_DEPTH],
    /// GPIO direction register (1 = input). Not memory mapped.
    pub tris: u8,
    /// OPTION register. Not memory mapped.
    pub option: OptionReg,
    /// Configuration word fused at load time.
    pub config: ConfigWord,
    /// Shared prescaler counter, owned by Timer0 or the watchdog.
    pub prescaler: u32,
    /// Watchdog overflow counter.
    pub watchdog: u8,
    /// Cycles remaining in the Timer0 write-inhibit window.
    pub inhibit: u8,
    /// Monotonic instruction-cycle counter.
    pub cycles: u64,
    /// Running/asleep execution state.
    pub state: CpuState,
    /// Cause of the most recent reset.
    pub last_reset: ResetCause,
    /// Count of fetched words that matched no opcode pattern.
    pub illegal_instructions: u64,
    /// Program-counter breakpoint; `run` clears it on hit.
    pub breakpoint: Option<u16>,
    /// When set, the next cycle executes as a no-op and clears it.
    pub skip_next: bool,
    pub(crate) pc_hold: bool,
    pub(crate) in_reset: bool,
    pub(crate) pin_hook: Option<Box<dyn PinHook>>,
    pub(crate) trace: Option<Box<dyn TraceSink>>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Creates a powered-on core with empty program memory and an
    /// erased-flash configuration word.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ConfigWord::default())
    }

    /// Creates a powered-on core with the given configuration word.
    #[must_use]
    pub fn with_config(config: ConfigWord) -> Self {
        let mut cpu = Self {
            program: [0; PROGRAM_WORDS],
            regs: [0; REGISTER_COUNT],
            w: 0,
            pc: RESET_VECTOR,
            stack: [0; STACK_DEPTH],
            tris: TRIS_RESET,
            option: OptionReg::default(),
            config,
            prescaler: 0,
            watchdog: 0,
            inhibit: 0,
            cycles: 0,
            state: CpuState::Running,
            last_reset: ResetCause::PowerOn,
            illegal_instructions: 0,
            breakpoint: None,
            skip_next: false,
            pc_hold: false,
            in_reset: false,
            pin_hook: None,
            trace: None,
        };
        cpu.set_raw(PCL, 0xFF);
        cpu.set_raw(STATUS, STATUS_POR);
        cpu.set_raw(FSR, 0xE0);
        cpu.set_raw(OSCCAL, OSCCAL_POR);
        cpu
    }

    /// Creates a powered-on core with program memory filled from `words`
    /// (truncated to 12 bits each; at most [`PROGRAM_WORDS`] are used).
    #[must_use]
    pub fn from_words(words: &[u16]) -> Self {
        let mut cpu = Self::new();
        for (slot, word) in cpu.program.iter_mut().zip(words) {
            *slot = *word & 0xFFF;
        }
        cpu
    }

    /// Creates a powered-on core from a loaded firmware image.
    #[must_use]
    pub fn from_firmware(firmware: &Firmware) -> Self {
        let mut cpu = Self::with_config(firmware.config);
        cpu.program = firmware.words;
        cpu
    }

    /// STATUS register value.
    #[must_use]
    pub fn status(&self) -> u8 {
        self.raw(STATUS)
    }

    /// Returns `true` when every bit in `mask` is set in STATUS.
    #[must_use]
    pub fn status_bit(&self, mask: u8) -> bool {
        self.status() & mask == mask
    }

    pub(crate) fn set_status_bit(&mut self, mask: u8, set: bool) {
        if set {
            self.regs[usize::from(STATUS)] |= mask;
        } else {
            self.regs[usize::from(STATUS)] &= !mask;
        }
    }

    /// Returns `true` while the core is asleep.
    #[must_use]
    pub const fn sleeping(&self) -> bool {
        matches!(self.state, CpuState::Asleep)
    }

    /// Sets the program-counter breakpoint used by [`Cpu::run`].
    pub fn set_breakpoint(&mut self, address: u16) {
        self.breakpoint = Some(address & FETCH_MASK);
    }

    /// Clears any pending breakpoint.
    pub fn clear_breakpoint(&mut self) {
        self.breakpoint = None;
    }

    /// Installs an external circuit model observing and supplying pin state.
    pub fn set_pin_hook(&mut self, hook: Box<dyn PinHook>) {
        self.pin_hook = Some(hook);
    }

    /// Removes the pin hook, returning it to the caller.
    pub fn take_pin_hook(&mut self) -> Option<Box<dyn PinHook>> {
        self.pin_hook.take()
    }

    /// Installs a trace sink receiving one event per cycle boundary.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = Some(sink);
    }

    /// Removes the trace sink, returning it to the caller.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.trace.take()
    }

    pub(crate) fn trace_event(&mut self, event: TraceEvent) {
        if let Some(sink) = self.trace.as_mut() {
            sink.on_event(event);
        }
    }

    /// Runs instruction cycles until the program counter reaches the
    /// breakpoint, then clears the breakpoint.
    ///
    /// Returns immediately if no breakpoint is set; an unbounded loop with
    /// no termination condition is never entered implicitly.
    pub fn run(&mut self) {
        while let Some(target) = self.breakpoint {
            if self.pc & FETCH_MASK == target {
                self.breakpoint = None;
                break;
            }
            self.step();
        }
    }

    /// Runs exactly `cycles` instruction cycles.
    pub fn run_for(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.step();
        }
    }
}
