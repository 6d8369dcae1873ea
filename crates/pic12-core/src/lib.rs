//! Instruction-cycle emulator core for a PIC12F508-class baseline 12-bit
//! microcontroller: 512 words of program memory, a 32-byte register file
//! with special-function addressing quirks, Timer0/watchdog timing behind a
//! shared prescaler, sleep and five distinct reset causes, and a 6-pin GPIO
//! port with reset and wake-on-change side effects.

/// Configuration word fused at load time.
pub mod config;
pub use config::{
    ConfigWord, Oscillator, CONFIG_CP_DISABLE, CONFIG_FOSC_MASK, CONFIG_MCLRE, CONFIG_WDTE,
};

/// Instruction word classification and rendering.
pub mod encoding;
pub use encoding::{decode, Op};

/// Architectural CPU state: register file, OPTION, reset/sleep machinery.
pub mod state;
pub use state::option_reg::{
    OptionReg, OPTION_GPPU, OPTION_GPWU, OPTION_PSA, OPTION_PS_MASK, OPTION_T0CS, OPTION_T0SE,
};
pub use state::registers::{
    FSR, FSR_FIXED_BITS, GPIO, INDF, OSCCAL, PCL, REGISTER_COUNT, STATUS, STATUS_C, STATUS_DC,
    STATUS_GPWUF, STATUS_PAGE_MASK, STATUS_PD, STATUS_POR, STATUS_TO, STATUS_Z,
    TMR0, TMR0_WRITE_INHIBIT,
};
pub use state::run_state::{CpuState, ResetCause};
pub use state::{
    Cpu, FETCH_MASK, OSCCAL_POR, PC_MASK, PROGRAM_WORDS, RESET_VECTOR, STACK_DEPTH, TRIS_RESET,
};

/// Instruction-cycle execution pipeline.
pub mod execute;

/// Prescaler / Timer0 / watchdog per-cycle update.
pub mod timing;
pub use timing::WDT_BASE_PERIOD;

/// GPIO pin model and external-circuit hooks.
pub mod gpio;
pub use gpio::{
    PinHook, GP0, GP1, GP2, GP3, GP4, GP5, PORT_MASK, WAKE_PIN_MASK,
};

/// Trace event surface.
pub mod trace;
pub use trace::{TraceEvent, TraceSink};

/// Intel-HEX firmware image loading.
pub mod loader;
pub use loader::{load_hex_file, parse_hex, Firmware, LoadError, CONFIG_BYTE_OFFSET};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
