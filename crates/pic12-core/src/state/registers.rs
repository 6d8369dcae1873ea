//! Register-file addressing semantics.
//!
//! The register file is 32 bytes; the first seven addresses are special
//! function registers with address-dependent read/write transforms. Every
//! access, whether from an execution unit or from the host, goes through
//! [`Cpu::register`] / [`Cpu::set_register`] so the transforms live in
//! exactly one place.

use super::Cpu;

/// Number of register-file addresses.
pub const REGISTER_COUNT: usize = 32;

/// Indirect data register; accesses redirect through [`FSR`].
pub const INDF: u8 = 0x00;
/// Timer0 counter register.
pub const TMR0: u8 = 0x01;
/// Low 8 bits of the program counter.
pub const PCL: u8 = 0x02;
/// Status flags register.
pub const STATUS: u8 = 0x03;
/// File-select register: indirect-address pointer for [`INDF`].
pub const FSR: u8 = 0x04;
/// Oscillator-calibration register (fixed placeholder value).
pub const OSCCAL: u8 = 0x05;
/// GPIO port register.
pub const GPIO: u8 = 0x06;

/// `STATUS` bit: carry / not-borrow.
pub const STATUS_C: u8 = 1 << 0;
/// `STATUS` bit: digit carry (low-nibble carry / not-borrow).
pub const STATUS_DC: u8 = 1 << 1;
/// `STATUS` bit: zero result.
pub const STATUS_Z: u8 = 1 << 2;
/// `STATUS` bit: power-down (cleared by SLEEP-related resets).
pub const STATUS_PD: u8 = 1 << 3;
/// `STATUS` bit: watchdog time-out (active low).
pub const STATUS_TO: u8 = 1 << 4;
/// Mask of the page-select bits feeding `GOTO`/`CALL` bits 10:9.
pub const STATUS_PAGE_MASK: u8 = 0b0110_0000;
/// `STATUS` bit: wake-on-pin-change reset indicator.
pub const STATUS_GPWUF: u8 = 1 << 7;
/// `STATUS` value established by a power-on reset.
pub const STATUS_POR: u8 = STATUS_TO | STATUS_PD;

/// Bits of `FSR` that always read as 1 (the device has 32 file addresses).
pub const FSR_FIXED_BITS: u8 = 0xE0;
/// Cycles of prescaler/Timer0 suppression after a direct `TMR0` write,
/// counting the write's own cycle.
pub const TMR0_WRITE_INHIBIT: u8 = 3;

impl Cpu {
    pub(crate) fn raw(&self, address: u8) -> u8 {
        self.regs[usize::from(address & 0x1F)]
    }

    pub(crate) fn set_raw(&mut self, address: u8, value: u8) {
        self.regs[usize::from(address & 0x1F)] = value;
    }

    /// Reads a register, applying the address-dependent transforms:
    /// `INDF` indirects through the low 5 bits of `FSR` (an indirect access
    /// that lands back on `INDF` reads as 0), `PCL` mirrors the live program
    /// counter, `FSR` forces its top 3 bits, `GPIO` masks its top 2 bits.
    #[must_use]
    pub fn register(&self, address: u8) -> u8 {
        let address = address & 0x1F;
        match address {
            INDF => {
                let target = self.raw(FSR) & 0x1F;
                if target == INDF {
                    0
                } else {
                    self.register(target)
                }
            }
            PCL => (self.pc & 0x00FF) as u8,
            FSR => self.raw(FSR) | FSR_FIXED_BITS,
            GPIO => self.raw(GPIO) & crate::gpio::PORT_MASK,
            _ => self.raw(address),
        }
    }

    /// Hook-aware register read used by the execution units: identical to
    /// [`Cpu::register`] except that a `GPIO` read first lets an installed
    /// pin hook refresh the sampled pin state.
    pub(crate) fn read_register(&mut self, address: u8) -> u8 {
        let mut address = address & 0x1F;
        if address == INDF {
            address = self.raw(FSR) & 0x1F;
            if address == INDF {
                return 0;
            }
        }
        if address == GPIO {
            self.sample_pins();
        }
        self.register(address)
    }

    /// Writes a register, applying the address-dependent transforms:
    /// `INDF` indirects through `FSR` (a self-targeting indirect write is
    /// discarded), a `TMR0` write clears the prescaler and opens the
    /// write-inhibit window when Timer0 owns the prescaler, a `PCL` write
    /// loads the program counter with the written byte (bit 8 clear),
    /// `STATUS` writes preserve the TO and PD bits, and a `GPIO` write runs
    /// the reset/wake side effects.
    pub fn set_register(&mut self, address: u8, value: u8) {
        let mut address = address & 0x1F;
        if address == INDF {
            address = self.raw(FSR) & 0x1F;
            if address == INDF {
                return;
            }
        }
        match address {
            TMR0 => {
                self.set_raw(TMR0, value);
                if self.option.prescaler_to_timer0() {
                    self.prescaler = 0;
                    self.inhibit = TMR0_WRITE_INHIBIT;
                }
            }
            PCL => {
                self.set_raw(PCL, value);
                self.pc = u16::from(value);
            }
            STATUS => {
                let preserved = self.raw(STATUS) & (STATUS_TO | STATUS_PD);
                self.set_raw(STATUS, (value & !(STATUS_TO | STATUS_PD)) | preserved);
            }
            GPIO => {
                let previous = self.raw(GPIO);
                self.set_raw(GPIO, value);
                self.gpio_written(previous, value);
            }
            _ => self.set_raw(address, value),
        }
    }
}
