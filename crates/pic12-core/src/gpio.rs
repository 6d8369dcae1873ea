//! GPIO port model: pin masks, host access, and reset/wake side effects.
//!
//! External pin changes and firmware port writes share one path,
//! [`Cpu::set_register`] on the GPIO address, so the side effects below run
//! for both. They are evaluated in order and the first match wins: an MCLR
//! transition preempts a wake-on-change transition in the same write.

use crate::state::registers::GPIO;
use crate::state::run_state::ResetCause;
use crate::state::Cpu;

/// Mask of the pins physically present on the port.
pub const PORT_MASK: u8 = 0x3F;
/// `GP0` pin mask (wake-on-change capable).
pub const GP0: u8 = 1 << 0;
/// `GP1` pin mask (wake-on-change capable).
pub const GP1: u8 = 1 << 1;
/// `GP2` pin mask.
pub const GP2: u8 = 1 << 2;
/// `GP3` pin mask; doubles as the MCLR input when fused.
pub const GP3: u8 = 1 << 3;
/// `GP4` pin mask.
pub const GP4: u8 = 1 << 4;
/// `GP5` pin mask.
pub const GP5: u8 = 1 << 5;
/// Pins whose transitions can wake the core from sleep.
pub const WAKE_PIN_MASK: u8 = GP0 | GP1 | GP3;

/// External circuit model attached to the port.
///
/// Both methods default to no-ops so implementations override only the
/// direction they care about. Hook calls are suppressed during the reset
/// sequence itself.
pub trait PinHook {
    /// Called before the core samples the port; returns the pin state the
    /// circuit is currently driving, given the last stored value.
    fn read_pins(&mut self, stored: u8) -> u8 {
        stored
    }

    /// Called after any port write with the resulting pin state.
    fn pins_written(&mut self, _pins: u8) {}
}

impl Cpu {
    /// Current port value (top 2 bits always 0).
    #[must_use]
    pub fn gpio(&self) -> u8 {
        self.register(GPIO)
    }

    /// Writes the whole port, running the reset/wake side effects.
    pub fn set_gpio(&mut self, value: u8) {
        self.set_register(GPIO, value);
    }

    /// Drives the pins in `mask` high or low, running the side effects.
    pub fn write_pins(&mut self, mask: u8, high: bool) {
        let current = self.raw(GPIO);
        let next = if high { current | mask } else { current & !mask };
        self.set_register(GPIO, next);
    }

    /// Returns `true` when any pin in `mask` is set.
    #[must_use]
    pub fn pins_set(&self, mask: u8) -> bool {
        self.gpio() & mask != 0
    }

    pub(crate) fn sample_pins(&mut self) {
        if self.in_reset {
            return;
        }
        if let Some(hook) = self.pin_hook.as_mut() {
            let sampled = hook.read_pins(self.regs[usize::from(GPIO)]);
            self.regs[usize::from(GPIO)] = sampled;
        }
    }

    pub(crate) fn gpio_written(&mut self, previous: u8, value: u8) {
        if self.in_reset {
            return;
        }
        if let Some(hook) = self.pin_hook.as_mut() {
            hook.pins_written(value & PORT_MASK);
        }
        let changed = (previous ^ value) & PORT_MASK;
        if changed == 0 {
            return;
        }
        if self.config.mclr_enabled() && changed & GP3 != 0 {
            let cause = if self.sleeping() {
                ResetCause::MclrSleep
            } else {
                ResetCause::MclrNormal
            };
            self.reset(cause);
        } else if self.sleeping()
            && self.option.wake_on_change_enabled()
            && changed & WAKE_PIN_MASK != 0
        {
            self.reset(ResetCause::WakePin);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{PinHook, GP0, GP2, GP3};
    use crate::config::ConfigWord;
    use crate::state::registers::GPIO;
    use crate::state::run_state::{CpuState, ResetCause};
    use crate::state::{Cpu, RESET_VECTOR};

    fn quiet_cpu() -> Cpu {
        // MCLR and watchdog fuses off so pin pokes exercise only the path
        // under test.
        Cpu::with_config(ConfigWord::from_word(0))
    }

    #[test]
    fn write_pins_sets_and_clears_masked_bits() {
        let mut cpu = quiet_cpu();
        cpu.write_pins(GP0 | GP2, true);
        assert_eq!(cpu.gpio(), GP0 | GP2);
        assert!(cpu.pins_set(GP2));
        cpu.write_pins(GP0, false);
        assert_eq!(cpu.gpio(), GP2);
        assert!(!cpu.pins_set(GP0));
    }

    #[test]
    fn mclr_transition_resets_when_fused() {
        let mut cpu = Cpu::with_config(ConfigWord::from_word(0b1_0000));
        cpu.pc = 0x050;
        cpu.write_pins(GP3, true);
        assert_eq!(cpu.last_reset, ResetCause::MclrNormal);
        assert_eq!(cpu.pc, RESET_VECTOR);
    }

    #[test]
    fn mclr_transition_is_inert_when_not_fused() {
        let mut cpu = quiet_cpu();
        cpu.pc = 0x050;
        cpu.write_pins(GP3, true);
        assert_eq!(cpu.last_reset, ResetCause::PowerOn);
        assert_eq!(cpu.pc, 0x050);
    }

    #[test]
    fn wake_on_change_only_fires_while_asleep() {
        let mut cpu = quiet_cpu();
        cpu.option = crate::state::option_reg::OptionReg::from_bits(0);
        cpu.write_pins(GP0, true);
        assert_eq!(cpu.last_reset, ResetCause::PowerOn);

        cpu.state = CpuState::Asleep;
        cpu.write_pins(GP0, false);
        assert_eq!(cpu.last_reset, ResetCause::WakePin);
        assert!(!cpu.sleeping());
    }

    #[test]
    fn wake_on_change_respects_the_option_disable_bit() {
        let mut cpu = quiet_cpu();
        cpu.state = CpuState::Asleep;
        // OPTION reset state leaves GPWU set (wake disabled).
        cpu.write_pins(GP0, true);
        assert!(cpu.sleeping());
    }

    #[derive(Default)]
    struct Recorder {
        writes: Rc<RefCell<Vec<u8>>>,
        drive: u8,
    }

    impl PinHook for Recorder {
        fn read_pins(&mut self, _stored: u8) -> u8 {
            self.drive
        }

        fn pins_written(&mut self, pins: u8) {
            self.writes.borrow_mut().push(pins);
        }
    }

    #[test]
    fn write_hook_observes_port_writes() {
        let writes = Rc::new(RefCell::new(Vec::new()));
        let mut cpu = quiet_cpu();
        cpu.set_pin_hook(Box::new(Recorder {
            writes: Rc::clone(&writes),
            drive: 0,
        }));
        cpu.set_gpio(0x21);
        cpu.write_pins(GP0, true);
        assert_eq!(*writes.borrow(), vec![0x21, 0x21 | GP0]);
    }

    #[test]
    fn read_hook_supplies_pin_state_to_instruction_reads() {
        let mut cpu = quiet_cpu();
        cpu.set_pin_hook(Box::new(Recorder {
            writes: Rc::default(),
            drive: GP2,
        }));
        assert_eq!(cpu.read_register(GPIO), GP2);
        // The pure accessor never consults the hook.
        assert_eq!(cpu.gpio(), GP2);
    }
}
