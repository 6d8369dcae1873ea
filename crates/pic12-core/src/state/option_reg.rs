//! OPTION register: wake/pull-up enables and the Timer0/prescaler plumbing.
//!
//! OPTION is not memory mapped; it is written only by the `OPTION`
//! instruction and reset to all ones by every reset cause.

/// `OPTION` bit: wake-on-pin-change disable (active low enable).
pub const OPTION_GPWU: u8 = 1 << 7;
/// `OPTION` bit: weak pull-up disable (active low enable).
pub const OPTION_GPPU: u8 = 1 << 6;
/// `OPTION` bit: Timer0 clock source (clear = internal instruction clock).
pub const OPTION_T0CS: u8 = 1 << 5;
/// `OPTION` bit: Timer0 external edge select (inert; external clocking is
/// not simulated).
pub const OPTION_T0SE: u8 = 1 << 4;
/// `OPTION` bit: prescaler assignment (clear = Timer0, set = watchdog).
pub const OPTION_PSA: u8 = 1 << 3;
/// Mask of the 3-bit prescaler-rate field.
pub const OPTION_PS_MASK: u8 = 0b111;

/// Typed view over the 8-bit OPTION register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct OptionReg {
    bits: u8,
}

impl Default for OptionReg {
    /// Reset state: all bits set (wake and pull-ups disabled, prescaler to
    /// the watchdog at the slowest rate).
    fn default() -> Self {
        Self { bits: 0xFF }
    }
}

impl OptionReg {
    /// Wraps a raw OPTION value.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Raw register value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Returns `true` when wake-on-pin-change is enabled (`GPWU` clear).
    #[must_use]
    pub const fn wake_on_change_enabled(self) -> bool {
        self.bits & OPTION_GPWU == 0
    }

    /// Returns `true` when weak pull-ups are enabled (`GPPU` clear).
    #[must_use]
    pub const fn pull_ups_enabled(self) -> bool {
        self.bits & OPTION_GPPU == 0
    }

    /// Returns `true` when Timer0 counts the internal instruction clock.
    #[must_use]
    pub const fn timer0_internal_clock(self) -> bool {
        self.bits & OPTION_T0CS == 0
    }

    /// Returns `true` when the shared prescaler is assigned to Timer0.
    #[must_use]
    pub const fn prescaler_to_timer0(self) -> bool {
        self.bits & OPTION_PSA == 0
    }

    /// 3-bit prescaler-rate field.
    #[must_use]
    pub const fn rate(self) -> u8 {
        self.bits & OPTION_PS_MASK
    }

    /// Prescaler counts per Timer0 increment: `2^(rate + 1)`.
    #[must_use]
    pub const fn timer0_prescale(self) -> u32 {
        1 << (self.rate() + 1)
    }

    /// Watchdog period multiplier: `2^rate`.
    #[must_use]
    pub const fn watchdog_prescale(self) -> u32 {
        1 << self.rate()
    }
}

#[cfg(test)]
mod tests {
    use super::OptionReg;

    #[test]
    fn reset_value_disables_wake_and_assigns_watchdog() {
        let option = OptionReg::default();
        assert!(!option.wake_on_change_enabled());
        assert!(!option.pull_ups_enabled());
        assert!(!option.prescaler_to_timer0());
        assert_eq!(option.rate(), 7);
    }

    #[test]
    fn timer0_prescale_is_double_the_watchdog_multiplier() {
        for rate in 0..8_u8 {
            let option = OptionReg::from_bits(rate);
            assert_eq!(option.rate(), rate);
            assert_eq!(option.timer0_prescale(), 1 << (rate + 1));
            assert_eq!(option.watchdog_prescale(), 1 << rate);
            assert_eq!(option.timer0_prescale(), option.watchdog_prescale() * 2);
        }
    }

    #[test]
    fn clock_source_and_assignment_bits_decode() {
        let option = OptionReg::from_bits(0b0010_1000);
        assert!(!option.timer0_internal_clock());
        assert!(!option.prescaler_to_timer0());
        assert!(option.wake_on_change_enabled());

        let option = OptionReg::from_bits(0);
        assert!(option.timer0_internal_clock());
        assert!(option.prescaler_to_timer0());
    }
}
