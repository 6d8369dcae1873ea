//! Configuration word fused into the device at program time.
//!
//! The loader reads the word once from its reserved address; the core treats
//! it as immutable for the life of the simulation. Only the MCLR-enable and
//! watchdog-enable bits change core behavior. Code protection and the
//! oscillator selection are decoded for inspection but otherwise inert.

/// Configuration-word bit for MCLR pin function (`GP3` acts as reset input).
pub const CONFIG_MCLRE: u16 = 1 << 4;
/// Configuration-word bit for code protection (decoded, not enforced).
pub const CONFIG_CP_DISABLE: u16 = 1 << 3;
/// Configuration-word bit for the watchdog timer enable.
pub const CONFIG_WDTE: u16 = 1 << 2;
/// Mask of the 2-bit oscillator-select field.
pub const CONFIG_FOSC_MASK: u16 = 0b11;

/// Oscillator selection fused in the configuration word.
///
/// Only the internal RC oscillator is actually simulated; the field is kept
/// so hosts can report what the image requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Oscillator {
    /// Low-power crystal.
    LowPower,
    /// Crystal/resonator.
    Crystal,
    /// Internal 4 MHz RC oscillator.
    InternalRc,
    /// External RC network.
    ExternalRc,
}

/// Decoded 12-bit configuration word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ConfigWord {
    bits: u16,
}

impl Default for ConfigWord {
    /// Erased-flash state: every fuse bit reads as 1.
    fn default() -> Self {
        Self::from_word(0xFFF)
    }
}

impl ConfigWord {
    /// Decodes a raw configuration word (truncated to 12 bits).
    #[must_use]
    pub const fn from_word(bits: u16) -> Self {
        Self { bits: bits & 0xFFF }
    }

    /// Raw 12-bit fuse value.
    #[must_use]
    pub const fn word(self) -> u16 {
        self.bits
    }

    /// Returns `true` when `GP3` is fused as the MCLR reset input.
    #[must_use]
    pub const fn mclr_enabled(self) -> bool {
        self.bits & CONFIG_MCLRE != 0
    }

    /// Returns `true` when code protection is fused on (inert in simulation).
    #[must_use]
    pub const fn code_protected(self) -> bool {
        self.bits & CONFIG_CP_DISABLE == 0
    }

    /// Returns `true` when the watchdog timer is fused on.
    #[must_use]
    pub const fn watchdog_enabled(self) -> bool {
        self.bits & CONFIG_WDTE != 0
    }

    /// Fused oscillator selection.
    #[must_use]
    pub const fn oscillator(self) -> Oscillator {
        match self.bits & CONFIG_FOSC_MASK {
            0b00 => Oscillator::LowPower,
            0b01 => Oscillator::Crystal,
            0b10 => Oscillator::InternalRc,
            _ => Oscillator::ExternalRc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigWord, Oscillator};

    #[test]
    fn erased_word_enables_mclr_and_watchdog() {
        let config = ConfigWord::default();
        assert!(config.mclr_enabled());
        assert!(config.watchdog_enabled());
        assert!(!config.code_protected());
        assert_eq!(config.oscillator(), Oscillator::ExternalRc);
    }

    #[test]
    fn fuse_bits_decode_independently() {
        let config = ConfigWord::from_word(0b0000_0000_0110);
        assert!(!config.mclr_enabled());
        assert!(config.watchdog_enabled());
        assert!(config.code_protected());
        assert_eq!(config.oscillator(), Oscillator::InternalRc);
    }

    #[test]
    fn raw_word_is_truncated_to_twelve_bits() {
        assert_eq!(ConfigWord::from_word(0xFFFF).word(), 0xFFF);
    }
}
