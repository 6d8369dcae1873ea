//! Instruction word classification for the 12-bit baseline instruction set.
//!
//! Opcode patterns overlap, so [`decode`] matches in strict priority order
//! over four progressively coarser masks: the six zero-operand encodings
//! first (full 12-bit match), then the byte-register class (top 6 bits,
//! with `MOVWF`/`CLRF` requiring the destination bit), then the bit and
//! literal classes (top 4 bits), and finally `GOTO` (top 3 bits). Anything
//! left over is an illegal encoding.

use std::fmt;

/// Decoded instruction with extracted operands.
///
/// `f` is a 5-bit register address, `d` selects the store target (`false` =
/// accumulator, `true` = register `f`), `b` is a 3-bit bit index, `k` is a
/// literal (9 bits for [`Op::Goto`], 8 otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Op {
    Nop,
    Option,
    Sleep,
    Clrwdt,
    Tris,
    Clrw,
    Movwf { f: u8 },
    Clrf { f: u8 },
    Subwf { f: u8, d: bool },
    Decf { f: u8, d: bool },
    Iorwf { f: u8, d: bool },
    Andwf { f: u8, d: bool },
    Xorwf { f: u8, d: bool },
    Addwf { f: u8, d: bool },
    Movf { f: u8, d: bool },
    Comf { f: u8, d: bool },
    Incf { f: u8, d: bool },
    Decfsz { f: u8, d: bool },
    Rrf { f: u8, d: bool },
    Rlf { f: u8, d: bool },
    Swapf { f: u8, d: bool },
    Incfsz { f: u8, d: bool },
    Bcf { f: u8, b: u8 },
    Bsf { f: u8, b: u8 },
    Btfsc { f: u8, b: u8 },
    Btfss { f: u8, b: u8 },
    Retlw { k: u8 },
    Call { k: u8 },
    Movlw { k: u8 },
    Iorlw { k: u8 },
    Andlw { k: u8 },
    Xorlw { k: u8 },
    Goto { k: u16 },
}

/// Classifies a 12-bit instruction word, or returns `None` for an illegal
/// encoding.
#[must_use]
pub const fn decode(word: u16) -> Option<Op> {
    let word = word & 0xFFF;

    match word {
        0x000 => return Some(Op::Nop),
        0x002 => return Some(Op::Option),
        0x003 => return Some(Op::Sleep),
        0x004 => return Some(Op::Clrwdt),
        0x006 => return Some(Op::Tris),
        0x040 => return Some(Op::Clrw),
        _ => {}
    }

    let d = word & 0x020 != 0;
    let f = (word & 0x01F) as u8;
    let b = ((word >> 5) & 0x7) as u8;
    let k = (word & 0x0FF) as u8;

    match word & 0xFC0 {
        0x000 => {
            if d {
                return Some(Op::Movwf { f });
            }
        }
        0x040 => {
            if d {
                return Some(Op::Clrf { f });
            }
        }
        0x080 => return Some(Op::Subwf { f, d }),
        0x0C0 => return Some(Op::Decf { f, d }),
        0x100 => return Some(Op::Iorwf { f, d }),
        0x140 => return Some(Op::Andwf { f, d }),
        0x180 => return Some(Op::Xorwf { f, d }),
        0x1C0 => return Some(Op::Addwf { f, d }),
        0x200 => return Some(Op::Movf { f, d }),
        0x240 => return Some(Op::Comf { f, d }),
        0x280 => return Some(Op::Incf { f, d }),
        0x2C0 => return Some(Op::Decfsz { f, d }),
        0x300 => return Some(Op::Rrf { f, d }),
        0x340 => return Some(Op::Rlf { f, d }),
        0x380 => return Some(Op::Swapf { f, d }),
        0x3C0 => return Some(Op::Incfsz { f, d }),
        _ => {}
    }

    match word & 0xF00 {
        0x400 => return Some(Op::Bcf { f, b }),
        0x500 => return Some(Op::Bsf { f, b }),
        0x600 => return Some(Op::Btfsc { f, b }),
        0x700 => return Some(Op::Btfss { f, b }),
        0x800 => return Some(Op::Retlw { k }),
        0x900 => return Some(Op::Call { k }),
        0xC00 => return Some(Op::Movlw { k }),
        0xD00 => return Some(Op::Iorlw { k }),
        0xE00 => return Some(Op::Andlw { k }),
        0xF00 => return Some(Op::Xorlw { k }),
        _ => {}
    }

    if word & 0xE00 == 0xA00 {
        return Some(Op::Goto { k: word & 0x1FF });
    }

    None
}

impl Op {
    /// Produces the canonical 12-bit word for this instruction (the inverse
    /// of [`decode`]; operands are masked to their field widths).
    #[must_use]
    pub const fn encode(self) -> u16 {
        const fn df(base: u16, f: u8, d: bool) -> u16 {
            let dest = if d { 0x020 } else { 0 };
            base | dest | (f & 0x1F) as u16
        }
        const fn fb(base: u16, f: u8, b: u8) -> u16 {
            base | ((b & 0x7) as u16) << 5 | (f & 0x1F) as u16
        }
        match self {
            Self::Nop => 0x000,
            Self::Option => 0x002,
            Self::Sleep => 0x003,
            Self::Clrwdt => 0x004,
            Self::Tris => 0x006,
            Self::Clrw => 0x040,
            Self::Movwf { f } => df(0x000, f, true),
            Self::Clrf { f } => df(0x040, f, true),
            Self::Subwf { f, d } => df(0x080, f, d),
            Self::Decf { f, d } => df(0x0C0, f, d),
            Self::Iorwf { f, d } => df(0x100, f, d),
            Self::Andwf { f, d } => df(0x140, f, d),
            Self::Xorwf { f, d } => df(0x180, f, d),
            Self::Addwf { f, d } => df(0x1C0, f, d),
            Self::Movf { f, d } => df(0x200, f, d),
            Self::Comf { f, d } => df(0x240, f, d),
            Self::Incf { f, d } => df(0x280, f, d),
            Self::Decfsz { f, d } => df(0x2C0, f, d),
            Self::Rrf { f, d } => df(0x300, f, d),
            Self::Rlf { f, d } => df(0x340, f, d),
            Self::Swapf { f, d } => df(0x380, f, d),
            Self::Incfsz { f, d } => df(0x3C0, f, d),
            Self::Bcf { f, b } => fb(0x400, f, b),
            Self::Bsf { f, b } => fb(0x500, f, b),
            Self::Btfsc { f, b } => fb(0x600, f, b),
            Self::Btfss { f, b } => fb(0x700, f, b),
            Self::Retlw { k } => 0x800 | k as u16,
            Self::Call { k } => 0x900 | k as u16,
            Self::Movlw { k } => 0xC00 | k as u16,
            Self::Iorlw { k } => 0xD00 | k as u16,
            Self::Andlw { k } => 0xE00 | k as u16,
            Self::Xorlw { k } => 0xF00 | k as u16,
            Self::Goto { k } => 0xA00 | (k & 0x1FF),
        }
    }

    /// Returns `true` for the documented two-cycle control transfers.
    #[must_use]
    pub const fn is_two_cycle(self) -> bool {
        matches!(self, Self::Goto { .. } | Self::Call { .. })
    }
}

impl fmt::Display for Op {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn dest(d: bool) -> char {
            if d {
                'F'
            } else {
                'W'
            }
        }
        match *self {
            Self::Nop => write!(out, "NOP"),
            Self::Option => write!(out, "OPTION"),
            Self::Sleep => write!(out, "SLEEP"),
            Self::Clrwdt => write!(out, "CLRWDT"),
            Self::Tris => write!(out, "TRIS GPIO"),
            Self::Clrw => write!(out, "CLRW"),
            Self::Movwf { f } => write!(out, "MOVWF 0x{f:02X}"),
            Self::Clrf { f } => write!(out, "CLRF 0x{f:02X}"),
            Self::Subwf { f, d } => write!(out, "SUBWF 0x{f:02X}, {}", dest(d)),
            Self::Decf { f, d } => write!(out, "DECF 0x{f:02X}, {}", dest(d)),
            Self::Iorwf { f, d } => write!(out, "IORWF 0x{f:02X}, {}", dest(d)),
            Self::Andwf { f, d } => write!(out, "ANDWF 0x{f:02X}, {}", dest(d)),
            Self::Xorwf { f, d } => write!(out, "XORWF 0x{f:02X}, {}", dest(d)),
            Self::Addwf { f, d } => write!(out, "ADDWF 0x{f:02X}, {}", dest(d)),
            Self::Movf { f, d } => write!(out, "MOVF 0x{f:02X}, {}", dest(d)),
            Self::Comf { f, d } => write!(out, "COMF 0x{f:02X}, {}", dest(d)),
            Self::Incf { f, d } => write!(out, "INCF 0x{f:02X}, {}", dest(d)),
            Self::Decfsz { f, d } => write!(out, "DECFSZ 0x{f:02X}, {}", dest(d)),
            Self::Rrf { f, d } => write!(out, "RRF 0x{f:02X}, {}", dest(d)),
            Self::Rlf { f, d } => write!(out, "RLF 0x{f:02X}, {}", dest(d)),
            Self::Swapf { f, d } => write!(out, "SWAPF 0x{f:02X}, {}", dest(d)),
            Self::Incfsz { f, d } => write!(out, "INCFSZ 0x{f:02X}, {}", dest(d)),
            Self::Bcf { f, b } => write!(out, "BCF 0x{f:02X}, {b}"),
            Self::Bsf { f, b } => write!(out, "BSF 0x{f:02X}, {b}"),
            Self::Btfsc { f, b } => write!(out, "BTFSC 0x{f:02X}, {b}"),
            Self::Btfss { f, b } => write!(out, "BTFSS 0x{f:02X}, {b}"),
            Self::Retlw { k } => write!(out, "RETLW 0x{k:02X}"),
            Self::Call { k } => write!(out, "CALL 0x{k:02X}"),
            Self::Movlw { k } => write!(out, "MOVLW 0x{k:02X}"),
            Self::Iorlw { k } => write!(out, "IORLW 0x{k:02X}"),
            Self::Andlw { k } => write!(out, "ANDLW 0x{k:02X}"),
            Self::Xorlw { k } => write!(out, "XORLW 0x{k:02X}"),
            Self::Goto { k } => write!(out, "GOTO 0x{k:03X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{decode, Op};

    #[test]
    fn zero_operand_encodings_win_over_coarser_masks() {
        // Each of these also matches a coarser mask pattern; the exact
        // match must take priority.
        assert_eq!(decode(0x000), Some(Op::Nop));
        assert_eq!(decode(0x040), Some(Op::Clrw));
        assert_eq!(decode(0x002), Some(Op::Option));
        assert_eq!(decode(0x003), Some(Op::Sleep));
        assert_eq!(decode(0x004), Some(Op::Clrwdt));
        assert_eq!(decode(0x006), Some(Op::Tris));
    }

    #[test]
    fn movwf_and_clrf_require_the_destination_bit() {
        assert_eq!(decode(0x025), Some(Op::Movwf { f: 5 }));
        assert_eq!(decode(0x06A), Some(Op::Clrf { f: 0x0A }));
        // Same class with d = 0 is not a valid encoding.
        assert_eq!(decode(0x005), None);
        assert_eq!(decode(0x041), None);
    }

    #[test]
    fn byte_register_class_extracts_f_and_d() {
        assert_eq!(decode(0x1D2), Some(Op::Addwf { f: 0x12, d: false }));
        assert_eq!(decode(0x1F2), Some(Op::Addwf { f: 0x12, d: true }));
        assert_eq!(decode(0x0A7), Some(Op::Subwf { f: 0x07, d: true }));
        assert_eq!(decode(0x2E3), Some(Op::Decfsz { f: 0x03, d: true }));
    }

    #[test]
    fn bit_and_literal_classes_extract_their_operands() {
        assert_eq!(decode(0x566), Some(Op::Bsf { f: 0x06, b: 3 }));
        assert_eq!(decode(0x403), Some(Op::Bcf { f: 0x03, b: 0 }));
        assert_eq!(decode(0x703), Some(Op::Btfss { f: 0x03, b: 0 }));
        assert_eq!(decode(0x8FF), Some(Op::Retlw { k: 0xFF }));
        assert_eq!(decode(0x911), Some(Op::Call { k: 0x11 }));
        assert_eq!(decode(0xC2A), Some(Op::Movlw { k: 0x2A }));
    }

    #[test]
    fn goto_takes_the_full_nine_bit_operand() {
        assert_eq!(decode(0xA00), Some(Op::Goto { k: 0x000 }));
        assert_eq!(decode(0xBFF), Some(Op::Goto { k: 0x1FF }));
    }

    #[test]
    fn unassigned_words_are_illegal() {
        for word in [0x001_u16, 0x005, 0x007, 0x019, 0x05F] {
            assert_eq!(decode(word), None, "word {word:#05X}");
        }
    }

    #[test]
    fn display_uses_datasheet_mnemonics() {
        assert_eq!(Op::Addwf { f: 0x12, d: true }.to_string(), "ADDWF 0x12, F");
        assert_eq!(Op::Bsf { f: 6, b: 3 }.to_string(), "BSF 0x06, 3");
        assert_eq!(Op::Goto { k: 0x1FF }.to_string(), "GOTO 0x1FF");
        assert_eq!(Op::Sleep.to_string(), "SLEEP");
    }

    proptest! {
        #[test]
        fn decode_is_the_left_inverse_of_encode(word in 0_u16..0x1000) {
            if let Some(op) = decode(word) {
                prop_assert_eq!(op.encode(), word);
                prop_assert_eq!(decode(op.encode()), Some(op));
            }
        }
    }
}
