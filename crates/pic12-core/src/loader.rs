//! Intel-HEX firmware image loading.
//!
//! Images address program memory in bytes, two per 12-bit instruction word
//! packed little-endian into a 16-bit slot, so record offsets halve into
//! word addresses. The configuration word lives at a fixed byte offset past
//! the end of program memory. Record types other than data and end-of-file
//! are accepted and ignored.

use std::fs;
use std::path::Path;

use ihex::{Reader, Record};
use thiserror::Error;

use crate::config::ConfigWord;
use crate::state::PROGRAM_WORDS;

/// Byte offset of the configuration word within an image.
pub const CONFIG_BYTE_OFFSET: usize = 0x1FFE;

/// Result of loading a firmware image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firmware {
    /// Program memory, one 12-bit word per slot; unprogrammed slots are 0.
    pub words: [u16; PROGRAM_WORDS],
    /// Configuration word, or the erased default if the image has none.
    pub config: ConfigWord,
}

impl Default for Firmware {
    fn default() -> Self {
        Self {
            words: [0; PROGRAM_WORDS],
            config: ConfigWord::default(),
        }
    }
}

/// Failure while reading or parsing a firmware image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("failed to read firmware image: {0}")]
    Io(#[from] std::io::Error),
    /// A record failed Intel-HEX parsing or checksum validation.
    #[error("malformed hex record: {0}")]
    Hex(#[from] ihex::ReaderError),
    /// A data record addressed memory beyond program flash.
    #[error("data record at byte offset {offset:#06X} exceeds program memory")]
    OutOfRange {
        /// Byte offset of the offending word.
        offset: usize,
    },
}

/// Reads and parses a firmware image file.
pub fn load_hex_file(path: &Path) -> Result<Firmware, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_hex(&text)
}

/// Parses firmware image text.
///
/// A partially programmed or empty image is valid; unaddressed words stay 0
/// and decode as no-ops.
pub fn parse_hex(text: &str) -> Result<Firmware, LoadError> {
    let mut firmware = Firmware::default();
    for record in Reader::new(text) {
        match record? {
            Record::Data { offset, value } => {
                for (slot, chunk) in value.chunks(2).enumerate() {
                    let low = u16::from(chunk[0]);
                    let high = chunk.get(1).copied().map_or(0, u16::from);
                    let word = (high << 8 | low) & 0xFFF;
                    let byte_offset = usize::from(offset) + slot * 2;
                    if byte_offset == CONFIG_BYTE_OFFSET {
                        firmware.config = ConfigWord::from_word(word);
                    } else {
                        let address = byte_offset / 2;
                        if address >= PROGRAM_WORDS {
                            return Err(LoadError::OutOfRange {
                                offset: byte_offset,
                            });
                        }
                        firmware.words[address] = word;
                    }
                }
            }
            Record::EndOfFile => break,
            _ => {}
        }
    }
    Ok(firmware)
}
