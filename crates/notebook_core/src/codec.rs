//! Reversible identifier codec for user-defined column names.
//!
//! # Responsibility
//! - Map arbitrary display text to an identifier that is always safe to use
//!   as a SQLite column name.
//! - Map codec-produced identifiers back to the exact original text.
//!
//! # Invariants
//! - `encode` is total and deterministic.
//! - Every encoded identifier starts with `MARKER` and contains only
//!   `ALPHABET` symbols after it (no `=` padding).
//! - `decode(&encode(text)) == text` for every `&str`.
//! - `decode` accepts exactly one spelling per source text: impossible lengths
//!   and non-zero trailing bits are rejected instead of truncated.
//!
//! # Format
//! UTF-8 bytes of the text, read as one bit string, cut into 5-bit groups
//! (last group zero-padded on the right) and mapped through the RFC 4648
//! base-32 alphabet. The `=` group padding of RFC 4648 is implied by the
//! symbol count and never stored.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sentinel prefix of every codec-produced identifier.
///
/// Never part of `ALPHABET`, so reserved columns (`id`, `content`) can not be
/// mistaken for encoded ones.
pub const MARKER: char = '_';

/// RFC 4648 base-32 alphabet (upper case only).
pub const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

const SYMBOL_BITS: u32 = 5;
const BYTE_BITS: u32 = 8;
const SYMBOLS_PER_GROUP: usize = 8;

/// Decode failure for identifiers that were not produced by [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Identifier does not start with [`MARKER`].
    MissingMarker,
    /// Character outside [`ALPHABET`]; `position` counts symbols after the marker.
    InvalidSymbol { symbol: char, position: usize },
    /// No byte sequence encodes to this many symbols.
    InvalidLength { symbols: usize },
    /// Bits left over after the last full byte are not zero.
    NonZeroTrailingBits,
    /// Reassembled bytes are not valid UTF-8.
    InvalidUtf8,
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMarker => {
                write!(f, "encoded identifier must start with `{MARKER}`")
            }
            Self::InvalidSymbol { symbol, position } => write!(
                f,
                "invalid base-32 symbol `{symbol}` at position {position}"
            ),
            Self::InvalidLength { symbols } => {
                write!(f, "{symbols} base-32 symbols can not encode whole bytes")
            }
            Self::NonZeroTrailingBits => write!(f, "encoded identifier has non-zero trailing bits"),
            Self::InvalidUtf8 => write!(f, "decoded identifier is not valid UTF-8"),
        }
    }
}

impl Error for FormatError {}

/// Encodes display text into a storage-safe identifier.
pub fn encode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut identifier = String::with_capacity(1 + (bytes.len() * 8).div_ceil(5));
    identifier.push(MARKER);

    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in bytes {
        buffer = (buffer << BYTE_BITS) | u32::from(byte);
        bits += BYTE_BITS;
        while bits >= SYMBOL_BITS {
            bits -= SYMBOL_BITS;
            identifier.push(symbol_for((buffer >> bits) & 0x1f));
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        identifier.push(symbol_for((buffer << (SYMBOL_BITS - bits)) & 0x1f));
    }

    identifier
}

/// Decodes an identifier produced by [`encode`] back to display text.
///
/// # Errors
/// - [`FormatError::MissingMarker`] when the marker prefix is absent.
/// - [`FormatError::InvalidSymbol`] for `=`, lower case or any other
///   character outside the alphabet.
/// - [`FormatError::InvalidLength`] / [`FormatError::NonZeroTrailingBits`]
///   when the symbols do not reassemble into whole bytes cleanly.
/// - [`FormatError::InvalidUtf8`] when the bytes are not UTF-8 text.
pub fn decode(identifier: &str) -> Result<String, FormatError> {
    let body = identifier
        .strip_prefix(MARKER)
        .ok_or(FormatError::MissingMarker)?;

    let mut bytes = Vec::with_capacity(body.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    let mut symbols = 0usize;
    for (position, symbol) in body.chars().enumerate() {
        let value = value_of(symbol).ok_or(FormatError::InvalidSymbol { symbol, position })?;
        buffer = (buffer << SYMBOL_BITS) | u32::from(value);
        bits += SYMBOL_BITS;
        if bits >= BYTE_BITS {
            bits -= BYTE_BITS;
            bytes.push(((buffer >> bits) & 0xff) as u8);
            buffer &= (1 << bits) - 1;
        }
        symbols += 1;
    }

    if !is_complete_length(symbols) {
        return Err(FormatError::InvalidLength { symbols });
    }
    if buffer != 0 {
        return Err(FormatError::NonZeroTrailingBits);
    }

    String::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8)
}

/// Returns whether `identifier` is a well-formed codec identifier.
pub fn is_encoded(identifier: &str) -> bool {
    decode(identifier).is_ok()
}

fn symbol_for(index: u32) -> char {
    char::from(ALPHABET[index as usize])
}

fn value_of(symbol: char) -> Option<u8> {
    match symbol {
        'A'..='Z' => Some(symbol as u8 - b'A'),
        '2'..='7' => Some(symbol as u8 - b'2' + 26),
        _ => None,
    }
}

// A trailing partial group of 1, 3 or 6 symbols would need 3, 1 or 6 `=`
// padding symbols, which RFC 4648 never produces.
fn is_complete_length(symbols: usize) -> bool {
    let padding = (SYMBOLS_PER_GROUP - symbols % SYMBOLS_PER_GROUP) % SYMBOLS_PER_GROUP;
    matches!(padding, 0 | 1 | 3 | 4 | 6)
}
