use core::{fmt, num::ParseIntError};
use heapless::Vec;

/// Formats a byte buffer as upper case hex for logging, `null` when empty.
pub struct Hex<'a>(pub &'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("null");
        }
        for b in self.0 {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Hex<'_> {
    fn format(&self, f: defmt::Formatter<'_>) {
        if self.0.is_empty() {
            defmt::write!(f, "null")
        } else {
            defmt::write!(f, "{=[u8]:X}", self.0)
        }
    }
}

pub fn decode_hex<const N: usize>(s: &str) -> Result<Vec<u8, N>, DecodeHexError> {
    if s.len() % 2 != 0 {
        return Err(DecodeHexError::OddLength);
    }
    let mut out = Vec::new();
    for i in (0..s.len()).step_by(2) {
        let byte = s
            .get(i..i + 2)
            .ok_or(DecodeHexError::NotAscii)
            .and_then(|pair| u8::from_str_radix(pair, 16).map_err(DecodeHexError::ParseInt))?;
        out.push(byte).map_err(|_| DecodeHexError::Capacity)?;
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeHexError {
    OddLength,
    NotAscii,
    Capacity,
    ParseInt(ParseIntError),
}

impl fmt::Display for DecodeHexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeHexError::OddLength => "input string has an odd number of bytes".fmt(f),
            DecodeHexError::NotAscii => "input string is not ascii hex".fmt(f),
            DecodeHexError::Capacity => "decoded bytes do not fit the buffer".fmt(f),
            DecodeHexError::ParseInt(e) => e.fmt(f),
        }
    }
}
