//! Hex rendering of raw wire bytes for logs.

use std::fmt;

/// Render `bytes` as space-separated lowercase hex pairs, e.g. `"01 01 2c"`.
#[must_use]
pub fn hexdump(bytes: &[u8]) -> String {
    HexBytes(bytes).to_string()
}

/// Lowercase hex view over a byte slice.
pub(crate) struct HexBytes<'a>(pub(crate) &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, self.0, false)
    }
}

pub(crate) fn write_hex<W: fmt::Write>(out: &mut W, bytes: &[u8], upper: bool) -> fmt::Result {
    for (index, byte) in bytes.iter().enumerate() {
        if index > 0 {
            out.write_char(' ')?;
        }
        if upper {
            write!(out, "{byte:02X}")?;
        } else {
            write!(out, "{byte:02x}")?;
        }
    }
    Ok(())
}
