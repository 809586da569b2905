use std::fmt;

/// Write a hexdump of the provided byte slice.
pub fn hexdump(f: &mut fmt::Formatter, prefix: &str, buffer: &[u8]) -> fmt::Result {
    const COLUMNS: usize = 16;
    if buffer.is_empty() {
        // For a zero-length record, at least print an offset instead of
        // nothing.
        return write!(f, "{}{:04x}: ", prefix, 0);
    }

    for (row_index, row) in buffer.chunks(COLUMNS).enumerate() {
        if row_index > 0 {
            writeln!(f)?;
        }
        write!(f, "{}{:04x}: ", prefix, row_index * COLUMNS)?;

        // Print hex representation
        for b in row {
            write!(f, "{:02x} ", b)?;
        }
        for _ in row.len()..COLUMNS {
            write!(f, "   ")?;
        }

        // Print ASCII representation.  Tape data is frequently 7-bit text
        // with the high bit set, so the high bit is ignored here.
        for b in row {
            let c = match *b & 0x7f {
                c @ 0x20..=0x7E => c as char,
                _ => '.',
            };
            write!(f, "{}", c)?;
        }
    }
    Ok(())
}

pub struct Hex<'a>(pub &'a [u8]);

impl<'a> fmt::Display for Hex<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        hexdump(f, "", self.0)
    }
}

pub fn hex(bytes: &[u8]) -> Hex {
    Hex(bytes)
}
