//! Character strings stored inside 36-bit words.
//!
//! Text is packed either as five 7-bit characters per word (left justified,
//! with bit 0 of the right half unused) or as four 8-bit characters per word
//! (with the low four bits unused).  These are the same layouts used by the
//! ANSI-ASCII and industry-compatible tape modes.

use std::fmt::Write;

use crate::word::Word36;

/// The bits of the right half occupied by the fifth 7-bit character.
const LAST_ASCII7_CHAR: u32 = 0o177 << 1;

/// Decode five 7-bit characters from a word.
pub fn decode_ascii7(word: Word36) -> [u8; 5] {
    [
        ((word.high >> 11) & 0o177) as u8,
        ((word.high >> 4) & 0o177) as u8,
        (((word.high << 3) & 0o170) | ((word.low >> 15) & 0o7)) as u8,
        ((word.low >> 8) & 0o177) as u8,
        ((word.low >> 1) & 0o177) as u8,
    ]
}

/// Decode four 8-bit characters from a word.  The low four bits of the word
/// are not represented.
pub fn decode_ascii8(word: Word36) -> [u8; 4] {
    [
        ((word.high >> 10) & 0o377) as u8,
        ((word.high >> 2) & 0o377) as u8,
        (((word.high << 6) & 0o300) | ((word.low >> 12) & 0o77)) as u8,
        ((word.low >> 4) & 0o377) as u8,
    ]
}

fn encode_chunk7(chunk: &[u8]) -> Word36 {
    let mut c = [0u32; 5];
    for (slot, &b) in c.iter_mut().zip(chunk) {
        *slot = u32::from(b & 0o177);
    }
    Word36::new(
        (c[0] << 11) | (c[1] << 4) | (c[2] >> 3),
        ((c[2] & 0o7) << 15) | (c[3] << 8) | (c[4] << 1),
    )
}

fn encode_chunk8(chunk: &[u8]) -> Word36 {
    let mut c = [0u32; 4];
    for (slot, &b) in c.iter_mut().zip(chunk) {
        *slot = u32::from(b);
    }
    Word36::new(
        (c[0] << 10) | (c[1] << 2) | (c[2] >> 6),
        ((c[2] & 0o77) << 12) | (c[3] << 4),
    )
}

/// The portion of `string` before its first NUL, if any.
fn until_nul(string: &[u8]) -> &[u8] {
    match string.iter().position(|&b| b == 0) {
        Some(end) => &string[..end],
        None => string,
    }
}

fn encode_with(
    string: &[u8],
    words: &mut [Word36],
    chars_per_word: usize,
    encode_chunk: fn(&[u8]) -> Word36,
) -> usize {
    let string = until_nul(string);
    let mut used = 0;
    for (word, chunk) in words.iter_mut().zip(string.chunks(chars_per_word)) {
        *word = encode_chunk(chunk);
        used += 1;
    }
    for word in &mut words[used..] {
        *word = Word36::ZERO;
    }
    used
}

/// Pack `string` into words of five 7-bit characters, stopping at a NUL or
/// when `words` is full.  Unused character positions and unused words are
/// zeroed.  Returns the number of words holding at least one character.
pub fn encode_ascii7(string: &[u8], words: &mut [Word36]) -> usize {
    encode_with(string, words, 5, encode_chunk7)
}

/// Pack `string` into words of four 8-bit characters.  See `encode_ascii7()`.
pub fn encode_ascii8(string: &[u8], words: &mut [Word36]) -> usize {
    encode_with(string, words, 4, encode_chunk8)
}

/// Pack `string` as a 7-bit ASCIZ string and return the number of words it
/// occupies, including the word carrying its terminating NUL.
///
/// If the string fills `words` completely, the final character is dropped
/// so that the string remains terminated.
pub fn encode_asciz(string: &[u8], words: &mut [Word36]) -> usize {
    if words.is_empty() {
        return 0;
    }

    let mut used = encode_ascii7(string, words);
    if used == words.len() {
        words[used - 1].low &= !LAST_ASCII7_CHAR;
    } else if used == 0 || words[used - 1].low & LAST_ASCII7_CHAR != 0 {
        // The terminator needs a word of its own; it was zeroed above.
        used += 1;
    }
    used
}

/// Decode a counted 7-bit ASCII string.  The right half of the first word
/// holds the number of words of text that follow it.  Decoding stops at the
/// first NUL.
///
/// Returns `None` if the count runs past the end of `words`.
pub fn decode_asciz(words: &[Word36]) -> Option<String> {
    let (count, text) = words.split_first()?;
    let count = count.low as usize;
    if count > text.len() {
        return None;
    }

    let mut string = String::with_capacity(count * 5);
    for &word in &text[..count] {
        for &c in decode_ascii7(word).iter() {
            if c == 0 {
                return Some(string);
            }
            string.push(char::from(c));
        }
    }
    Some(string)
}

/// Render a version word in the conventional `major minor (edit) -customer`
/// form, e.g. `704B(17)-1`.  Fields that are zero are omitted.
pub fn decode_version(word: Word36) -> String {
    let major = (word.high & 0o077700) >> 6;
    let minor = word.high & 0o77;
    let customer = (word.high & 0o700000) >> 15;
    let edit = word.low;

    let mut version = String::new();
    if major != 0 {
        let _ = write!(version, "{:o}", major);
    }
    if minor != 0 {
        let (quotient, remainder) = ((minor - 1) / 26, (minor - 1) % 26);
        if quotient != 0 {
            version.push(char::from(b'A' - 1 + quotient as u8));
        }
        version.push(char::from(b'A' + remainder as u8));
    }
    if edit != 0 {
        if edit & (1 << 17) != 0 {
            let _ = write!(version, "({})", edit);
        } else {
            let _ = write!(version, "({:o})", edit);
        }
    }
    if customer != 0 {
        let _ = write!(version, "-{:o}", customer);
    }
    version
}
