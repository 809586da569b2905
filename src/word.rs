use std::fmt;

/// Mask for one 18-bit halfword.
pub const HALFWORD_MASK: u32 = 0o777777;
/// Mask for a full 36-bit word held in a `u64`.
pub const WORD_MASK: u64 = 0o777777_777777;

const SIGN_BIT: u32 = 1 << 17;

/// A 36-bit word, stored as its left (high) and right (low) 18-bit halves.
///
/// Ordering predicates treat bit 17 of the high half as a sign bit, as the
/// native word format does.  Note that `is_greater()` is true for zero; use
/// `is_nonzero()` alongside it when strict positivity matters.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Word36 {
    pub high: u32,
    pub low: u32,
}

impl Word36 {
    pub const ZERO: Word36 = Word36 { high: 0, low: 0 };

    /// Construct a word from its halves.  Bits above 18 in either half are
    /// discarded.
    #[inline]
    pub fn new(high: u32, low: u32) -> Word36 {
        Word36 {
            high: high & HALFWORD_MASK,
            low: low & HALFWORD_MASK,
        }
    }

    /// Construct a word from the low 36 bits of `value`.
    #[inline]
    pub fn from_u64(value: u64) -> Word36 {
        let value = value & WORD_MASK;
        Word36 {
            high: ((value >> 18) as u32) & HALFWORD_MASK,
            low: (value as u32) & HALFWORD_MASK,
        }
    }

    #[inline]
    pub fn to_u64(self) -> u64 {
        (u64::from(self.high & HALFWORD_MASK) << 18) | u64::from(self.low & HALFWORD_MASK)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        (self.high | self.low) == 0
    }

    #[inline]
    pub fn is_nonzero(self) -> bool {
        !self.is_zero()
    }

    #[inline]
    pub fn is_greater(self) -> bool {
        self.high & SIGN_BIT == 0
    }

    #[inline]
    pub fn is_less(self) -> bool {
        self.high & SIGN_BIT != 0
    }

    #[inline]
    pub fn is_greater_or_equal(self) -> bool {
        self.is_greater() || self.is_zero()
    }

    #[inline]
    pub fn is_less_or_equal(self) -> bool {
        self.is_less() || self.is_zero()
    }

    /// Render the word as eight little-endian bytes: the 36 bits occupy the
    /// first four bytes and the low nibble of the fifth, and the remaining
    /// bytes are zero.
    pub fn to_le_bytes(self) -> [u8; 8] {
        self.to_u64().to_le_bytes()
    }
}

impl From<u64> for Word36 {
    fn from(value: u64) -> Word36 {
        Word36::from_u64(value)
    }
}

impl From<Word36> for u64 {
    fn from(word: Word36) -> u64 {
        word.to_u64()
    }
}

/// Words are shown in the customary octal `left,,right` notation.
impl fmt::Debug for Word36 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:06o},,{:06o}", self.high, self.low)
    }
}

impl fmt::Display for Word36 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_bit_18() {
        let word = Word36::from_u64(0o123456_765432);
        assert_eq!(word.high, 0o123456);
        assert_eq!(word.low, 0o765432);
        assert_eq!(word.to_u64(), 0o123456_765432);
        // Bits above 36 are dropped.
        assert_eq!(Word36::from_u64(0o7_000000_000001), Word36::new(0, 1));
        assert_eq!(Word36::from_u64(u64::max_value()).to_u64(), WORD_MASK);
        assert_eq!(Word36::new(0o1777777, 0o1000000), Word36::new(0o777777, 0));
    }

    #[test]
    fn test_predicates() {
        let zero = Word36::ZERO;
        let positive = Word36::new(0o377777, 0o777777);
        let negative = Word36::new(0o400000, 0);

        assert!(zero.is_zero());
        assert!(!zero.is_nonzero());
        assert!(zero.is_greater_or_equal());
        assert!(zero.is_less_or_equal());

        assert!(positive.is_nonzero());
        assert!(positive.is_greater());
        assert!(!positive.is_less());
        assert!(!positive.is_less_or_equal());

        assert!(negative.is_less());
        assert!(!negative.is_greater());
        assert!(negative.is_less_or_equal());
        assert!(!negative.is_greater_or_equal());
    }

    #[test]
    fn test_le_bytes() {
        let word = Word36::new(0o777777, 0o777777);
        assert_eq!(word.to_le_bytes(), [0xff, 0xff, 0xff, 0xff, 0x0f, 0, 0, 0]);
        let word = Word36::new(0o000001, 0o000003);
        assert_eq!(word.to_le_bytes(), [0x03, 0x00, 0x04, 0x00, 0x00, 0, 0, 0]);
    }

    #[test]
    fn test_octal_format() {
        assert_eq!(format!("{}", Word36::new(0o1, 0o777777)), "000001,,777777");
    }
}
