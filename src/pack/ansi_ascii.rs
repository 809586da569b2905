use crate::pack::FramePacking;
use crate::text;
use crate::word::Word36;

const PARITY_BIT: u8 = 0o200;

/// ANSI-ASCII mode: each word is written as five 7-bit characters, one per
/// frame.  Bit 35 of the word (bit 0 of the right half) is recorded in the
/// high bit of the fifth frame.
pub struct AnsiAscii;

impl FramePacking for AnsiAscii {
    const FRAME_SIZE: usize = 5;

    fn unpack_frame(frame: &[u8], words: &mut [Word36]) {
        let b = |i: usize| u32::from(frame[i] & 0o177);
        let bit35 = u32::from(frame.iter().fold(0, |acc, &b| acc | b) >> 7);
        words[0] = Word36::new(
            (b(0) << 11) | (b(1) << 4) | (b(2) >> 3),
            ((b(2) & 0o7) << 15) | (b(3) << 8) | (b(4) << 1) | bit35,
        );
    }

    fn pack_frame(words: &[Word36], frame: &mut [u8]) {
        frame.copy_from_slice(&text::decode_ascii7(words[0]));
        if words[0].low & 1 != 0 {
            frame[4] |= PARITY_BIT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ansi_ascii_layout() {
        let words = [Word36::from_u64(0o406050_342212)];
        let mut bytes = [0u8; 5];
        assert_eq!(AnsiAscii::pack(&words, &mut bytes), 5);
        assert_eq!(&bytes, b"ABCDE");

        let words = [Word36::from_u64(0o406050_342213)];
        AnsiAscii::pack(&words, &mut bytes);
        assert_eq!(bytes, [b'A', b'B', b'C', b'D', b'E' | 0x80]);
        let mut unpacked = [Word36::ZERO; 1];
        assert_eq!(AnsiAscii::unpack(&bytes, &mut unpacked), Ok(1));
        assert_eq!(unpacked, words);
    }

    #[test]
    fn test_ansi_ascii_high_bit_anywhere() {
        let mut unpacked = [Word36::ZERO; 1];
        AnsiAscii::unpack(&[b'A' | 0x80, b'B', b'C', b'D', b'E'], &mut unpacked).unwrap();
        assert_eq!(unpacked[0], Word36::from_u64(0o406050_342213));
    }
}
