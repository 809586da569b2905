use crate::pack::FramePacking;
use crate::word::Word36;

/// High-density mode: two words are packed into nine frames with no unused
/// bits.  The fifth frame carries the last four bits of the first word and
/// the first four bits of the second.
///
/// A record with an odd number of words ends in a full nine-frame group
/// whose second half is zero.
pub struct HighDensity;

impl FramePacking for HighDensity {
    const FRAME_SIZE: usize = 9;
    const WORDS_PER_FRAME: usize = 2;

    fn unpack_frame(frame: &[u8], words: &mut [Word36]) {
        let b = |i: usize| u32::from(frame[i]);
        words[0] = Word36::new(
            (b(0) << 10) | (b(1) << 2) | (b(2) >> 6),
            ((b(2) & 0o77) << 12) | (b(3) << 4) | ((b(4) & 0o360) >> 4),
        );
        words[1] = Word36::new(
            ((b(4) & 0o17) << 14) | (b(5) << 6) | ((b(6) & 0o374) >> 2),
            ((b(6) & 0o3) << 16) | (b(7) << 8) | b(8),
        );
    }

    fn pack_frame(words: &[Word36], frame: &mut [u8]) {
        let even = words[0];
        let odd = words.get(1).copied().unwrap_or(Word36::ZERO);
        frame[0] = (even.high >> 10) as u8;
        frame[1] = (even.high >> 2) as u8;
        frame[2] = (((even.high & 0o3) << 6) | ((even.low >> 12) & 0o77)) as u8;
        frame[3] = (even.low >> 4) as u8;
        frame[4] = (((even.low & 0o17) << 4) | ((odd.high & 0o740000) >> 14)) as u8;
        frame[5] = (odd.high >> 6) as u8;
        frame[6] = (((odd.high & 0o77) << 2) | ((odd.low >> 16) & 0o3)) as u8;
        frame[7] = (odd.low >> 8) as u8;
        frame[8] = odd.low as u8;
    }
}
