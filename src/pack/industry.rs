use crate::pack::FramePacking;
use crate::text;
use crate::word::Word36;

/// Industry-compatible mode: the leftmost 32 bits of each word are written
/// as four 8-bit frames.  The rightmost four bits are discarded on write and
/// read back as zero.
pub struct Industry;

impl FramePacking for Industry {
    const FRAME_SIZE: usize = 4;

    fn unpack_frame(frame: &[u8], words: &mut [Word36]) {
        let b = |i: usize| u32::from(frame[i]);
        words[0] = Word36::new(
            (b(0) << 10) | (b(1) << 2) | (b(2) >> 6),
            ((b(2) & 0o77) << 12) | (b(3) << 4),
        );
    }

    fn pack_frame(words: &[Word36], frame: &mut [u8]) {
        frame.copy_from_slice(&text::decode_ascii8(words[0]));
    }
}
