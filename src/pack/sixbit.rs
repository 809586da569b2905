use crate::pack::FramePacking;
use crate::word::Word36;

/// Sixbit mode: six frames per word, six bits per frame, right-justified.
/// Used for both 7-track and 9-track tapes.  The top two bits of each frame
/// are ignored when reading.
pub struct Sixbit;

impl FramePacking for Sixbit {
    const FRAME_SIZE: usize = 6;

    fn unpack_frame(frame: &[u8], words: &mut [Word36]) {
        let b = |i: usize| u32::from(frame[i] & 0o77);
        words[0] = Word36::new(
            (b(0) << 12) | (b(1) << 6) | b(2),
            (b(3) << 12) | (b(4) << 6) | b(5),
        );
    }

    fn pack_frame(words: &[Word36], frame: &mut [u8]) {
        let Word36 { high, low } = words[0];
        frame[0] = ((high >> 12) & 0o77) as u8;
        frame[1] = ((high >> 6) & 0o77) as u8;
        frame[2] = (high & 0o77) as u8;
        frame[3] = ((low >> 12) & 0o77) as u8;
        frame[4] = ((low >> 6) & 0o77) as u8;
        frame[5] = (low & 0o77) as u8;
    }
}
