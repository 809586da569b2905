use crate::pack::FramePacking;
use crate::word::Word36;

/// Native 9-track "core dump" mode: each word is written as five frames,
/// eight bits at a time from the left, with the final four bits of the word
/// right-justified in the fifth frame.
pub struct CoreDump;

impl FramePacking for CoreDump {
    const FRAME_SIZE: usize = 5;

    fn unpack_frame(frame: &[u8], words: &mut [Word36]) {
        let b = |i: usize| u32::from(frame[i]);
        words[0] = Word36::new(
            (b(0) << 10) | (b(1) << 2) | (b(2) >> 6),
            ((b(2) & 0o77) << 12) | (b(3) << 4) | (b(4) & 0o17),
        );
    }

    fn pack_frame(words: &[Word36], frame: &mut [u8]) {
        let Word36 { high, low } = words[0];
        frame[0] = (high >> 10) as u8;
        frame[1] = (high >> 2) as u8;
        frame[2] = (((high & 0o3) << 6) | ((low >> 12) & 0o77)) as u8;
        frame[3] = (low >> 4) as u8;
        frame[4] = (low & 0o17) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_dump_layout() {
        let words = [Word36::from_u64(0o123456_701234)];
        let mut bytes = [0u8; 5];
        assert_eq!(CoreDump::pack(&words, &mut bytes), 5);
        // Successive 8, 8, 8, 8 and 4 bit fields of the word.
        assert_eq!(bytes, [0x29, 0xcb, 0xb8, 0x29, 0x0c]);

        let mut unpacked = [Word36::ZERO; 1];
        assert_eq!(CoreDump::unpack(&bytes, &mut unpacked), Ok(1));
        assert_eq!(unpacked, words);
    }

    #[test]
    fn test_core_dump_ignores_high_nibble_of_last_frame() {
        let mut words = [Word36::ZERO; 1];
        CoreDump::unpack(&[0, 0, 0, 0, 0xf0], &mut words).unwrap();
        assert!(words[0].is_zero());
    }
}
