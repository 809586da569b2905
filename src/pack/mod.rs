//! Conversion between 36-bit words and the tape frames of each packing
//! mode.
//!
//! A 9-track tape frame holds eight data bits, and a 7-track frame six, so a
//! 36-bit word never maps onto frames one-to-one.  Each mode chooses a
//! different compromise:
//!
//! | Mode           | Frames       | Notes                                      |
//! |----------------|--------------|--------------------------------------------|
//! | `core-dump`    | 5 / word     | Native 9-track; last frame holds 4 bits.   |
//! | `sixbit-7`     | 6 / word     | Six bits per frame.                        |
//! | `sixbit-9`     | 6 / word     | Same encoding as `sixbit-7` in .tap files. |
//! | `high-density` | 9 / 2 words  | 72 bits packed with no waste.              |
//! | `industry`     | 4 / word     | Low 4 bits of each word are lost.          |
//! | `ansi-ascii`   | 5 / word     | Five 7-bit characters plus one bit.        |
//!
//! In .tap files, 7-track frames are stored right-justified in a byte, which
//! is why the two sixbit modes share one implementation.

mod ansi_ascii;
mod core_dump;
mod high_density;
mod industry;
mod sixbit;

use std::fmt;

use crate::error::TapeError;
use crate::word::Word36;

pub use self::ansi_ascii::AnsiAscii;
pub use self::core_dump::CoreDump;
pub use self::high_density::HighDensity;
pub use self::industry::Industry;
pub use self::sixbit::Sixbit;

/// A frame packing scheme.  A frame group of `FRAME_SIZE` bytes carries
/// `WORDS_PER_FRAME` words.
pub trait FramePacking {
    const FRAME_SIZE: usize;
    const WORDS_PER_FRAME: usize = 1;

    /// Decode one frame group into exactly `WORDS_PER_FRAME` words.
    fn unpack_frame(frame: &[u8], words: &mut [Word36]);

    /// Encode between one and `WORDS_PER_FRAME` words into one frame group.
    /// Frames for missing words are zero-filled.
    fn pack_frame(words: &[Word36], frame: &mut [u8]);

    /// The number of bytes needed to pack `word_count` words.
    fn packed_len(word_count: usize) -> usize {
        ((word_count + Self::WORDS_PER_FRAME - 1) / Self::WORDS_PER_FRAME) * Self::FRAME_SIZE
    }

    /// Unpack `bytes` into `words`, returning the number of words produced.
    /// Words beyond the capacity of `words` are dropped.
    ///
    /// Fails with `InvalidFrameLength` if `bytes` is not a whole number of
    /// frame groups.
    fn unpack(bytes: &[u8], words: &mut [Word36]) -> Result<usize, TapeError> {
        if bytes.len() % Self::FRAME_SIZE != 0 {
            return Err(TapeError::InvalidFrameLength);
        }
        let word_count = (bytes.len() / Self::FRAME_SIZE * Self::WORDS_PER_FRAME).min(words.len());

        let mut scratch = [Word36::ZERO; 2];
        let scratch = &mut scratch[..Self::WORDS_PER_FRAME];
        let groups = bytes
            .chunks_exact(Self::FRAME_SIZE)
            .zip(words[..word_count].chunks_mut(Self::WORDS_PER_FRAME));
        for (frame, words) in groups {
            Self::unpack_frame(frame, scratch);
            words.copy_from_slice(&scratch[..words.len()]);
        }
        Ok(word_count)
    }

    /// Pack `words` into `bytes`, returning the number of bytes produced.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than `packed_len(words.len())`.
    fn pack(words: &[Word36], bytes: &mut [u8]) -> usize {
        let length = Self::packed_len(words.len());
        assert!(
            bytes.len() >= length,
            "pack buffer too small: {} bytes needed, {} available",
            length,
            bytes.len()
        );
        let groups = words
            .chunks(Self::WORDS_PER_FRAME)
            .zip(bytes[..length].chunks_exact_mut(Self::FRAME_SIZE));
        for (words, frame) in groups {
            Self::pack_frame(words, frame);
        }
        length
    }
}

/// The packing modes that may be selected for reading or writing a tape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackingMode {
    CoreDump,
    Sixbit7,
    Sixbit9,
    HighDensity,
    Industry,
    AnsiAscii,
}

/// Mode names accepted by `PackingMode::from_name()`, in the order they are
/// listed in help text.  "sixbit" is an alias for "sixbit-9".
static MODE_NAMES: &[(&str, PackingMode)] = &[
    ("core-dump", PackingMode::CoreDump),
    ("sixbit-7", PackingMode::Sixbit7),
    ("sixbit-9", PackingMode::Sixbit9),
    ("sixbit", PackingMode::Sixbit9),
    ("high-density", PackingMode::HighDensity),
    ("industry", PackingMode::Industry),
    ("ansi-ascii", PackingMode::AnsiAscii),
];

impl PackingMode {
    pub const ALL: [PackingMode; 6] = [
        PackingMode::CoreDump,
        PackingMode::Sixbit7,
        PackingMode::Sixbit9,
        PackingMode::HighDensity,
        PackingMode::Industry,
        PackingMode::AnsiAscii,
    ];

    /// Look up a mode by name, ignoring case.
    pub fn from_name(name: &str) -> Option<PackingMode> {
        MODE_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, mode)| mode)
    }

    /// All accepted names, including aliases.
    pub fn names() -> impl Iterator<Item = &'static str> {
        MODE_NAMES.iter().map(|&(name, _)| name)
    }

    pub fn name(self) -> &'static str {
        match self {
            PackingMode::CoreDump => "core-dump",
            PackingMode::Sixbit7 => "sixbit-7",
            PackingMode::Sixbit9 => "sixbit-9",
            PackingMode::HighDensity => "high-density",
            PackingMode::Industry => "industry",
            PackingMode::AnsiAscii => "ansi-ascii",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PackingMode::CoreDump => "9-Track native format, 5 frames/36-bit word",
            PackingMode::Sixbit7 => "7-Track sixbit format, 6 frames/36-bit word",
            PackingMode::Sixbit9 => "9-Track sixbit format, 6 frames/36-bit word",
            PackingMode::HighDensity => "9-Track high-density, 9 frames/72-bit doubleword",
            PackingMode::Industry => "9-Track industry-compatible format, 4 frames/32-bit byte",
            PackingMode::AnsiAscii => {
                "9-Track ANSI-ASCII format, 5 frames of 7-bit ASCII/36-bit word"
            }
        }
    }

    /// Bytes in one frame group.
    pub fn frame_size(self) -> usize {
        match self {
            PackingMode::CoreDump => CoreDump::FRAME_SIZE,
            PackingMode::Sixbit7 | PackingMode::Sixbit9 => Sixbit::FRAME_SIZE,
            PackingMode::HighDensity => HighDensity::FRAME_SIZE,
            PackingMode::Industry => Industry::FRAME_SIZE,
            PackingMode::AnsiAscii => AnsiAscii::FRAME_SIZE,
        }
    }

    /// Words carried by one frame group.
    pub fn words_per_frame(self) -> usize {
        match self {
            PackingMode::CoreDump => CoreDump::WORDS_PER_FRAME,
            PackingMode::Sixbit7 | PackingMode::Sixbit9 => Sixbit::WORDS_PER_FRAME,
            PackingMode::HighDensity => HighDensity::WORDS_PER_FRAME,
            PackingMode::Industry => Industry::WORDS_PER_FRAME,
            PackingMode::AnsiAscii => AnsiAscii::WORDS_PER_FRAME,
        }
    }

    /// Average number of frames used per word.
    pub fn frames_per_word(self) -> f64 {
        self.frame_size() as f64 / self.words_per_frame() as f64
    }

    /// The number of bytes needed to pack `word_count` words.
    pub fn packed_len(self, word_count: usize) -> usize {
        match self {
            PackingMode::CoreDump => CoreDump::packed_len(word_count),
            PackingMode::Sixbit7 | PackingMode::Sixbit9 => Sixbit::packed_len(word_count),
            PackingMode::HighDensity => HighDensity::packed_len(word_count),
            PackingMode::Industry => Industry::packed_len(word_count),
            PackingMode::AnsiAscii => AnsiAscii::packed_len(word_count),
        }
    }

    /// The most words that a record of `byte_count` bytes can unpack into.
    pub fn word_capacity(self, byte_count: usize) -> usize {
        let frames = (byte_count + self.frame_size() - 1) / self.frame_size();
        frames * self.words_per_frame()
    }

    /// Unpack a record into words.  See `FramePacking::unpack()`.
    pub fn unpack(self, bytes: &[u8], words: &mut [Word36]) -> Result<usize, TapeError> {
        match self {
            PackingMode::CoreDump => CoreDump::unpack(bytes, words),
            PackingMode::Sixbit7 | PackingMode::Sixbit9 => Sixbit::unpack(bytes, words),
            PackingMode::HighDensity => HighDensity::unpack(bytes, words),
            PackingMode::Industry => Industry::unpack(bytes, words),
            PackingMode::AnsiAscii => AnsiAscii::unpack(bytes, words),
        }
    }

    /// Pack words into a record.  See `FramePacking::pack()`.
    pub fn pack(self, words: &[Word36], bytes: &mut [u8]) -> usize {
        match self {
            PackingMode::CoreDump => CoreDump::pack(words, bytes),
            PackingMode::Sixbit7 | PackingMode::Sixbit9 => Sixbit::pack(words, bytes),
            PackingMode::HighDensity => HighDensity::pack(words, bytes),
            PackingMode::Industry => Industry::pack(words, bytes),
            PackingMode::AnsiAscii => AnsiAscii::pack(words, bytes),
        }
    }
}

impl Default for PackingMode {
    fn default() -> PackingMode {
        PackingMode::CoreDump
    }
}

impl fmt::Display for PackingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the table of mode names and descriptions shown in help text.
pub fn mode_help() -> String {
    MODE_NAMES
        .iter()
        .map(|&(name, mode)| format!("    {:<15} {}\n", name, mode.description()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(PackingMode::from_name("core-dump"), Some(PackingMode::CoreDump));
        assert_eq!(PackingMode::from_name("SIXBIT"), Some(PackingMode::Sixbit9));
        assert_eq!(PackingMode::from_name("Sixbit-7"), Some(PackingMode::Sixbit7));
        assert_eq!(PackingMode::from_name("High-Density"), Some(PackingMode::HighDensity));
        assert_eq!(PackingMode::from_name("ebcdic"), None);
        for mode in PackingMode::ALL.iter() {
            assert_eq!(PackingMode::from_name(mode.name()), Some(*mode));
        }
        assert_eq!(PackingMode::names().count(), 7);
    }

    #[test]
    fn test_sizes() {
        let sizes: Vec<(usize, f64)> = PackingMode::ALL
            .iter()
            .map(|m| (m.frame_size(), m.frames_per_word()))
            .collect();
        assert_eq!(
            sizes,
            vec![(5, 5.0), (6, 6.0), (6, 6.0), (9, 4.5), (4, 4.0), (5, 5.0)]
        );
        assert_eq!(PackingMode::HighDensity.packed_len(0), 0);
        assert_eq!(PackingMode::HighDensity.packed_len(1), 9);
        assert_eq!(PackingMode::HighDensity.packed_len(2), 9);
        assert_eq!(PackingMode::HighDensity.packed_len(3), 18);
        assert_eq!(PackingMode::Industry.packed_len(3), 12);
        assert_eq!(PackingMode::HighDensity.word_capacity(18), 4);
        assert_eq!(PackingMode::CoreDump.word_capacity(11), 3);
    }

    #[test]
    fn test_invalid_frame_length() {
        let bytes = [0u8; 64];
        let mut words = [Word36::ZERO; 64];
        for mode in PackingMode::ALL.iter() {
            let size = mode.frame_size();
            for length in 0..bytes.len() {
                let result = mode.unpack(&bytes[..length], &mut words);
                if length % size == 0 {
                    assert_eq!(result, Ok(length / size * mode.words_per_frame()));
                } else {
                    assert_eq!(result, Err(TapeError::InvalidFrameLength), "{} {}", mode, length);
                }
            }
        }
    }

    #[test]
    fn test_unpack_truncates_to_capacity() {
        let words_in: Vec<Word36> = (1..=6u64).map(|v| Word36::from_u64(v * 0o1010100)).collect();
        for mode in PackingMode::ALL.iter() {
            let mut bytes = vec![0u8; mode.packed_len(words_in.len())];
            mode.pack(&words_in, &mut bytes);
            let mut words_out = [Word36::ZERO; 3];
            assert_eq!(mode.unpack(&bytes, &mut words_out), Ok(3));
            assert_eq!(words_out[0], words_in[0]);
        }
    }

    #[test]
    fn test_empty() {
        for mode in PackingMode::ALL.iter() {
            assert_eq!(mode.pack(&[], &mut []), 0);
            assert_eq!(mode.unpack(&[], &mut []), Ok(0));
        }
    }

    #[test]
    #[should_panic]
    fn test_pack_buffer_too_small() {
        let words = [Word36::ZERO; 3];
        let mut bytes = [0u8; 17];
        PackingMode::HighDensity.pack(&words, &mut bytes);
    }

    #[test]
    fn test_mode_help() {
        let help = mode_help();
        assert_eq!(help.lines().count(), 7);
        assert!(help.contains("    high-density    9-Track high-density"));
    }
}
