//! This is a Rust library for working with magnetic tape images written by
//! 36-bit computers of the 1970's, such as the DEC PDP-10.  Tapes are stored
//! as SimH-format (.tap) container files, and their 36-bit words may be
//! packed into 8-bit tape frames in any of several incompatible ways.
//!
//! Features:
//!
//! * Read and write .tap files, including tape marks, erase gaps, records
//! flagged with data errors, and the end-of-medium marker.
//! * Skip the short noise records that appear in images of worn tapes.
//! * Estimate the position on a physical reel from its length and recording
//! density, and report when the end-of-tape marker would be passed.
//! * Pack and unpack words in core-dump, sixbit (7- and 9-track),
//! high-density, industry-compatible, and ANSI-ASCII modes.
//! * Convert between 36-bit words and 7-bit or 8-bit ASCII text, including
//! NUL-terminated (ASCIZ) strings and DEC version words.
//! * A sample `tape36` program that converts a tape image from one packing
//! mode to another.
//!
//! Current shortcomings:
//!
//! * A tape is opened either for reading or for writing; update mode is not
//! supported.
//! * Only the standard (non half-gap) form of .tap files is supported.
//! * Text codings other than ASCII (e.g. SIXBIT text or EBCDIC) are not
//! decoded.
//!
//! # Example
//!
//! The following example reads every record of a core-dump tape and prints
//! the first word of each:
//!
//! ```
//! use std::io;
//! use tape36::{PackingMode, Status, Tape, Word36};
//! # fn list_records(tape_image_filename: &str) -> io::Result<()> {
//!
//! let mut tape = Tape::open_read(tape_image_filename)?;
//! let mut buffer = vec![0u8; tape36::tape::MAX_RECORD_LENGTH];
//! let mut words = vec![Word36::ZERO; 8192];
//! loop {
//!     let record = tape.read(&mut buffer)?;
//!     match record.status {
//!         Status::EndOfMedium => break,
//!         Status::TapeMark | Status::EndOfFile => println!("<tape mark>"),
//!         _ => {
//!             let count = PackingMode::CoreDump.unpack(&buffer[..record.copied], &mut words)?;
//!             if count > 0 {
//!                 println!("{} words, starting with {}", count, words[0]);
//!             }
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Converting a whole tape is a single call:
//!
//! ```no_run
//! use tape36::{convert, ConvertOptions, PackingMode};
//! # fn main() -> std::io::Result<()> {
//!
//! let summary = convert(&ConvertOptions {
//!     input: "backup.tap".to_string(),
//!     output: "backup-hd.tap".to_string(),
//!     input_mode: PackingMode::CoreDump,
//!     output_mode: PackingMode::HighDensity,
//!     ..ConvertOptions::default()
//! })?;
//! println!("{} records copied", summary.records);
//! # Ok(())
//! # }
//! ```
//!
//! The accompanying `tape36` program does the same from the command line:
//!
//! ```text
//! tape36 -i core-dump -o high-density -v backup.tap backup-hd.tap
//! ```
//!
//! # Design
//!
//! The library is layered:
//!
//! 1. `Word36` holds one 36-bit word as two 18-bit halves.
//! 2. The `pack` module converts between words and frames.  Each mode is a
//!    `FramePacking` implementation, and `PackingMode` selects one at
//!    runtime.
//! 3. The `tape` module reads and writes records and markers in .tap files,
//!    without interpreting record contents.
//! 4. `convert_tapes()` joins the two, re-packing every record of one tape
//!    onto another.
//!
//! Malformed tape images and I/O failures are reported as `io::Error`s.
//! Those that originate in this crate carry a `TapeError`, which may be
//! recovered with `TapeError::from_io_error()`.  Tape marks, the end of the
//! medium, and the like are not errors, and are reported as a `Status`.
//!
//! # License
//!
//! Tape36 is distributed under the terms of both the MIT license and the
//! Apache License (Version 2.0).
//!
//! See LICENSE-APACHE and LICENSE-MIT for details.

pub mod pack;
pub mod tape;
pub mod text;

mod convert;
mod error;
mod util;
mod word;

pub use crate::convert::{convert, convert_tapes, ConvertOptions, ConvertSummary};
pub use crate::error::TapeError;
pub use crate::pack::PackingMode;
pub use crate::tape::{MarkType, Mode, Record, Status, Tape};
pub use crate::word::{Word36, HALFWORD_MASK, WORD_MASK};
