//! Reading and writing SimH-format (.tap) magnetic tape images.
//!
//! A .tap file is a sequence of records.  Each data record is framed by a
//! pair of identical little-endian 32-bit length words:
//!
//! ```text
//! [length] [data ...] [pad byte if length is odd] [length]
//! ```
//!
//! A few length word values are reserved as markers, and are written
//! without data or a trailing copy:
//!
//! * `0x00000000`: tape mark
//! * `0xFFFFFFFE`: erase gap (skipped when reading)
//! * `0xFFFFFFFF`: end of medium
//!
//! For data records, bit 31 flags a record that was read from the original
//! medium with an error, bits 24–30 must be zero, and bits 0–23 hold the
//! length.
//!
//! Update mode (reading and writing the same tape) and tapes written with
//! half-length gaps are not supported.

mod reel;
mod stream;

use std::fmt;
use std::io;
use std::path::Path;

use crate::error::TapeError;
use crate::util;

pub use self::reel::Reel;
pub use self::stream::{TapeStream, STDINOUT_PSEUDOFILENAME};

const TAPE_MARK_CODE: u32 = 0x0000_0000;
const ERASE_GAP_CODE: u32 = 0xFFFF_FFFE;
const END_OF_MEDIUM_CODE: u32 = 0xFFFF_FFFF;

const DATA_ERROR_FLAG: u32 = 0x8000_0000;
const RESERVED_BITS: u32 = 0x7F00_0000;
const LENGTH_MASK: u32 = 0x00FF_FFFF;

/// The largest record the format can represent.
pub const MAX_RECORD_LENGTH: usize = LENGTH_MASK as usize;

/// Records shorter than this are assumed to be noise picked up while the
/// original tape was read, and are skipped.
pub const MIN_RECORD_LENGTH: usize = 14;

/// The outcome of a tape operation.  None of these are errors; malformed
/// tape files and I/O failures are reported through `io::Error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Record transferred.
    Ok,
    /// A tape mark was read.
    TapeMark,
    /// A second consecutive tape mark was read.
    EndOfFile,
    /// The record was flagged as containing an error on the source medium.
    DataError,
    /// No more data on the tape.
    EndOfMedium,
    /// The write carried the tape past the end-of-tape marker.  This is
    /// reported once per tape.
    EndOfTape,
    /// The record is larger than the supplied buffer and was truncated.
    BufferTooLarge,
}

/// Markers that may be written with `Tape::mark()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkType {
    TapeMark,
    EraseGap,
    EndOfMedium,
}

/// Whether a tape is opened for reading or for writing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

/// The result of reading one record from a tape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    pub status: Status,
    /// The length of the record on tape.  This may exceed `copied` when the
    /// status is `BufferTooLarge`.
    pub length: usize,
    /// The number of bytes placed in the caller's buffer.
    pub copied: usize,
    /// The record was flagged as containing an error on the source medium.
    pub data_error: bool,
}

impl Record {
    fn marker(status: Status) -> Record {
        Record {
            status,
            length: 0,
            copied: 0,
            data_error: false,
        }
    }
}

/// A tape image opened for sequential reading or writing.
///
/// Dropping a tape closes it, as `close()` does.
pub struct Tape {
    name: String,
    stream: TapeStream,
    writable: bool,
    file_number: u32,
    block_number: u32,
    /// A read or write failed; reads now return end of medium.
    error: bool,
    /// The last record read was a tape mark.
    tape_mark: bool,
    end_of_medium: bool,
    /// End of tape has been reported.
    past_eot: bool,
    closed: bool,
    reel: Option<Reel>,
}

impl Tape {
    fn new(name: String, stream: TapeStream) -> Tape {
        Tape {
            name,
            writable: stream.is_writable(),
            stream,
            file_number: 0,
            block_number: 0,
            error: false,
            tape_mark: false,
            end_of_medium: false,
            past_eot: false,
            closed: false,
            reel: None,
        }
    }

    /// Open a tape image file.  The name "-" refers to standard input or
    /// standard output, depending on `mode`.
    pub fn open<P: AsRef<Path>>(path: P, mode: Mode) -> io::Result<Tape> {
        let name = path.as_ref().display().to_string();
        let stream = match mode {
            Mode::Read => TapeStream::open_read(path)?,
            Mode::Write => TapeStream::open_write(path)?,
        };
        Ok(Tape::new(name, stream))
    }

    pub fn open_read<P: AsRef<Path>>(path: P) -> io::Result<Tape> {
        Tape::open(path, Mode::Read)
    }

    pub fn open_write<P: AsRef<Path>>(path: P) -> io::Result<Tape> {
        Tape::open(path, Mode::Write)
    }

    /// Open an in-memory tape image for reading.
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Tape {
        Tape::new(name.to_string(), TapeStream::from_bytes(bytes))
    }

    /// Open an in-memory tape image for writing.  The image is retrieved
    /// with `into_bytes()`.
    pub fn memory_writer(name: &str) -> Tape {
        Tape::new(name.to_string(), TapeStream::Memory(Vec::new()))
    }

    /// Enable the reel position model, which is needed to detect the
    /// end-of-tape marker when writing.  See `Reel::new()` for the accepted
    /// forms of `length` and `density`.
    pub fn set_size(&mut self, length: &str, density: &str) -> io::Result<()> {
        self.reel = Some(Reel::new(length, density)?);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Mode {
        if self.writable {
            Mode::Write
        } else {
            Mode::Read
        }
    }

    /// The number of tape marks passed.
    pub fn file_number(&self) -> u32 {
        self.file_number
    }

    /// The number of data records passed in the current file.
    pub fn block_number(&self) -> u32 {
        self.block_number
    }

    pub fn reel(&self) -> Option<&Reel> {
        self.reel.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn is_end_of_medium(&self) -> bool {
        self.end_of_medium
    }

    fn advance(&mut self, inches: f64) {
        if let Some(ref mut reel) = self.reel {
            reel.advance(inches);
        }
    }

    fn read_fully(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        self.stream.read_fully(buffer).map_err(|e| {
            self.error = true;
            e
        })
    }

    /// Read exactly `buffer.len()` bytes, treating a short read as a
    /// malformed tape.
    fn read_exact(&mut self, buffer: &mut [u8]) -> io::Result<()> {
        if self.read_fully(buffer)? != buffer.len() {
            return Err(self.format_error());
        }
        Ok(())
    }

    fn skip_exact(&mut self, count: u64) -> io::Result<()> {
        let skipped = self.stream.skip(count).map_err(|e| {
            self.error = true;
            e
        })?;
        if skipped != count {
            return Err(self.format_error());
        }
        Ok(())
    }

    fn format_error(&mut self) -> io::Error {
        self.error = true;
        TapeError::Format.to_io_error()
    }

    fn put(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes).map_err(|e| {
            self.error = true;
            e
        })
    }

    /// Read the next record into `buffer`.
    ///
    /// Erase gaps and noise records are skipped.  Once the end of the medium
    /// has been reached, or after any error, every further read returns
    /// `EndOfMedium`.  A file that ends without an end-of-medium marker is
    /// treated as though it had one.
    ///
    /// # Panics
    ///
    /// Panics if the tape was opened for writing.
    pub fn read(&mut self, buffer: &mut [u8]) -> io::Result<Record> {
        assert!(!self.writable, "{}: read from a tape opened for writing", self.name);

        loop {
            if self.error || self.end_of_medium {
                return Ok(Record::marker(Status::EndOfMedium));
            }

            let mut word = [0u8; 4];
            match self.read_fully(&mut word)? {
                0 => {
                    self.error = true;
                    return Ok(Record::marker(Status::EndOfMedium));
                }
                4 => {}
                _ => return Err(self.format_error()),
            }
            let code = u32::from_le_bytes(word);

            match code {
                TAPE_MARK_CODE => {
                    self.advance(reel::TAPE_MARK_INCHES);
                    self.file_number += 1;
                    if self.tape_mark {
                        self.block_number = 0;
                        return Ok(Record::marker(Status::EndOfFile));
                    }
                    self.tape_mark = true;
                    return Ok(Record::marker(Status::TapeMark));
                }
                ERASE_GAP_CODE => {
                    self.advance(reel::ERASE_GAP_INCHES);
                    continue;
                }
                _ => {}
            }

            if self.tape_mark {
                self.tape_mark = false;
                self.block_number = 0;
            }

            if code == END_OF_MEDIUM_CODE {
                self.end_of_medium = true;
                return Ok(Record::marker(Status::EndOfMedium));
            }
            if code & RESERVED_BITS != 0 {
                return Err(self.format_error());
            }

            let length = (code & LENGTH_MASK) as usize;
            let data_error = code & DATA_ERROR_FLAG != 0;
            if let Some(ref mut reel) = self.reel {
                reel.advance_record(length);
            }
            self.block_number += 1;

            // Anything that doesn't fit in the buffer is still consumed, so
            // that the next record can be found.
            let copied = length.min(buffer.len());
            self.read_exact(&mut buffer[..copied])?;
            self.skip_exact(((length - copied) + (length & 1)) as u64)?;

            let mut trailer = [0u8; 4];
            self.read_exact(&mut trailer)?;
            if u32::from_le_bytes(trailer) != code {
                return Err(self.format_error());
            }

            if length < MIN_RECORD_LENGTH {
                log::warn!("Noise record (length = {}) at {}", length, self);
                log::debug!("{}", util::hex(&buffer[..copied]));
                continue;
            }

            let status = if copied < length {
                Status::BufferTooLarge
            } else if data_error {
                Status::DataError
            } else {
                Status::Ok
            };
            return Ok(Record {
                status,
                length,
                copied,
                data_error,
            });
        }
    }

    /// Write one data record, optionally flagged as having been read with an
    /// error.  Odd-length records get a zero pad byte before the trailing
    /// length word, which readers expect, so callers need not pad records
    /// themselves.
    ///
    /// Returns `EndOfTape` (once) when the record carries the tape past the
    /// end-of-tape marker, and `EndOfMedium`, without writing, after an
    /// end-of-medium marker has been written.
    ///
    /// # Panics
    ///
    /// Panics if the tape was opened for reading, or if `data` is longer
    /// than `MAX_RECORD_LENGTH`.
    pub fn write(&mut self, data: &[u8], data_error: bool) -> io::Result<Status> {
        assert!(self.writable, "{}: write to a tape opened for reading", self.name);
        assert!(
            data.len() <= MAX_RECORD_LENGTH,
            "{}: record length {} too long for tape format",
            self.name,
            data.len()
        );

        if self.end_of_medium {
            return Ok(Status::EndOfMedium);
        }

        let mut code = data.len() as u32;
        if data_error {
            code |= DATA_ERROR_FLAG;
        }
        let word = code.to_le_bytes();
        self.put(&word)?;
        self.put(data)?;
        if data.len() & 1 != 0 {
            self.put(&[0])?;
        }
        self.put(&word)?;
        self.block_number += 1;

        if let Some(ref mut reel) = self.reel {
            reel.advance_record(data.len());
            if reel.past_eot() && !self.past_eot {
                self.past_eot = true;
                return Ok(Status::EndOfTape);
            }
        }
        Ok(Status::Ok)
    }

    /// Write a tape mark, erase gap, or end-of-medium marker.
    ///
    /// # Panics
    ///
    /// Panics if the tape was opened for reading.
    pub fn mark(&mut self, mark: MarkType) -> io::Result<()> {
        assert!(self.writable, "{}: write to a tape opened for reading", self.name);

        let code = match mark {
            MarkType::TapeMark => {
                self.block_number = 0;
                self.file_number += 1;
                self.advance(reel::TAPE_MARK_INCHES);
                TAPE_MARK_CODE
            }
            MarkType::EraseGap => {
                self.advance(reel::ERASE_GAP_INCHES);
                ERASE_GAP_CODE
            }
            MarkType::EndOfMedium => {
                self.end_of_medium = true;
                END_OF_MEDIUM_CODE
            }
        };
        self.put(&code.to_le_bytes())
    }

    /// Finish the tape.  Tapes being written are terminated with an
    /// end-of-medium marker if one hasn't been written.  Errors are logged
    /// rather than returned.
    fn finish(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if self.writable && !self.end_of_medium {
            if let Err(e) = self.mark(MarkType::EndOfMedium) {
                log::warn!("{}: {}", self.name, e);
            }
        }
        if let Err(e) = self.stream.flush() {
            log::warn!("{}: {}", self.name, e);
        }
    }

    pub fn close(mut self) {
        self.finish();
    }

    /// Close an in-memory tape opened with `memory_writer()` and return the
    /// tape image.  Returns `None` for other tapes.
    pub fn into_bytes(mut self) -> Option<Vec<u8>> {
        self.finish();
        self.stream.close()
    }
}

impl Drop for Tape {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Describe the current position on the tape, e.g. for error messages.
impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "file {}, record {} of {}",
            self.file_number, self.block_number, self.name
        )?;
        if let Some(ref reel) = self.reel {
            write!(f, ", at {}", reel)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::{Read, Write};
    use std::rc::Rc;

    /// A stream whose every read and write fails, counting write attempts.
    struct BrokenStream {
        writes: Rc<Cell<usize>>,
    }

    impl Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device not ready"))
        }
    }

    impl Write for BrokenStream {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.writes.set(self.writes.get() + 1);
            Err(io::Error::new(io::ErrorKind::Other, "device not ready"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(length: u32, data: &[u8]) -> Vec<u8> {
        let mut bytes = length.to_le_bytes().to_vec();
        bytes.extend_from_slice(data);
        if data.len() & 1 != 0 {
            bytes.push(0);
        }
        bytes.extend_from_slice(&length.to_le_bytes());
        bytes
    }

    #[test]
    fn test_write_framing() {
        let mut tape = Tape::memory_writer("test");
        assert_eq!(tape.write(&[0x55; 15], false).unwrap(), Status::Ok);
        assert_eq!(tape.write(&[0xaa; 16], true).unwrap(), Status::Ok);
        tape.mark(MarkType::TapeMark).unwrap();
        tape.mark(MarkType::EraseGap).unwrap();

        let mut expected = record(15, &[0x55; 15]);
        expected.extend(record(0x8000_0010, &[0xaa; 16]));
        expected.extend_from_slice(&[0, 0, 0, 0]);
        expected.extend_from_slice(&[0xfe, 0xff, 0xff, 0xff]);
        expected.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(tape.into_bytes().unwrap(), expected);
    }

    #[test]
    fn test_close_does_not_repeat_end_of_medium() {
        let mut tape = Tape::memory_writer("test");
        tape.mark(MarkType::EndOfMedium).unwrap();
        assert_eq!(tape.write(&[0; 20], false).unwrap(), Status::EndOfMedium);
        assert_eq!(tape.into_bytes().unwrap(), vec![0xff; 4]);
    }

    #[test]
    fn test_read_statuses() {
        let mut bytes = record(20, &[1; 20]);
        bytes.extend(record(0x8000_0014, &[2; 20]));
        bytes.extend_from_slice(&[0xfe, 0xff, 0xff, 0xff]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend(record(21, &[3; 21]));
        bytes.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
        let mut tape = Tape::from_bytes("test", bytes);
        let mut buffer = [0u8; 64];

        let r = tape.read(&mut buffer).unwrap();
        assert_eq!((r.status, r.length, r.copied), (Status::Ok, 20, 20));
        assert_eq!(buffer[..20], [1; 20]);
        let r = tape.read(&mut buffer).unwrap();
        assert_eq!((r.status, r.data_error), (Status::DataError, true));
        assert_eq!(format!("{}", tape), "file 0, record 2 of test");
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::TapeMark);
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::EndOfFile);
        assert_eq!(tape.file_number(), 2);
        assert_eq!(tape.block_number(), 0);
        let r = tape.read(&mut buffer).unwrap();
        assert_eq!((r.status, r.length), (Status::Ok, 21));
        assert_eq!(buffer[..21], [3; 21]);
        assert_eq!(tape.block_number(), 1);
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::EndOfMedium);
        assert!(tape.is_end_of_medium());
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::EndOfMedium);
    }

    #[test]
    fn test_missing_end_of_medium() {
        let mut tape = Tape::from_bytes("test", record(20, &[1; 20]));
        let mut buffer = [0u8; 64];
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::Ok);
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::EndOfMedium);
    }

    #[test]
    fn test_buffer_too_large() {
        let mut bytes = record(31, &[7; 31]);
        bytes.extend(record(16, &[8; 16]));
        let mut tape = Tape::from_bytes("test", bytes);
        let mut buffer = [0u8; 20];
        let r = tape.read(&mut buffer).unwrap();
        assert_eq!(r.status, Status::BufferTooLarge);
        assert_eq!((r.length, r.copied), (31, 20));
        assert_eq!(buffer, [7; 20]);
        // The remainder of the long record was skipped.
        let r = tape.read(&mut buffer).unwrap();
        assert_eq!((r.status, r.length), (Status::Ok, 16));
        assert_eq!(buffer[..16], [8; 16]);
    }

    #[test]
    fn test_noise_records_skipped() {
        let mut bytes = record(13, &[9; 13]);
        bytes.extend(record(0x8000_0000, &[]));
        bytes.extend(record(14, &[4; 14]));
        let mut tape = Tape::from_bytes("test", bytes);
        let mut buffer = [0u8; 64];
        let r = tape.read(&mut buffer).unwrap();
        assert_eq!((r.status, r.length), (Status::Ok, 14));
        assert_eq!(tape.block_number(), 3);
    }

    #[test]
    fn test_reserved_bits() {
        let mut tape = Tape::from_bytes("test", record(0x0100_0010, &[0; 16]));
        let mut buffer = [0u8; 64];
        let e = tape.read(&mut buffer).unwrap_err();
        assert!(e == TapeError::Format);
        assert!(tape.has_error());
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::EndOfMedium);
    }

    #[test]
    fn test_truncated_length_word() {
        let mut tape = Tape::from_bytes("test", vec![0x10, 0x00]);
        let mut buffer = [0u8; 64];
        assert!(tape.read(&mut buffer).unwrap_err() == TapeError::Format);
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::EndOfMedium);
    }

    #[test]
    fn test_truncated_data() {
        let mut tape = Tape::from_bytes("test", record(20, &[1; 20])[..16].to_vec());
        let mut buffer = [0u8; 64];
        assert!(tape.read(&mut buffer).unwrap_err() == TapeError::Format);
    }

    #[test]
    fn test_position_report() {
        let mut tape = Tape::memory_writer("out.tap");
        assert_eq!(format!("{}", tape), "file 0, record 0 of out.tap");
        tape.set_size("2400", "1600").unwrap();
        assert_eq!(format!("{}", tape), "file 0, record 0 of out.tap, at 16.0 ft");
        tape.mark(MarkType::TapeMark).unwrap();
        assert_eq!(tape.file_number(), 1);
        assert_eq!(tape.reel().unwrap().position_inches(), 195.0);
        assert!(tape.set_size("10", "1600").unwrap_err() == TapeError::ReelTooShort);
        assert!(tape.reel().is_some());
    }

    #[test]
    fn test_read_io_error() {
        let writes = Rc::new(Cell::new(0));
        let stream = TapeStream::Input(Box::new(BrokenStream { writes }));
        let mut tape = Tape::new("broken".to_string(), stream);
        let mut buffer = [0u8; 64];
        let e = tape.read(&mut buffer).unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::Other);
        assert_eq!(TapeError::from_io_error(&e), None);
        assert!(tape.has_error());
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::EndOfMedium);
    }

    #[test]
    fn test_write_io_error() {
        let writes = Rc::new(Cell::new(0));
        let stream = TapeStream::Output(Box::new(BrokenStream {
            writes: writes.clone(),
        }));
        let mut tape = Tape::new("broken".to_string(), stream);
        let e = tape.write(&[0; 16], false).unwrap_err();
        assert_eq!(TapeError::from_io_error(&e), None);
        assert!(tape.has_error());
        let attempts = writes.get();
        assert!(attempts > 0);

        // Later writes still reach the stream.
        assert!(tape.write(&[0; 16], false).is_err());
        assert!(writes.get() > attempts);
    }

    #[test]
    fn test_read_advances_position() {
        let mut bytes = record(20, &[1; 20]);
        bytes.extend_from_slice(&[0xfe, 0xff, 0xff, 0xff]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        let mut tape = Tape::from_bytes("sized", bytes);
        tape.set_size("2400", "1600").unwrap();
        let start = tape.reel().unwrap().position_inches();
        let position = |tape: &Tape| tape.reel().unwrap().position_inches() - start;
        let mut buffer = [0u8; 64];

        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::Ok);
        let after_record = 0.6 + 29.0 / 1600.0;
        assert!((position(&tape) - after_record).abs() < 1e-9);

        // The erase gap is skipped on the way to the tape mark.
        assert_eq!(tape.read(&mut buffer).unwrap().status, Status::TapeMark);
        assert!((position(&tape) - (after_record + 6.0)).abs() < 1e-9);
    }

    #[test]
    #[should_panic]
    fn test_read_from_write_tape() {
        let mut tape = Tape::memory_writer("test");
        let _ = tape.read(&mut [0u8; 16]);
    }

    #[test]
    #[should_panic]
    fn test_write_to_read_tape() {
        let mut tape = Tape::from_bytes("test", vec![]);
        let _ = tape.write(&[0; 16], false);
    }

    #[test]
    #[should_panic]
    fn test_record_too_long() {
        let mut tape = Tape::memory_writer("test");
        let data = vec![0u8; MAX_RECORD_LENGTH + 1];
        let _ = tape.write(&data, false);
    }
}
