//! Re-pack the records of a tape image from one packing mode to another.

use std::io;

use crate::error::TapeError;
use crate::pack::PackingMode;
use crate::tape::{MarkType, Status, Tape, MAX_RECORD_LENGTH, STDINOUT_PSEUDOFILENAME};
use crate::word::Word36;

/// Everything needed to run a conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertOptions {
    /// Input tape image, or "-" for standard input.
    pub input: String,
    /// Output tape image, or "-" for standard output.
    pub output: String,
    pub input_mode: PackingMode,
    pub output_mode: PackingMode,
    /// Reel length and density, enabling end-of-tape detection.  Both or
    /// neither must be given.
    pub length: Option<String>,
    pub density: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> ConvertOptions {
        ConvertOptions {
            input: STDINOUT_PSEUDOFILENAME.to_string(),
            output: STDINOUT_PSEUDOFILENAME.to_string(),
            input_mode: PackingMode::default(),
            output_mode: PackingMode::default(),
            length: None,
            density: None,
        }
    }
}

/// Counts of what was copied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub records: usize,
    /// Records that carried the data error flag.
    pub data_errors: usize,
    pub tape_marks: usize,
    pub words: u64,
    /// The output passed the end-of-tape marker.
    pub end_of_tape: bool,
}

/// Open the input and output tapes named in `options` and convert.  Both
/// tapes are closed before returning, even when conversion fails.
pub fn convert(options: &ConvertOptions) -> io::Result<ConvertSummary> {
    match (&options.length, &options.density) {
        (Some(_), None) => return Err(TapeError::InvalidDensity.to_io_error()),
        (None, Some(_)) => return Err(TapeError::InvalidLength.to_io_error()),
        _ => {}
    }

    let mut input = Tape::open_read(&options.input)?;
    log::info!("Reading {} in {} mode", input.name(), options.input_mode);
    let mut output = Tape::open_write(&options.output)?;
    log::info!("Writing {} in {} mode", output.name(), options.output_mode);

    if let (Some(length), Some(density)) = (&options.length, &options.density) {
        input.set_size(length, density)?;
        output.set_size(length, density)?;
    }

    let result = convert_tapes(
        &mut input,
        &mut output,
        options.input_mode,
        options.output_mode,
    );
    if let Ok(ref summary) = result {
        log::info!(
            "Completed: {} records, {} with errors, {} tape marks",
            summary.records,
            summary.data_errors,
            summary.tape_marks
        );
    }
    input.close();
    output.close();
    result
}

/// Copy every record from `input` to `output`, unpacking with `input_mode`
/// and re-packing with `output_mode`.  Tape marks are copied and the data
/// error flag is preserved.  Conversion ends at the input's end of medium.
pub fn convert_tapes(
    input: &mut Tape,
    output: &mut Tape,
    input_mode: PackingMode,
    output_mode: PackingMode,
) -> io::Result<ConvertSummary> {
    let mut buffer = vec![0u8; MAX_RECORD_LENGTH];
    let mut words = vec![Word36::ZERO; input_mode.word_capacity(MAX_RECORD_LENGTH)];
    let mut packed = vec![0u8; output_mode.packed_len(words.len())];
    let mut summary = ConvertSummary::default();

    loop {
        let record = match input.read(&mut buffer) {
            Ok(record) => record,
            Err(e) => {
                match TapeError::from_io_error(&e) {
                    Some(TapeError::Format) => {
                        log::error!("Input tape file format error at {}", input)
                    }
                    _ => log::error!("Error reading tape file: {} at {}", e, input),
                }
                return Err(e);
            }
        };

        match record.status {
            Status::Ok | Status::DataError => {}
            Status::EndOfMedium => {
                log::info!("End of medium at {}", input);
                break;
            }
            Status::TapeMark | Status::EndOfFile => {
                log::info!("Tape mark at {}", input);
                if let Err(e) = output.mark(MarkType::TapeMark) {
                    log::error!("Error writing tape mark: {} at {}", e, output);
                    return Err(e);
                }
                summary.tape_marks += 1;
                continue;
            }
            Status::BufferTooLarge | Status::EndOfTape => {
                unreachable!("{:?} reading into a maximum size buffer", record.status)
            }
        }

        let word_count = match input_mode.unpack(&buffer[..record.copied], &mut words) {
            Ok(word_count) => word_count,
            Err(e) => {
                log::error!(
                    "Invalid record size {} for {} mode at {}",
                    record.length,
                    input_mode,
                    input
                );
                return Err(e.into());
            }
        };
        let length = output_mode.pack(&words[..word_count], &mut packed);
        if length > MAX_RECORD_LENGTH {
            log::error!(
                "Record of {} words is too large in {} mode at {}",
                word_count,
                output_mode,
                input
            );
            return Err(TapeError::RecordTooLarge.into());
        }

        let status = match output.write(&packed[..length], record.data_error) {
            Ok(status) => status,
            Err(e) => {
                log::error!("Error writing tape file: {} at {}", e, output);
                return Err(e);
            }
        };
        summary.records += 1;
        summary.words += word_count as u64;
        if record.data_error {
            summary.data_errors += 1;
        }
        match status {
            Status::Ok => {}
            Status::EndOfTape => {
                log::warn!("End of tape at {}", output);
                summary.end_of_tape = true;
            }
            Status::EndOfMedium => {
                log::warn!("Output is past end of medium at {}", output);
                break;
            }
            _ => unreachable!("{:?} writing a record", status),
        }
    }

    Ok(summary)
}
