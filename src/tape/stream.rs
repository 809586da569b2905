use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::mem;
use std::path::Path;

/// If a dash is specified for a filename, this indicates that the user wants
/// to read from standard input or write to standard output.
pub const STDINOUT_PSEUDOFILENAME: &str = "-";

/// Provide backing storage (file, standard stream, or memory) for a tape.
/// A tape is only ever read or written, never both.
pub enum TapeStream {
    Input(Box<dyn Read>),
    Output(Box<dyn Write>),
    Memory(Vec<u8>),
    Closed,
}

impl TapeStream {
    pub fn open_read<P: AsRef<Path>>(path: P) -> io::Result<TapeStream> {
        let path = path.as_ref();
        if path == Path::new(STDINOUT_PSEUDOFILENAME) {
            Ok(TapeStream::Input(Box::new(io::stdin())))
        } else {
            Ok(TapeStream::Input(Box::new(BufReader::new(File::open(path)?))))
        }
    }

    pub fn open_write<P: AsRef<Path>>(path: P) -> io::Result<TapeStream> {
        let path = path.as_ref();
        if path == Path::new(STDINOUT_PSEUDOFILENAME) {
            Ok(TapeStream::Output(Box::new(BufWriter::new(io::stdout()))))
        } else {
            Ok(TapeStream::Output(Box::new(BufWriter::new(File::create(path)?))))
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> TapeStream {
        TapeStream::Input(Box::new(Cursor::new(bytes)))
    }

    pub fn is_writable(&self) -> bool {
        match self {
            TapeStream::Input(_) => false,
            TapeStream::Output(_) | TapeStream::Memory(_) => true,
            TapeStream::Closed => false,
        }
    }

    /// Read until `buffer` is full or the end of the stream is reached, and
    /// return the number of bytes read.
    pub fn read_fully(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let reader = match self {
            TapeStream::Input(reader) => reader,
            _ => panic!("read from a tape that is not open for reading"),
        };
        let mut total = 0;
        while total < buffer.len() {
            match reader.read(&mut buffer[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(total)
    }

    /// Discard up to `count` bytes, returning the number actually skipped.
    pub fn skip(&mut self, count: u64) -> io::Result<u64> {
        match self {
            TapeStream::Input(reader) => io::copy(&mut reader.by_ref().take(count), &mut io::sink()),
            _ => panic!("read from a tape that is not open for reading"),
        }
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self {
            TapeStream::Output(writer) => writer.write_all(bytes),
            TapeStream::Memory(vec) => {
                vec.extend_from_slice(bytes);
                Ok(())
            }
            _ => panic!("write to a tape that is not open for writing"),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            TapeStream::Output(writer) => writer.flush(),
            _ => Ok(()),
        }
    }

    /// Close the stream.  For memory streams, the written bytes are returned.
    pub fn close(&mut self) -> Option<Vec<u8>> {
        match mem::replace(self, TapeStream::Closed) {
            TapeStream::Memory(vec) => Some(vec),
            _ => None,
        }
    }
}
