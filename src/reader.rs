//! High-level streaming reader.
//!
//! [`EdfReader`] owns the input byte source for the lifetime of a run. Both
//! header regions are decoded eagerly on construction; data records are then
//! streamed one at a time, so peak memory stays at one raw record buffer plus
//! one decoded record regardless of recording length.

use crate::header::{Header, MAIN_HEADER_SIZE};
use crate::record::{Record, bytes_per_record, decode_record};
use crate::scaling::{ScalingFactor, derive_scalings};
use crate::signal::{SIGNAL_HEADER_SIZE, SignalDescriptor, parse_signal_headers};
use crate::{Error, Result, error::Section};
use std::fs::File;
use std::io::{BufReader, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Next record to decode (0-based). Reached `Done` once all are streamed.
    Reading(usize),
    Done,
    /// A read or decode failed. Byte alignment is lost, so the reader stays
    /// failed instead of resynchronizing.
    Failed,
}

/// Streaming decoder for one EDF input.
///
/// Construction reads and decodes the main header and the signal header
/// block; [`next_record`](Self::next_record) then yields decoded records in
/// file order until exactly `Header::record_count()` records have been
/// produced.
#[derive(Debug)]
pub struct EdfReader<R> {
    reader: R,
    header: Header,
    signals: Vec<SignalDescriptor>,
    scalings: Vec<ScalingFactor>,
    record_size: usize,
    /// Raw record scratch buffer, reused across records.
    buffer: Vec<u8>,
    state: ReaderState,
}

impl EdfReader<BufReader<File>> {
    /// Open an EDF file from disk with buffered I/O.
    pub fn open(path: &str) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> EdfReader<R> {
    /// Decode the header regions from `reader` and prepare record streaming.
    ///
    /// The reader must be positioned at offset 0 of the recording. Fails with
    /// [`Error::TruncatedInput`] if either header region is cut short, in
    /// which case no partial metadata is exposed.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut header_bytes = [0u8; MAIN_HEADER_SIZE];
        let got = read_up_to(&mut reader, &mut header_bytes)?;
        if got < MAIN_HEADER_SIZE {
            return Err(Error::TruncatedInput {
                section: Section::MainHeader,
                expected: MAIN_HEADER_SIZE,
                actual: got,
            });
        }
        let header = Header::from_bytes(&header_bytes)?;

        let mut block = vec![0u8; SIGNAL_HEADER_SIZE * header.num_signals];
        let got = read_up_to(&mut reader, &mut block)?;
        if got < block.len() {
            return Err(Error::TruncatedInput {
                section: Section::SignalHeader,
                expected: block.len(),
                actual: got,
            });
        }
        let signals = parse_signal_headers(&block, header.num_signals)?;
        let scalings = derive_scalings(&signals);
        let record_size = bytes_per_record(&signals);

        let state = if header.record_count() == 0 {
            ReaderState::Done
        } else {
            ReaderState::Reading(0)
        };

        Ok(Self {
            reader,
            header,
            signals,
            scalings,
            record_size,
            buffer: vec![0u8; record_size],
            state,
        })
    }

    /// Recording-level metadata.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Per-signal descriptors, in file order. The index is the signal's
    /// identity everywhere downstream.
    pub fn signals(&self) -> &[SignalDescriptor] {
        &self.signals
    }

    /// Derived digital-to-physical factors, aligned with [`signals`](Self::signals).
    pub fn scalings(&self) -> &[ScalingFactor] {
        &self.scalings
    }

    /// Size in bytes of one raw data record.
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Decode the next record, or `Ok(None)` once all records are streamed.
    ///
    /// A short read fails with [`Error::TruncatedInput`] naming the record
    /// index; a header/record-size mismatch fails with
    /// [`Error::BufferOverrun`]. After any failure the reader is spent and
    /// further calls keep failing.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let index = match self.state {
            ReaderState::Reading(index) => index,
            ReaderState::Done => return Ok(None),
            ReaderState::Failed => {
                return Err(Error::Io(std::io::Error::other(
                    "reader failed on an earlier record",
                )));
            }
        };

        let record = self.read_record_at(index).inspect_err(|_| {
            self.state = ReaderState::Failed;
        })?;

        self.state = if index + 1 < self.header.record_count() {
            ReaderState::Reading(index + 1)
        } else {
            ReaderState::Done
        };
        Ok(Some(record))
    }

    fn read_record_at(&mut self, index: usize) -> Result<Record> {
        let got = read_up_to(&mut self.reader, &mut self.buffer)?;
        if got < self.record_size {
            return Err(Error::TruncatedInput {
                section: Section::Record(index),
                expected: self.record_size,
                actual: got,
            });
        }
        decode_record(&self.buffer, &self.signals, &self.scalings, index)
    }

    /// Iterate the remaining records.
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }

    /// Decode all remaining records into memory.
    ///
    /// Only appropriate for presentation projections that need the full
    /// record set; the streaming path never calls this.
    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        self.records().collect()
    }
}

/// Iterator over the remaining records of an [`EdfReader`].
pub struct Records<'a, R> {
    reader: &'a mut EdfReader<R>,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_record().transpose()
    }
}

/// Fill `buf` from `reader`, returning how many bytes were actually read.
/// Stops early only at end of input; `Interrupted` reads are retried.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(filled)
}
