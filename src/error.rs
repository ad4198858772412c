//! Error types for EDF decoding and export operations.
//!
//! This module defines the [`Error`] enum which represents all possible failures
//! that can occur when decoding an EDF recording or streaming it into a sink.
//!
//! # Example
//!
//! ```no_run
//! use edf_stream::{EdfReader, Error, Result};
//!
//! fn inspect(path: &str) -> Result<()> {
//!     match EdfReader::open(path) {
//!         Ok(reader) => {
//!             println!("{} signals", reader.signals().len());
//!             Ok(())
//!         }
//!         Err(Error::TruncatedInput { section, expected, actual }) => {
//!             eprintln!("file cut short in {section}: need {expected} bytes, got {actual}");
//!             Err(Error::TruncatedInput { section, expected, actual })
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use core::fmt;

/// The region of an EDF file in which a failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The fixed 256-byte main header.
    MainHeader,
    /// The 256-bytes-per-signal header block following the main header.
    SignalHeader,
    /// A fixed-size data record, identified by its zero-based index.
    Record(usize),
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::MainHeader => write!(f, "main header"),
            Section::SignalHeader => write!(f, "signal header block"),
            Section::Record(idx) => write!(f, "record {idx}"),
        }
    }
}

/// Errors that can occur while decoding an EDF recording or writing a sink.
///
/// All errors are fatal to a pipeline run: there is no retry and no
/// partial-record recovery, because a corrupt record destroys byte alignment
/// for everything after it.
#[derive(Debug)]
pub enum Error {
    /// Fewer bytes were available than the format section requires.
    TruncatedInput {
        /// The file region that was being read
        section: Section,
        /// Number of bytes the section requires
        expected: usize,
        /// Number of bytes actually available
        actual: usize,
    },

    /// A required numeric sub-field did not parse as ASCII decimal.
    MalformedField {
        /// Name of the offending field (e.g. `"num_records"`)
        field: &'static str,
        /// The trimmed text that failed to parse
        value: String,
    },

    /// A signal's declared sample span exceeds the record buffer.
    ///
    /// This indicates a structural inconsistency between the header metadata
    /// and the actual record size.
    BufferOverrun {
        /// Index of the signal whose span overruns the buffer
        signal: usize,
        /// Index of the record being decoded
        record: usize,
        /// Bytes the signal's samples require
        needed: usize,
        /// Bytes remaining in the record buffer
        available: usize,
    },

    /// A sink method was invoked out of order.
    ///
    /// The JSON sink only produces a well-formed document for the exact
    /// sequence `open`, `write_record`*, `close`; any other ordering is
    /// rejected up front rather than corrupting the output.
    SinkState {
        /// The operation that was attempted
        operation: &'static str,
        /// The stage the sink was actually in
        stage: &'static str,
    },

    /// An I/O error occurred while reading the input or writing a sink.
    Io(std::io::Error),

    /// The JSON sink failed to serialize a value.
    Json(serde_json::Error),

    /// The SQLite sink failed to open, insert, or commit.
    Sqlite(rusqlite::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TruncatedInput {
                section,
                expected,
                actual,
            } => write!(
                f,
                "Truncated input in {section}: need {expected} bytes, got {actual}"
            ),
            Error::MalformedField { field, value } => {
                write!(f, "Malformed header field {field:?}: {value:?}")
            }
            Error::BufferOverrun {
                signal,
                record,
                needed,
                available,
            } => write!(
                f,
                "Signal {signal} overruns record {record}: needs {needed} bytes, {available} left"
            ),
            Error::SinkState { operation, stage } => {
                write!(f, "Sink cannot {operation} while {stage}")
            }
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Json(e) => write!(f, "JSON serialization error: {e}"),
            Error::Sqlite(e) => write!(f, "SQLite error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Sqlite(err)
    }
}

/// A specialized Result type for EDF operations.
pub type Result<T> = core::result::Result<T, Error>;
