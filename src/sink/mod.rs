//! Export sinks.
//!
//! A [`Sink`] consumes the decoded header, the signal descriptors, and the
//! record stream, persisting incrementally: the pipeline hands each record
//! over as soon as it is decoded and never retains it afterwards.
//!
//! Two implementations exist: [`JsonSink`] writes one streamed JSON document,
//! [`SqliteSink`] writes a relational SQLite database.

mod json;
mod sqlite;

pub use json::JsonSink;
pub use sqlite::SqliteSink;

use crate::header::Header;
use crate::record::Record;
use crate::signal::SignalDescriptor;
use crate::Result;

/// Destination abstraction for decoded recordings.
///
/// Call order is `open`, then `write_record` once per record in file order,
/// then `close`. Implementations are free to reject out-of-order calls with
/// [`crate::Error::SinkState`]. Any error is fatal to the run; no sink
/// guarantees usable partial output except where documented.
pub trait Sink {
    /// Persist recording metadata before any record arrives.
    ///
    /// For relational sinks this is also where per-signal identities are
    /// established, since record data must reference them.
    fn open(&mut self, header: &Header, signals: &[SignalDescriptor]) -> Result<()>;

    /// Persist one decoded record. `index` is the zero-based record number.
    fn write_record(&mut self, index: usize, record: &Record) -> Result<()>;

    /// Finish the output and make it durable.
    fn close(&mut self) -> Result<()>;
}
