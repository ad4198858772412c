//! Decode-and-export pipeline.
//!
//! [`Pipeline`] owns exactly one input reader and one sink for its lifetime
//! and drives the single forward pass over the recording: open the sink with
//! the decoded metadata, hand over each record as soon as it is decoded, then
//! close. Both resources are released on every exit path, success or failure,
//! simply by the pipeline going out of scope.

use crate::reader::EdfReader;
use crate::sink::{JsonSink, Sink, SqliteSink};
use crate::Result;
use std::io::Read;

/// Counters describing a completed pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records decoded and handed to the sink.
    pub records: usize,
    /// Signals in the recording.
    pub signals: usize,
}

/// One decoding run: a reader streaming into a sink.
pub struct Pipeline<R, S> {
    reader: EdfReader<R>,
    sink: S,
}

impl<R: Read, S: Sink> Pipeline<R, S> {
    /// Pair a reader with a sink. The pipeline takes ownership of both.
    pub fn new(reader: EdfReader<R>, sink: S) -> Self {
        Self { reader, sink }
    }

    /// Run the pipeline to completion.
    ///
    /// Strictly sequential: one record is in flight at a time, and every
    /// record reaches the sink before the next one is read. The first error
    /// from either side aborts the run; no partial output is guaranteed valid
    /// beyond what the sink itself documents.
    pub fn run(mut self) -> Result<RunSummary> {
        self.sink.open(self.reader.header(), self.reader.signals())?;

        let mut records = 0;
        while let Some(record) = self.reader.next_record()? {
            self.sink.write_record(records, &record)?;
            records += 1;
        }

        self.sink.close()?;
        Ok(RunSummary {
            records,
            signals: self.reader.signals().len(),
        })
    }
}

/// Convert an EDF file into a single JSON document.
pub fn export_to_json(input_path: &str, output_path: &str) -> Result<RunSummary> {
    let reader = EdfReader::open(input_path)?;
    let sink = JsonSink::create(output_path)?;
    Pipeline::new(reader, sink).run()
}

/// Convert an EDF file into a SQLite database.
pub fn export_to_sqlite(input_path: &str, db_path: &str) -> Result<RunSummary> {
    let reader = EdfReader::open(input_path)?;
    let sink = SqliteSink::create(db_path)?;
    Pipeline::new(reader, sink).run()
}
