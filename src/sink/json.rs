//! Streaming JSON sink.
//!
//! Emits one document `{"header": ..., "signals": [...], "data": [rec, ...]}`
//! without ever holding more than one record in memory. The price of the O(1)
//! memory footprint is that the file only becomes valid JSON when `close`
//! writes the final brackets; a crash mid-stream leaves an unparseable
//! partial file.

use super::Sink;
use crate::header::Header;
use crate::record::Record;
use crate::signal::SignalDescriptor;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};

/// The sink's linear lifecycle. `write_record` is only legal in `Writing`,
/// which rules out emitting records before the shell or after the closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Created,
    Writing,
    Closed,
}

impl Stage {
    fn name(self) -> &'static str {
        match self {
            Stage::Created => "not yet opened",
            Stage::Writing => "already opened",
            Stage::Closed => "closed",
        }
    }
}

/// Sink that streams the recording into a single JSON document.
pub struct JsonSink<W: Write> {
    writer: W,
    stage: Stage,
    records_written: usize,
}

impl JsonSink<BufWriter<File>> {
    /// Create a sink writing to a new file at `path` with buffered I/O.
    pub fn create(path: &str) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonSink<W> {
    /// Create a sink over an arbitrary writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            stage: Stage::Created,
            records_written: 0,
        }
    }

    /// Consume the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn expect_stage(&self, wanted: Stage, operation: &'static str) -> Result<()> {
        if self.stage != wanted {
            return Err(Error::SinkState {
                operation,
                stage: self.stage.name(),
            });
        }
        Ok(())
    }
}

impl<W: Write> Sink for JsonSink<W> {
    fn open(&mut self, header: &Header, signals: &[SignalDescriptor]) -> Result<()> {
        self.expect_stage(Stage::Created, "open")?;

        self.writer.write_all(b"{\"header\":")?;
        serde_json::to_writer(&mut self.writer, header)?;
        self.writer.write_all(b",\"signals\":")?;
        serde_json::to_writer(&mut self.writer, signals)?;
        self.writer.write_all(b",\"data\":[")?;

        self.stage = Stage::Writing;
        Ok(())
    }

    fn write_record(&mut self, _index: usize, record: &Record) -> Result<()> {
        self.expect_stage(Stage::Writing, "write a record")?;

        if self.records_written > 0 {
            self.writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.writer, record)?;
        self.records_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.expect_stage(Stage::Writing, "close")?;

        self.writer.write_all(b"]}")?;
        self.writer.flush()?;
        self.stage = Stage::Closed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Header {
        Header {
            version: "0".into(),
            patient_id: "P".into(),
            recording_id: "R".into(),
            start_date: "01.01.01".into(),
            start_time: "00.00.00".into(),
            header_bytes: 512,
            reserved: String::new(),
            num_records: 2,
            record_duration: 1.0,
            num_signals: 1,
        }
    }

    fn signal() -> SignalDescriptor {
        SignalDescriptor {
            label: "sig".into(),
            transducer: String::new(),
            units: "uV".into(),
            physical_min: -32768.0,
            physical_max: 32767.0,
            digital_min: -32768,
            digital_max: 32767,
            prefiltering: String::new(),
            num_samples: 2,
            reserved: String::new(),
        }
    }

    fn record(samples: Vec<f64>) -> Record {
        Record::from(vec![samples])
    }

    #[test]
    fn document_is_valid_only_after_close() {
        let mut sink = JsonSink::new(Vec::new());
        sink.open(&header(), &[signal()]).unwrap();
        sink.write_record(0, &record(vec![10.0, 20.0])).unwrap();

        // Mid-stream output is intentionally not parseable
        assert!(serde_json::from_slice::<serde_json::Value>(sink.writer.as_slice()).is_err());

        sink.write_record(1, &record(vec![30.0, 40.0])).unwrap();
        sink.close().unwrap();

        let doc: serde_json::Value = serde_json::from_slice(sink.writer.as_slice()).unwrap();
        assert_eq!(doc["header"]["patient_id"], "P");
        assert_eq!(doc["signals"][0]["label"], "sig");
        let data = doc["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0], serde_json::json!([[10.0, 20.0]]));
        assert_eq!(data[1], serde_json::json!([[30.0, 40.0]]));
    }

    #[test]
    fn write_before_open_is_rejected() {
        let mut sink = JsonSink::new(Vec::new());
        match sink.write_record(0, &record(vec![1.0])).unwrap_err() {
            Error::SinkState { operation, stage } => {
                assert_eq!(operation, "write a record");
                assert_eq!(stage, "not yet opened");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn write_after_close_is_rejected() {
        let mut sink = JsonSink::new(Vec::new());
        sink.open(&header(), &[signal()]).unwrap();
        sink.close().unwrap();
        assert!(sink.write_record(0, &record(vec![1.0])).is_err());
        assert!(sink.close().is_err());
    }

    #[test]
    fn double_open_is_rejected() {
        let mut sink = JsonSink::new(Vec::new());
        sink.open(&header(), &[signal()]).unwrap();
        assert!(sink.open(&header(), &[signal()]).is_err());
    }

    #[test]
    fn empty_recording_closes_to_an_empty_data_array() {
        let mut sink = JsonSink::new(Vec::new());
        sink.open(&header(), &[]).unwrap();
        sink.close().unwrap();
        let doc: serde_json::Value = serde_json::from_slice(sink.writer.as_slice()).unwrap();
        assert_eq!(doc["data"], serde_json::json!([]));
    }
}
