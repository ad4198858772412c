//! Relational SQLite sink.
//!
//! Persists the recording as three tables: `header` (one row), `signals`
//! (one row per signal, referencing the header row) and `data` (one row per
//! (signal, record) pair, with the record's samples for that signal encoded
//! as a blob of consecutive little-endian IEEE f64 values).
//!
//! Signal identity is the rowid SQLite assigned when the signal row was
//! inserted; the sink records these ids during `open` and never assumes they
//! form a 1-based sequence. Each `write_record` call runs inside one
//! transaction, so a failure mid-record rolls back only that record's
//! inserts.

use super::Sink;
use crate::header::Header;
use crate::record::Record;
use crate::signal::SignalDescriptor;
use crate::{Error, Result};
use rusqlite::{Connection, params};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS header (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    version TEXT,
    patient_id TEXT,
    recording_id TEXT,
    start_date TEXT,
    start_time TEXT,
    reserved TEXT,
    header_bytes INTEGER,
    num_records INTEGER,
    record_duration REAL,
    num_signals INTEGER
);

CREATE TABLE IF NOT EXISTS signals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    header_id INTEGER,
    label TEXT,
    transducer TEXT,
    units TEXT,
    physical_min REAL,
    physical_max REAL,
    digital_min INTEGER,
    digital_max INTEGER,
    prefiltering TEXT,
    num_samples INTEGER,
    reserved TEXT,
    FOREIGN KEY(header_id) REFERENCES header(id)
);

CREATE TABLE IF NOT EXISTS data (
    signal_id INTEGER,
    record_number INTEGER,
    samples BLOB,
    PRIMARY KEY (signal_id, record_number),
    FOREIGN KEY(signal_id) REFERENCES signals(id)
);
";

/// Sink that persists the recording into a SQLite database.
pub struct SqliteSink {
    conn: Connection,
    /// Rowids assigned to the signal rows, aligned by signal index.
    signal_ids: Vec<i64>,
    opened: bool,
}

impl SqliteSink {
    /// Open (or create) a database file at `path`.
    pub fn create(path: &str) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = OFF;",
        )?;
        Ok(Self {
            conn,
            signal_ids: Vec::new(),
            opened: false,
        })
    }

    /// Rowids of the signal rows, aligned with the signal descriptors passed
    /// to [`Sink::open`]. Empty before `open`.
    pub fn signal_ids(&self) -> &[i64] {
        &self.signal_ids
    }

    /// Read back the sample sequence persisted for one (signal, record) pair.
    pub fn read_samples(&self, signal_id: i64, record_number: usize) -> Result<Vec<f64>> {
        let blob: Vec<u8> = self.conn.query_row(
            "SELECT samples FROM data WHERE signal_id = ?1 AND record_number = ?2",
            params![signal_id, record_number as i64],
            |row| row.get(0),
        )?;
        Ok(blob_to_samples(&blob))
    }

    /// Consume the sink, returning the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl Sink for SqliteSink {
    fn open(&mut self, header: &Header, signals: &[SignalDescriptor]) -> Result<()> {
        if self.opened {
            return Err(Error::SinkState {
                operation: "open",
                stage: "already opened",
            });
        }

        let tx = self.conn.transaction()?;
        tx.execute_batch(SCHEMA)?;

        tx.execute(
            "INSERT INTO header (
                version, patient_id, recording_id, start_date, start_time,
                reserved, header_bytes, num_records, record_duration, num_signals
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                header.version,
                header.patient_id,
                header.recording_id,
                header.start_date,
                header.start_time,
                header.reserved,
                header.header_bytes,
                header.num_records,
                header.record_duration,
                header.num_signals as i64,
            ],
        )?;
        let header_id = tx.last_insert_rowid();

        let mut signal_ids = Vec::with_capacity(signals.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO signals (
                    header_id, label, transducer, units, physical_min, physical_max,
                    digital_min, digital_max, prefiltering, num_samples, reserved
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for signal in signals {
                stmt.execute(params![
                    header_id,
                    signal.label,
                    signal.transducer,
                    signal.units,
                    signal.physical_min,
                    signal.physical_max,
                    signal.digital_min,
                    signal.digital_max,
                    signal.prefiltering,
                    signal.num_samples as i64,
                    signal.reserved,
                ])?;
                signal_ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;

        self.signal_ids = signal_ids;
        self.opened = true;
        Ok(())
    }

    fn write_record(&mut self, index: usize, record: &Record) -> Result<()> {
        if !self.opened {
            return Err(Error::SinkState {
                operation: "write a record",
                stage: "not yet opened",
            });
        }

        // All inserts for one record commit together or not at all; a failure
        // here rolls back on drop.
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO data (signal_id, record_number, samples) VALUES (?1, ?2, ?3)",
            )?;
            for (signal_id, samples) in self.signal_ids.iter().zip(record.signals()) {
                stmt.execute(params![signal_id, index as i64, samples_to_blob(samples)])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.opened {
            return Err(Error::SinkState {
                operation: "close",
                stage: "not yet opened",
            });
        }
        // Everything is committed per record; nothing left to flush.
        Ok(())
    }
}

/// Encode samples as consecutive little-endian f64 values.
fn samples_to_blob(samples: &[f64]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(samples.len() * 8);
    for sample in samples {
        blob.extend_from_slice(&sample.to_le_bytes());
    }
    blob
}

/// Decode a blob written by [`samples_to_blob`]. Trailing partial values are
/// ignored.
pub fn blob_to_samples(blob: &[u8]) -> Vec<f64> {
    blob.chunks_exact(8)
        .map(|chunk| f64::from_le_bytes(chunk.try_into().expect("chunk of 8")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(num_signals: usize) -> Header {
        Header {
            version: "0".into(),
            patient_id: "P".into(),
            recording_id: "R".into(),
            start_date: "01.01.01".into(),
            start_time: "00.00.00".into(),
            header_bytes: 256 + 256 * num_signals as i64,
            reserved: String::new(),
            num_records: 1,
            record_duration: 1.0,
            num_signals,
        }
    }

    fn signal(label: &str) -> SignalDescriptor {
        SignalDescriptor {
            label: label.into(),
            transducer: String::new(),
            units: "uV".into(),
            physical_min: 0.0,
            physical_max: 1.0,
            digital_min: 0,
            digital_max: 1,
            prefiltering: String::new(),
            num_samples: 2,
            reserved: String::new(),
        }
    }

    #[test]
    fn persists_header_signals_and_blobs() {
        let mut sink = SqliteSink::open_in_memory().unwrap();
        sink.open(&header(2), &[signal("a"), signal("b")]).unwrap();
        assert_eq!(sink.signal_ids().len(), 2);

        let record = Record::from(vec![vec![0.5, -1.25], vec![3.0, 4.0]]);
        sink.write_record(0, &record).unwrap();
        sink.close().unwrap();

        let ids = sink.signal_ids().to_vec();
        assert_eq!(sink.read_samples(ids[0], 0).unwrap(), vec![0.5, -1.25]);
        assert_eq!(sink.read_samples(ids[1], 0).unwrap(), vec![3.0, 4.0]);

        let conn = sink.into_connection();
        let patient: String = conn
            .query_row("SELECT patient_id FROM header", [], |row| row.get(0))
            .unwrap();
        assert_eq!(patient, "P");
        let labels: Vec<String> = conn
            .prepare("SELECT label FROM signals ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(labels, ["a", "b"]);
    }

    #[test]
    fn signal_ids_are_the_assigned_rowids() {
        let mut sink = SqliteSink::open_in_memory().unwrap();
        // Pre-seed the signals table so fresh rowids do not start at 1.
        sink.conn.execute_batch(SCHEMA).unwrap();
        sink.conn
            .execute_batch("INSERT INTO signals (label) VALUES ('stale'); DELETE FROM signals;")
            .unwrap();

        sink.open(&header(1), &[signal("live")]).unwrap();
        assert_eq!(sink.signal_ids(), [2]);

        sink.write_record(0, &Record::from(vec![vec![7.0, 8.0]]))
            .unwrap();
        assert_eq!(sink.read_samples(2, 0).unwrap(), vec![7.0, 8.0]);
    }

    #[test]
    fn write_before_open_is_rejected() {
        let mut sink = SqliteSink::open_in_memory().unwrap();
        let err = sink
            .write_record(0, &Record::from(vec![vec![1.0]]))
            .unwrap_err();
        assert!(matches!(err, Error::SinkState { .. }));
    }

    #[test]
    fn failed_record_rolls_back_completely() {
        let mut sink = SqliteSink::open_in_memory().unwrap();
        sink.open(&header(2), &[signal("a"), signal("b")]).unwrap();

        let record = Record::from(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        sink.write_record(0, &record).unwrap();
        // Same record number again violates the primary key mid-transaction;
        // the duplicate row for signal a must not survive either.
        assert!(sink.write_record(0, &record).is_err());

        let rows: i64 = sink
            .conn
            .query_row("SELECT COUNT(*) FROM data", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn blob_encoding_is_little_endian_f64() {
        let blob = samples_to_blob(&[1.0, -2.5]);
        assert_eq!(blob.len(), 16);
        assert_eq!(&blob[0..8], &1.0f64.to_le_bytes());
        assert_eq!(&blob[8..16], &(-2.5f64).to_le_bytes());
        assert_eq!(blob_to_samples(&blob), vec![1.0, -2.5]);
    }
}
