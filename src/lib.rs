#![forbid(unsafe_code)]

//! # edf-stream
//!
//! A Rust library for decoding EDF (European Data Format) biosignal
//! recordings and streaming them into JSON or SQLite.
//!
//! EDF is a fixed-layout binary format widely used for physiological
//! waveform recordings (EEG, ECG, polysomnography): a 256-byte ASCII main
//! header, a field-major ASCII signal header block, and then fixed-size data
//! records of interleaved little-endian 16-bit samples. This crate decodes
//! the headers into typed metadata, derives per-signal digital-to-physical
//! scaling, and streams each record through a sink without ever holding the
//! whole file in memory.
//!
//! ## Features
//!
//! - **Streaming decode**: one record in flight at a time, O(1) memory
//! - **Physical units**: samples arrive rescaled through each signal's
//!   declared physical/digital ranges
//! - **JSON export**: one streamed document with header, signals and data
//! - **SQLite export**: relational layout with per-record transactions
//! - **Chart projection**: re-shape decoded data for charting frontends
//!
//! ## Quick Start
//!
//! ### Converting a recording
//!
//! ```no_run
//! use edf_stream::{export_to_json, export_to_sqlite, Result};
//!
//! fn main() -> Result<()> {
//!     let summary = export_to_json("night01.edf", "night01.json")?;
//!     println!("wrote {} records", summary.records);
//!
//!     export_to_sqlite("night01.edf", "night01.db")?;
//!     Ok(())
//! }
//! ```
//!
//! ### Streaming records yourself
//!
//! ```no_run
//! use edf_stream::{EdfReader, Result};
//!
//! fn main() -> Result<()> {
//!     let mut reader = EdfReader::open("night01.edf")?;
//!     for signal in reader.signals() {
//!         println!("{} [{}], {} samples/record", signal.label, signal.units, signal.num_samples);
//!     }
//!
//!     while let Some(record) = reader.next_record()? {
//!         let eeg = record.signal(0).unwrap_or(&[]);
//!         println!("{} samples", eeg.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Custom sinks
//!
//! ```no_run
//! use edf_stream::{EdfReader, Pipeline, JsonSink, Result};
//!
//! fn main() -> Result<()> {
//!     let reader = EdfReader::open("night01.edf")?;
//!     let sink = JsonSink::new(Vec::new());
//!     let summary = Pipeline::new(reader, sink).run()?;
//!     println!("{} records from {} signals", summary.records, summary.signals);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`header`] | Main header decoding |
//! | [`signal`] | Field-major signal header block decoding |
//! | [`scaling`] | Digital-to-physical affine scaling |
//! | [`record`] | Record decoding |
//! | [`reader`] | Streaming reader over any `Read` source |
//! | [`sink`] | Export sinks (JSON, SQLite) |
//! | [`pipeline`] | Reader-to-sink pipeline and path-based helpers |
//! | [`chart`] | Presentation projection |
//! | [`error`] | Error types and [`Result`] alias |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `core::result::Result<T, Error>`. Every error is fatal to a run: a corrupt
//! record cannot be skipped without losing byte alignment for everything
//! after it, so the pipeline aborts and releases its resources instead of
//! attempting recovery.

pub mod chart;
pub mod error;
pub mod header;
pub mod pipeline;
pub mod reader;
pub mod record;
pub mod scaling;
pub mod signal;
pub mod sink;

// Re-export commonly used types at the crate root
pub use chart::{ChartData, Dataset, chart_data};
pub use error::{Error, Result, Section};
pub use header::Header;
pub use pipeline::{Pipeline, RunSummary, export_to_json, export_to_sqlite};
pub use reader::EdfReader;
pub use record::Record;
pub use scaling::ScalingFactor;
pub use signal::SignalDescriptor;
pub use sink::{JsonSink, Sink, SqliteSink};
