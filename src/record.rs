//! Record decoding.
//!
//! A data record is one time slice across all signals: for each signal, in
//! header order, `num_samples` consecutive little-endian 16-bit signed
//! integers. Decoding maps each raw value through its signal's scaling factor
//! into physical units.

use crate::scaling::ScalingFactor;
use crate::signal::SignalDescriptor;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Bytes per raw sample. The format's only supported sample width.
pub const SAMPLE_SIZE: usize = 2;

/// One decoded time slice: outer index is the signal, inner the physical-unit
/// sample values that signal contributed to the record.
///
/// Records are transient: the streamer produces one, the sink consumes it,
/// and it is dropped before the next one is read. Serializes as a plain
/// array-of-arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Vec<Vec<f64>>);

impl Record {
    /// Sample values of all signals, indexed by signal.
    pub fn signals(&self) -> &[Vec<f64>] {
        &self.0
    }

    /// Sample values for one signal, if the index is in range.
    pub fn signal(&self, index: usize) -> Option<&[f64]> {
        self.0.get(index).map(Vec::as_slice)
    }

    /// Consume the record, returning the per-signal sample sequences.
    pub fn into_inner(self) -> Vec<Vec<f64>> {
        self.0
    }
}

impl From<Vec<Vec<f64>>> for Record {
    fn from(signals: Vec<Vec<f64>>) -> Self {
        Record(signals)
    }
}

/// Size in bytes of one raw data record for the given signal layout.
pub fn bytes_per_record(signals: &[SignalDescriptor]) -> usize {
    signals.iter().map(|s| s.num_samples * SAMPLE_SIZE).sum()
}

/// Decode one raw record buffer into physical-unit samples.
///
/// `scalings` must be aligned with `signals` by index. `record_index` is only
/// used to identify the record in errors. Returns [`Error::BufferOverrun`]
/// when a signal's declared span exceeds the buffer, which means the header
/// metadata and the record size disagree.
pub fn decode_record(
    buffer: &[u8],
    signals: &[SignalDescriptor],
    scalings: &[ScalingFactor],
    record_index: usize,
) -> Result<Record> {
    let mut data = Vec::with_capacity(signals.len());
    let mut offset = 0;

    for (sig_idx, signal) in signals.iter().enumerate() {
        let needed = signal.num_samples * SAMPLE_SIZE;
        if offset + needed > buffer.len() {
            return Err(Error::BufferOverrun {
                signal: sig_idx,
                record: record_index,
                needed,
                available: buffer.len() - offset,
            });
        }

        let factors = scalings[sig_idx];
        let samples = buffer[offset..offset + needed]
            .chunks_exact(SAMPLE_SIZE)
            .map(|pair| factors.apply(i16::from_le_bytes([pair[0], pair[1]])))
            .collect();
        data.push(samples);
        offset += needed;
    }

    Ok(Record(data))
}
