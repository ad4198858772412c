//! Signal header block decoding.
//!
//! After the main header comes a block of `256 * num_signals` bytes holding
//! one descriptor per signal. The block is FIELD-MAJOR: each of the ten
//! fields is stored for all signals back-to-back (all labels, then all
//! transducers, ...), not as one 256-byte row per signal. Reading it
//! signal-major yields garbage, so all access goes through one strided
//! routine that keeps the layout in a single place.

use crate::header::{trimmed, parse_f64, parse_i64, parse_usize};
use crate::{Error, Result, error::Section};
use serde::{Deserialize, Serialize};

/// Bytes of signal header per signal.
pub const SIGNAL_HEADER_SIZE: usize = 256;

/// Field widths in block order. These sum to [`SIGNAL_HEADER_SIZE`].
const FIELD_WIDTHS: [usize; 10] = [16, 80, 8, 8, 8, 8, 8, 80, 8, 32];

const LABEL: usize = 0;
const TRANSDUCER: usize = 1;
const UNITS: usize = 2;
const PHYSICAL_MIN: usize = 3;
const PHYSICAL_MAX: usize = 4;
const DIGITAL_MIN: usize = 5;
const DIGITAL_MAX: usize = 6;
const PREFILTERING: usize = 7;
const NUM_SAMPLES: usize = 8;
const RESERVED: usize = 9;

/// One signal's metadata from the signal header block.
///
/// Position in the decoded list is the signal's identity: record layout,
/// scaling factors and sink rows are all aligned by this index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDescriptor {
    pub label: String,
    pub transducer: String,
    pub units: String,
    pub physical_min: f64,
    pub physical_max: f64,
    pub digital_min: i32,
    pub digital_max: i32,
    pub prefiltering: String,
    /// Samples this signal contributes to each data record.
    pub num_samples: usize,
    pub reserved: String,
}

/// Strided access into the field-major block: entry `i` of a field group
/// starting at `start` with per-entry `width` bytes.
#[derive(Debug, Clone, Copy)]
struct StridedField {
    start: usize,
    width: usize,
}

impl StridedField {
    fn entry<'a>(&self, block: &'a [u8], index: usize) -> &'a [u8] {
        let begin = self.start + index * self.width;
        &block[begin..begin + self.width]
    }
}

/// Compute the start offset of every field group for `num_signals` signals.
/// Group `k` starts where group `k-1`'s `num_signals` entries end.
fn field_layout(num_signals: usize) -> [StridedField; 10] {
    let mut fields = [StridedField { start: 0, width: 0 }; 10];
    let mut offset = 0;
    for (slot, width) in fields.iter_mut().zip(FIELD_WIDTHS) {
        *slot = StridedField {
            start: offset,
            width,
        };
        offset += width * num_signals;
    }
    fields
}

/// Decode the signal header block for `num_signals` signals.
///
/// `block` must hold at least `256 * num_signals` bytes; otherwise
/// [`Error::TruncatedInput`] is returned and no partial descriptors are
/// produced. Numeric fields left blank default to zero (real-world files
/// legitimately leave them empty); non-blank text that fails to parse is a
/// [`Error::MalformedField`].
pub fn parse_signal_headers(block: &[u8], num_signals: usize) -> Result<Vec<SignalDescriptor>> {
    let expected = SIGNAL_HEADER_SIZE * num_signals;
    if block.len() < expected {
        return Err(Error::TruncatedInput {
            section: Section::SignalHeader,
            expected,
            actual: block.len(),
        });
    }

    let fields = field_layout(num_signals);
    let mut signals = Vec::with_capacity(num_signals);
    for i in 0..num_signals {
        signals.push(SignalDescriptor {
            label: trimmed(fields[LABEL].entry(block, i)),
            transducer: trimmed(fields[TRANSDUCER].entry(block, i)),
            units: trimmed(fields[UNITS].entry(block, i)),
            physical_min: lenient_f64(fields[PHYSICAL_MIN].entry(block, i), "physical_min")?,
            physical_max: lenient_f64(fields[PHYSICAL_MAX].entry(block, i), "physical_max")?,
            digital_min: lenient_i32(fields[DIGITAL_MIN].entry(block, i), "digital_min")?,
            digital_max: lenient_i32(fields[DIGITAL_MAX].entry(block, i), "digital_max")?,
            prefiltering: trimmed(fields[PREFILTERING].entry(block, i)),
            num_samples: lenient_usize(fields[NUM_SAMPLES].entry(block, i), "num_samples")?,
            reserved: trimmed(fields[RESERVED].entry(block, i)),
        });
    }
    Ok(signals)
}

fn lenient_f64(bytes: &[u8], field: &'static str) -> Result<f64> {
    if trimmed(bytes).is_empty() {
        return Ok(0.0);
    }
    parse_f64(bytes, field)
}

fn lenient_i32(bytes: &[u8], field: &'static str) -> Result<i32> {
    if trimmed(bytes).is_empty() {
        return Ok(0);
    }
    let value = parse_i64(bytes, field)?;
    i32::try_from(value).map_err(|_| Error::MalformedField {
        field,
        value: value.to_string(),
    })
}

fn lenient_usize(bytes: &[u8], field: &'static str) -> Result<usize> {
    if trimmed(bytes).is_empty() {
        return Ok(0);
    }
    parse_usize(bytes, field)
}
