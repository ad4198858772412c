//! Main header decoding.
//!
//! The first 256 bytes of an EDF file are a fixed-layout ASCII header holding
//! patient/recording metadata and the record-layout counters everything else
//! depends on. Every field occupies a fixed byte range and is space-padded;
//! numeric fields are ASCII decimal.

use crate::{Error, Result, error::Section};
use core::ops::Range;
use serde::{Deserialize, Serialize};

/// Total size of the main header in bytes.
pub const MAIN_HEADER_SIZE: usize = 256;

const VERSION: Range<usize> = 0..8;
const PATIENT_ID: Range<usize> = 8..88;
const RECORDING_ID: Range<usize> = 88..168;
const START_DATE: Range<usize> = 168..176;
const START_TIME: Range<usize> = 176..184;
const HEADER_BYTES: Range<usize> = 184..192;
const RESERVED: Range<usize> = 192..236;
const NUM_RECORDS: Range<usize> = 236..244;
const RECORD_DURATION: Range<usize> = 244..252;
const NUM_SIGNALS: Range<usize> = 252..256;

/// Recording-level metadata from the 256-byte main header.
///
/// Immutable after decode; one instance per input file. Textual fields are
/// stored as recorded (trimmed, not normalized). In a well-formed file
/// `header_bytes == 256 + 256 * num_signals`, but this is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub version: String,
    pub patient_id: String,
    pub recording_id: String,
    pub start_date: String,
    pub start_time: String,
    /// Size in bytes of the combined header region, as declared by the file.
    pub header_bytes: i64,
    pub reserved: String,
    /// Count of data records. Files with an unknown record count store -1.
    pub num_records: i64,
    /// Duration in seconds of one data record.
    pub record_duration: f64,
    pub num_signals: usize,
}

impl Header {
    /// Decode the main header from its first 256 bytes.
    ///
    /// # Returns
    /// A [`Header`] on success, [`Error::TruncatedInput`] when fewer than 256
    /// bytes are available, or [`Error::MalformedField`] naming the numeric
    /// sub-field that failed to parse.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MAIN_HEADER_SIZE {
            return Err(Error::TruncatedInput {
                section: Section::MainHeader,
                expected: MAIN_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            version: trimmed(&bytes[VERSION]),
            patient_id: trimmed(&bytes[PATIENT_ID]),
            recording_id: trimmed(&bytes[RECORDING_ID]),
            start_date: trimmed(&bytes[START_DATE]),
            start_time: trimmed(&bytes[START_TIME]),
            header_bytes: parse_i64(&bytes[HEADER_BYTES], "header_bytes")?,
            reserved: trimmed(&bytes[RESERVED]),
            num_records: parse_i64(&bytes[NUM_RECORDS], "num_records")?,
            record_duration: parse_f64(&bytes[RECORD_DURATION], "record_duration")?,
            num_signals: parse_usize(&bytes[NUM_SIGNALS], "num_signals")?,
        })
    }

    /// Number of records to stream: `num_records` clamped at zero, so a file
    /// declaring -1 ("unknown") streams no records rather than failing.
    pub fn record_count(&self) -> usize {
        self.num_records.max(0) as usize
    }
}

/// Decode a space-padded ASCII field into its trimmed text.
pub(crate) fn trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

pub(crate) fn parse_i64(bytes: &[u8], field: &'static str) -> Result<i64> {
    let text = trimmed(bytes);
    text.parse().map_err(|_| Error::MalformedField { field, value: text })
}

pub(crate) fn parse_usize(bytes: &[u8], field: &'static str) -> Result<usize> {
    let text = trimmed(bytes);
    text.parse().map_err(|_| Error::MalformedField { field, value: text })
}

pub(crate) fn parse_f64(bytes: &[u8], field: &'static str) -> Result<f64> {
    let text = trimmed(bytes);
    text.parse().map_err(|_| Error::MalformedField { field, value: text })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_field(buf: &mut [u8], range: Range<usize>, text: &str) {
        let field = &mut buf[range];
        field.fill(b' ');
        field[..text.len()].copy_from_slice(text.as_bytes());
    }

    fn sample_header_bytes() -> [u8; MAIN_HEADER_SIZE] {
        let mut buf = [b' '; MAIN_HEADER_SIZE];
        write_field(&mut buf, VERSION, "0");
        write_field(&mut buf, PATIENT_ID, "X F 01-JAN-2000 patient");
        write_field(&mut buf, RECORDING_ID, "Startdate 02-FEB-2020");
        write_field(&mut buf, START_DATE, "02.02.20");
        write_field(&mut buf, START_TIME, "10.30.00");
        write_field(&mut buf, HEADER_BYTES, "768");
        write_field(&mut buf, RESERVED, "EDF+C");
        write_field(&mut buf, NUM_RECORDS, "120");
        write_field(&mut buf, RECORD_DURATION, "1");
        write_field(&mut buf, NUM_SIGNALS, "2");
        buf
    }

    #[test]
    fn decodes_all_fields() {
        let header = Header::from_bytes(&sample_header_bytes()).unwrap();
        assert_eq!(header.version, "0");
        assert_eq!(header.patient_id, "X F 01-JAN-2000 patient");
        assert_eq!(header.recording_id, "Startdate 02-FEB-2020");
        assert_eq!(header.start_date, "02.02.20");
        assert_eq!(header.start_time, "10.30.00");
        assert_eq!(header.header_bytes, 768);
        assert_eq!(header.reserved, "EDF+C");
        assert_eq!(header.num_records, 120);
        assert_eq!(header.record_duration, 1.0);
        assert_eq!(header.num_signals, 2);
    }

    #[test]
    fn truncated_header_is_rejected() {
        let err = Header::from_bytes(&[b' '; 100]).unwrap_err();
        match err {
            Error::TruncatedInput {
                section: Section::MainHeader,
                expected: 256,
                actual: 100,
            } => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_numeric_field_names_the_field() {
        let mut buf = sample_header_bytes();
        write_field(&mut buf, NUM_RECORDS, "many");
        match Header::from_bytes(&buf).unwrap_err() {
            Error::MalformedField { field, value } => {
                assert_eq!(field, "num_records");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_record_count_streams_zero_records() {
        let mut buf = sample_header_bytes();
        write_field(&mut buf, NUM_RECORDS, "-1");
        let header = Header::from_bytes(&buf).unwrap();
        assert_eq!(header.num_records, -1);
        assert_eq!(header.record_count(), 0);
    }

    #[test]
    fn decode_is_idempotent() {
        let buf = sample_header_bytes();
        let first = Header::from_bytes(&buf).unwrap();
        let second = Header::from_bytes(&buf).unwrap();
        assert_eq!(first, second);
    }
}
