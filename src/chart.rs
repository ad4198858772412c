//! Presentation projection for charting libraries.
//!
//! Pure re-projection of already-decoded data into the label/dataset shape
//! charting frontends expect: one label per record and one data series per
//! signal, carrying each record's first sample as a decimated preview of the
//! waveform. No parsing happens here.

use crate::header::Header;
use crate::record::Record;
use crate::signal::SignalDescriptor;
use serde::{Deserialize, Serialize};

const DEFAULT_SERIES_COLOR: &str = "rgb(75, 192, 192)";

/// One plottable series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(rename = "borderColor")]
    pub border_color: String,
    pub fill: bool,
}

/// Chart-shaped view of a decoded recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// X-axis labels, one per record.
    pub labels: Vec<String>,
    /// One series per signal, aligned with the signal order.
    pub datasets: Vec<Dataset>,
}

/// Project the full decoded record set into [`ChartData`].
///
/// Each signal's series holds one point per record (the record's first sample
/// for that signal; signals that contribute no samples to a record plot as
/// zero). `_header` is accepted for interface completeness; the projection
/// currently labels points by sample index rather than wall-clock time.
pub fn chart_data(_header: &Header, signals: &[SignalDescriptor], records: &[Record]) -> ChartData {
    let labels = (1..=records.len()).map(|i| format!("Sample {i}")).collect();

    let datasets = signals
        .iter()
        .enumerate()
        .map(|(sig_idx, signal)| Dataset {
            label: signal.label.clone(),
            data: records
                .iter()
                .map(|record| {
                    record
                        .signal(sig_idx)
                        .and_then(|samples| samples.first().copied())
                        .unwrap_or(0.0)
                })
                .collect(),
            border_color: DEFAULT_SERIES_COLOR.to_string(),
            fill: false,
        })
        .collect();

    ChartData { labels, datasets }
}
