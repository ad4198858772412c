//! Digital-to-physical scaling.
//!
//! Raw samples are 16-bit digital values; each signal declares a physical and
//! a digital range from which an affine transform is derived once per run:
//! `physical = digital * scale + offset`.

use crate::signal::SignalDescriptor;

/// Affine transform from raw digital sample values to physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingFactor {
    pub scale: f64,
    pub offset: f64,
}

impl ScalingFactor {
    /// Derive the transform from a signal's declared ranges.
    ///
    /// A degenerate digital range (`digital_max == digital_min`) substitutes
    /// a range of 1, so the signal scales to a constant offset instead of
    /// dividing by zero.
    pub fn from_signal(signal: &SignalDescriptor) -> Self {
        let mut digital_range = i64::from(signal.digital_max) - i64::from(signal.digital_min);
        if digital_range == 0 {
            digital_range = 1;
        }
        let scale = (signal.physical_max - signal.physical_min) / digital_range as f64;
        let offset = signal.physical_min - f64::from(signal.digital_min) * scale;
        ScalingFactor { scale, offset }
    }

    /// Map one raw digital sample to physical units.
    #[inline]
    pub fn apply(&self, raw: i16) -> f64 {
        f64::from(raw) * self.scale + self.offset
    }
}

/// Derive one [`ScalingFactor`] per signal, aligned by signal index.
pub fn derive_scalings(signals: &[SignalDescriptor]) -> Vec<ScalingFactor> {
    signals.iter().map(ScalingFactor::from_signal).collect()
}
