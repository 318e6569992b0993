// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::fmt;

use tracing::debug;

use crate::container::SampleRegion;

/// Gains below this are raised to it. Zero volume still produces a faint
/// signal rather than a file of pure silence.
pub const MIN_GAIN: f64 = 0.001;

/// Sample encodings the scaler knows how to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    /// Unsigned bytes, silence at 128.
    U8,
    /// Signed little-endian 16-bit.
    I16,
    /// Anything else. Passed through unchanged.
    Other(u16),
}

impl SampleWidth {
    pub fn from_bits(bits_per_sample: u16) -> Self {
        match bits_per_sample {
            8 => SampleWidth::U8,
            16 => SampleWidth::I16,
            other => SampleWidth::Other(other),
        }
    }
}

impl fmt::Display for SampleWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleWidth::U8 => write!(f, "8-bit unsigned"),
            SampleWidth::I16 => write!(f, "16-bit signed"),
            SampleWidth::Other(bits) => write!(f, "{}-bit (unscaled)", bits),
        }
    }
}

/// The gain actually applied for a requested gain.
pub fn effective_gain(gain: f64) -> f64 {
    // f64::max ignores NaN, so a NaN request lands on the floor.
    gain.max(MIN_GAIN)
}

/// Multiplies every sample in `region` of `data` by `gain`, saturating at the
/// limits of the sample type. Returns the number of samples rewritten, which
/// is zero for unsupported widths.
///
/// Interleaved channels are treated identically, so the channel count plays
/// no part here.
pub fn scale_region(data: &mut [u8], region: SampleRegion, bits_per_sample: u16, gain: f64) -> usize {
    let end = region.end().min(data.len());
    let start = region.offset.min(end);
    let samples = &mut data[start..end];
    let gain = effective_gain(gain);

    match SampleWidth::from_bits(bits_per_sample) {
        SampleWidth::I16 => scale_i16(samples, gain),
        SampleWidth::U8 => scale_u8(samples, gain),
        width @ SampleWidth::Other(_) => {
            debug!(%width, "Sample width not supported for scaling, leaving samples untouched.");
            0
        }
    }
}

fn scale_i16(samples: &mut [u8], gain: f64) -> usize {
    let mut count = 0;
    for pair in samples.chunks_exact_mut(2) {
        let sample = f64::from(i16::from_le_bytes([pair[0], pair[1]]));
        let scaled = (sample * gain).clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16;
        pair.copy_from_slice(&scaled.to_le_bytes());
        count += 1;
    }
    count
}

fn scale_u8(samples: &mut [u8], gain: f64) -> usize {
    for sample in samples.iter_mut() {
        let centered = f64::from(*sample) - 128.0;
        *sample = (centered * gain + 128.0).clamp(0.0, 255.0) as u8;
    }
    samples.len()
}
