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
use std::{error::Error, path::Path};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Installs a fmt subscriber that writes through the test harness. Safe to
/// call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Serializes a single chunk: tag, little-endian length, payload. No padding.
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Wraps the given chunks in a RIFF/WAVE header.
pub fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = chunks.iter().flatten().copied().collect();
    let mut out = Vec::with_capacity(12 + body.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(&body);
    out
}

/// A 16 byte PCM fmt payload.
pub fn fmt_payload(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Vec<u8> {
    let block_align = channels * bits_per_sample / 8;
    let byte_rate = sample_rate * u32::from(block_align);

    let mut out = Vec::with_capacity(16);
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());
    out
}

/// A canonical 44 byte header 16-bit container holding `samples`.
pub fn pcm16_container(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    riff(&[
        chunk(b"fmt ", &fmt_payload(channels, sample_rate, 16)),
        chunk(b"data", &data),
    ])
}

/// Decodes little-endian 16-bit samples.
pub fn decode_i16(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Writes interleaved 16-bit samples with hound.
pub fn write_wav_i16(
    path: &Path,
    channels: u16,
    sample_rate: u32,
    samples: &[i16],
) -> Result<(), Box<dyn Error>> {
    let mut writer = WavWriter::create(
        path,
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    )?;
    for sample in samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Writes 8-bit samples with hound. Samples are given as stored on disk,
/// i.e. unsigned with silence at 128.
pub fn write_wav_u8(
    path: &Path,
    channels: u16,
    sample_rate: u32,
    samples: &[u8],
) -> Result<(), Box<dyn Error>> {
    let mut writer = WavWriter::create(
        path,
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        },
    )?;
    for sample in samples {
        // hound takes signed 8-bit samples and applies the bias itself.
        writer.write_sample((i16::from(*sample) - 128) as i8)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Reads back every 16-bit sample of a file.
pub fn read_wav_i16(path: &Path) -> Result<Vec<i16>, Box<dyn Error>> {
    let mut reader = WavReader::open(path)?;
    Ok(reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?)
}

/// Reads back every 8-bit sample of a file, as stored on disk.
pub fn read_wav_u8(path: &Path) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut reader = WavReader::open(path)?;
    Ok(reader
        .samples::<i8>()
        .map(|s| s.map(|s| (i16::from(s) + 128) as u8))
        .collect::<Result<Vec<_>, _>>()?)
}
