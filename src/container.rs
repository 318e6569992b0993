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

//! RIFF/WAVE container parsing.
//!
//! Only enough of the container is understood to find the raw sample bytes and
//! the two format fields the scaler needs. Everything else is carried through
//! untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::SoundError;

/// Smallest buffer that can hold a canonical RIFF header, fmt chunk and data
/// chunk header.
pub const MIN_HEADER_LEN: usize = 44;

const RIFF_TAG: &[u8; 4] = b"RIFF";
const WAVE_TAG: &[u8; 4] = b"WAVE";
const FMT_TAG: &[u8; 4] = b"fmt ";
const DATA_TAG: &[u8; 4] = b"data";

/// Offset of the form tag (`WAVE`) within the container.
const FORM_TAG_OFFSET: usize = 8;
/// Offset of the first interior chunk.
const FIRST_CHUNK_OFFSET: usize = 12;
/// Tag plus little-endian length.
const CHUNK_HEADER_LEN: usize = 8;

/// Offsets within the fmt chunk payload.
const FMT_CHANNELS_OFFSET: usize = 2;
const FMT_BITS_OFFSET: usize = 14;

const FALLBACK_CHANNELS: u16 = 2;
const FALLBACK_BITS_PER_SAMPLE: u16 = 16;

/// The raw bytes of a WAV file, loaded once and never modified.
///
/// Loading only requires a non-empty file. The RIFF/WAVE signatures are
/// checked by [`parse`], so a file with the wrong signature loads fine and
/// then reports [`SoundError::UnsupportedFormat`] on every playback attempt.
#[derive(Clone, Debug)]
pub struct AudioContainer {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl AudioContainer {
    /// Reads the whole file at `path` into memory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SoundError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SoundError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let container = Self::from_bytes(path, bytes)?;

        info!(
            path = %path.display(),
            bytes = container.len(),
            "Loaded audio container."
        );
        Ok(container)
    }

    /// Wraps an in-memory buffer. The path is only used for diagnostics.
    pub fn from_bytes<P: AsRef<Path>>(path: P, bytes: Vec<u8>) -> Result<Self, SoundError> {
        let path = path.as_ref();
        if bytes.is_empty() {
            return Err(SoundError::SourceUnavailable {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "file is empty"),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    /// The path the container was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Parses the container layout.
    pub fn layout(&self) -> Result<ContainerLayout, SoundError> {
        parse(&self.bytes)
    }
}

/// Channel count and sample width, as declared by the fmt chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for FormatDescriptor {
    /// Stereo 16-bit, used whenever the fmt chunk is missing or unreadable.
    fn default() -> Self {
        FormatDescriptor {
            channels: FALLBACK_CHANNELS,
            bits_per_sample: FALLBACK_BITS_PER_SAMPLE,
        }
    }
}

/// Location of the sample payload within the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRegion {
    pub offset: usize,
    pub len: usize,
}

impl SampleRegion {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Everything the scaler needs to know about a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerLayout {
    pub format: FormatDescriptor,
    /// False when the fallback format is in use.
    pub format_declared: bool,
    pub region: SampleRegion,
}

/// Locates the sample region and format descriptor of a RIFF/WAVE buffer.
pub fn parse(bytes: &[u8]) -> Result<ContainerLayout, SoundError> {
    if bytes.len() < MIN_HEADER_LEN {
        return Err(SoundError::MalformedContainer(format!(
            "{} bytes is shorter than the {} byte minimum header",
            bytes.len(),
            MIN_HEADER_LEN
        )));
    }

    let outer = &bytes[..4];
    let form = &bytes[FORM_TAG_OFFSET..FORM_TAG_OFFSET + 4];
    if outer != RIFF_TAG || form != WAVE_TAG {
        return Err(SoundError::UnsupportedFormat(format!(
            "expected RIFF/WAVE signatures, found {}/{}",
            String::from_utf8_lossy(outer),
            String::from_utf8_lossy(form)
        )));
    }

    let (offset, declared_len) = find_chunk(bytes, DATA_TAG, bytes.len()).ok_or_else(|| {
        SoundError::MalformedContainer("no data chunk found".to_string())
    })?;

    let available = bytes.len() - offset;
    let len = declared_len.min(available);
    if len < declared_len {
        debug!(
            declared = declared_len,
            available, "Data chunk runs past the end of the file, truncating."
        );
    }
    let region = SampleRegion { offset, len };

    // The fmt chunk must precede the sample data, so only scan up to it.
    let header_limit = offset - CHUNK_HEADER_LEN;
    let declared = find_chunk(bytes, FMT_TAG, header_limit).and_then(|(fmt, fmt_len)| {
        read_format(bytes, fmt, fmt_len)
    });
    let (format, format_declared) = match declared {
        Some(format) => (format, true),
        None => {
            debug!("No usable fmt chunk, assuming stereo 16-bit.");
            (FormatDescriptor::default(), false)
        }
    };

    Ok(ContainerLayout {
        format,
        format_declared,
        region,
    })
}

/// Walks the chunk list from the first interior chunk until `limit`, returning
/// the payload offset and declared length of the first chunk tagged `tag`.
fn find_chunk(bytes: &[u8], tag: &[u8; 4], limit: usize) -> Option<(usize, usize)> {
    let limit = limit.min(bytes.len());
    let mut pos = FIRST_CHUNK_OFFSET;

    while pos
        .checked_add(CHUNK_HEADER_LEN)
        .is_some_and(|end| end < limit)
    {
        let len = read_u32(bytes, pos + 4)? as usize;
        if &bytes[pos..pos + 4] == tag {
            return Some((pos + CHUNK_HEADER_LEN, len));
        }
        pos = pos.checked_add(CHUNK_HEADER_LEN)?.checked_add(len)?;
    }

    None
}

fn read_format(bytes: &[u8], payload: usize, payload_len: usize) -> Option<FormatDescriptor> {
    if payload_len < FMT_BITS_OFFSET + 2 {
        return None;
    }

    // Fields are taken as declared. Odd widths are left to the scaler.
    Some(FormatDescriptor {
        channels: read_u16(bytes, payload + FMT_CHANNELS_OFFSET)?,
        bits_per_sample: read_u16(bytes, payload + FMT_BITS_OFFSET)?,
    })
}

fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let raw = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes([raw[0], raw[1]]))
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{chunk, pcm16_container, riff};

    #[test]
    fn test_parse_canonical_header() {
        let bytes = pcm16_container(1, 8000, &[100, -100, 32000, -32000]);
        let layout = parse(&bytes).unwrap();

        assert_eq!(layout.format.channels, 1);
        assert_eq!(layout.format.bits_per_sample, 16);
        assert!(layout.format_declared);
        assert_eq!(layout.region, SampleRegion { offset: 44, len: 8 });
        assert_eq!(layout.region.end(), bytes.len());
    }

    #[test]
    fn test_parse_skips_unknown_chunks() {
        let fmt = crate::testutil::fmt_payload(2, 22050, 8);
        let bytes = riff(&[
            chunk(b"fmt ", &fmt),
            chunk(b"LIST", b"INFOISFT\x04\x00\x00\x00test"),
            chunk(b"data", &[128, 129, 130, 131]),
        ]);
        let layout = parse(&bytes).unwrap();

        assert_eq!(layout.format.channels, 2);
        assert_eq!(layout.format.bits_per_sample, 8);
        assert_eq!(layout.region.len, 4);
        assert_eq!(&bytes[layout.region.offset..layout.region.end()], &[128, 129, 130, 131]);
    }

    #[test]
    fn test_parse_too_short() {
        let err = parse(&[0u8; MIN_HEADER_LEN - 1]).unwrap_err();
        assert!(matches!(err, SoundError::MalformedContainer(_)));
    }

    #[test]
    fn test_parse_bad_signature() {
        let mut bytes = pcm16_container(1, 8000, &[1, 2, 3, 4]);
        bytes[..4].copy_from_slice(b"RIFX");
        assert!(matches!(
            parse(&bytes).unwrap_err(),
            SoundError::UnsupportedFormat(_)
        ));

        let mut bytes = pcm16_container(1, 8000, &[1, 2, 3, 4]);
        bytes[8..12].copy_from_slice(b"AVI ");
        assert!(matches!(
            parse(&bytes).unwrap_err(),
            SoundError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_parse_missing_data_chunk() {
        let fmt = crate::testutil::fmt_payload(1, 8000, 16);
        let bytes = riff(&[chunk(b"fmt ", &fmt), chunk(b"junk", &[0u8; 32])]);
        assert!(bytes.len() >= MIN_HEADER_LEN);

        assert!(matches!(
            parse(&bytes).unwrap_err(),
            SoundError::MalformedContainer(_)
        ));
    }

    #[test]
    fn test_parse_missing_fmt_falls_back() {
        let bytes = riff(&[chunk(b"junk", &[0u8; 16]), chunk(b"data", &[0u8; 16])]);
        let layout = parse(&bytes).unwrap();

        assert!(!layout.format_declared);
        assert_eq!(layout.format, FormatDescriptor::default());
        assert_eq!(layout.format.channels, 2);
        assert_eq!(layout.format.bits_per_sample, 16);
    }

    #[test]
    fn test_parse_fmt_after_data_is_ignored() {
        let fmt = crate::testutil::fmt_payload(1, 8000, 8);
        let bytes = riff(&[chunk(b"data", &[0u8; 24]), chunk(b"fmt ", &fmt)]);
        let layout = parse(&bytes).unwrap();

        assert!(!layout.format_declared);
        assert_eq!(layout.format.bits_per_sample, 16);
    }

    #[test]
    fn test_parse_truncated_data_is_clamped() {
        let mut bytes = pcm16_container(1, 8000, &[1, 2, 3, 4]);
        // Declare far more data than the file holds.
        bytes[40..44].copy_from_slice(&1000u32.to_le_bytes());
        let layout = parse(&bytes).unwrap();

        assert_eq!(layout.region.len, 8);
        assert!(layout.region.end() <= bytes.len());
    }

    #[test]
    fn test_parse_huge_chunk_length_does_not_panic() {
        let bytes = riff(&[chunk(b"junk", &[0u8; 8]), chunk(b"data", &[0u8; 24])]);
        let mut bytes = bytes;
        bytes[16..20].copy_from_slice(&u32::MAX.to_le_bytes());

        assert!(matches!(
            parse(&bytes).unwrap_err(),
            SoundError::MalformedContainer(_)
        ));
    }

    #[test]
    fn test_parse_zero_channels_keeps_declared_width() {
        let fmt = crate::testutil::fmt_payload(0, 8000, 8);
        let bytes = riff(&[chunk(b"fmt ", &fmt), chunk(b"data", &[228, 28, 228, 28])]);
        let layout = parse(&bytes).unwrap();

        assert!(layout.format_declared);
        assert_eq!(layout.format.channels, 0);
        assert_eq!(layout.format.bits_per_sample, 8);
        assert_eq!(layout.region.len, 4);
    }

    #[test]
    fn test_parse_zero_bits_is_declared() {
        let fmt = crate::testutil::fmt_payload(1, 8000, 0);
        let bytes = riff(&[chunk(b"fmt ", &fmt), chunk(b"data", &[0u8; 16])]);
        let layout = parse(&bytes).unwrap();

        assert!(layout.format_declared);
        assert_eq!(layout.format.bits_per_sample, 0);
    }

    #[test]
    fn test_parse_short_fmt_falls_back() {
        let bytes = riff(&[chunk(b"fmt ", &[1, 0, 1, 0, 0x40, 0x1f]), chunk(b"data", &[0u8; 24])]);
        let layout = parse(&bytes).unwrap();

        assert!(!layout.format_declared);
        assert_eq!(layout.format, FormatDescriptor::default());
    }

    #[test]
    fn test_from_bytes_defers_signature_check() {
        let mut bytes = pcm16_container(1, 8000, &[1, 2, 3, 4]);
        bytes[..4].copy_from_slice(b"RIFX");

        let container = AudioContainer::from_bytes("odd.wav", bytes).unwrap();
        assert!(matches!(
            container.layout().unwrap_err(),
            SoundError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_from_bytes_rejects_empty() {
        let err = AudioContainer::from_bytes("empty.wav", Vec::new()).unwrap_err();
        assert!(matches!(err, SoundError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AudioContainer::load(dir.path().join("missing.wav")).unwrap_err();
        assert!(matches!(err, SoundError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_load_hound_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        crate::testutil::write_wav_i16(&path, 2, 44100, &[0, 1, 2, 3, 4, 5]).unwrap();

        let container = AudioContainer::load(&path).unwrap();
        assert_eq!(container.path(), path.as_path());
        let layout = container.layout().unwrap();
        assert_eq!(layout.format.channels, 2);
        assert_eq!(layout.format.bits_per_sample, 16);
        assert_eq!(layout.region.len, 12);
    }
}
