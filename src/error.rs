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
use std::path::PathBuf;

/// Everything that can go wrong between loading a source file and telling the
/// native player to start. None of these cross the public [`crate::Engine`]
/// boundary; the engine logs them and carries on.
#[derive(Debug, thiserror::Error)]
pub enum SoundError {
    #[error("Source audio unavailable: {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    #[error("Unsupported container format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not write scaled artifact {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Playback backend failure: {0}")]
    Backend(String),
}

impl SoundError {
    /// A short, stable name for the error kind. Useful for log fields and for
    /// diagnostic hooks that only care about the category.
    pub fn kind(&self) -> &'static str {
        match self {
            SoundError::SourceUnavailable { .. } => "source_unavailable",
            SoundError::MalformedContainer(_) => "malformed_container",
            SoundError::UnsupportedFormat(_) => "unsupported_format",
            SoundError::ArtifactWrite { .. } => "artifact_write",
            SoundError::Backend(_) => "backend",
        }
    }
}
