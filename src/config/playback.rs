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
use std::{path::PathBuf, str::FromStr};

use serde::Deserialize;

use super::error::ConfigError;
use crate::backend::BackendKind;

const DEFAULT_ARTIFACT_PREFIX: &str = "gainplay";
const DEFAULT_VOLUME: f64 = 1.0;

/// A YAML representation of the playback configuration.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Playback {
    /// The backend: "native" (default) or "mock".
    backend: Option<String>,

    /// Where scaled artifacts are written (default: the system temp directory).
    artifact_dir: Option<PathBuf>,

    /// File name prefix for scaled artifacts (default: "gainplay").
    artifact_prefix: Option<String>,

    /// Initial volume in [0.0, 1.0] (default: 1.0).
    volume: Option<f64>,
}

impl Playback {
    /// New will create a new playback configuration using the given backend.
    pub fn new(backend: &str) -> Playback {
        Playback {
            backend: Some(backend.to_string()),
            ..Default::default()
        }
    }

    /// Returns a copy of this configuration writing artifacts into `dir`.
    pub fn with_artifact_dir<P: Into<PathBuf>>(mut self, dir: P) -> Playback {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Returns a copy of this configuration starting at `volume`.
    pub fn with_volume(mut self, volume: f64) -> Playback {
        self.volume = Some(volume);
        self
    }

    /// Returns the configured backend kind.
    pub fn backend(&self) -> Result<BackendKind, ConfigError> {
        match self.backend.as_deref() {
            Some(backend) => BackendKind::from_str(backend).map_err(ConfigError::UnknownBackend),
            None => Ok(BackendKind::default()),
        }
    }

    /// Returns the artifact directory.
    pub fn artifact_dir(&self) -> PathBuf {
        self.artifact_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Returns the artifact file name prefix.
    pub fn artifact_prefix(&self) -> &str {
        self.artifact_prefix
            .as_deref()
            .unwrap_or(DEFAULT_ARTIFACT_PREFIX)
    }

    /// Returns the initial volume. Not clamped; the engine does that.
    pub fn volume(&self) -> f64 {
        self.volume.unwrap_or(DEFAULT_VOLUME)
    }
}
