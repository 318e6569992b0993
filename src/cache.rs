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

//! The gain-scaled copy of a source container.
//!
//! At most one artifact exists per cache. It is rebuilt only when the gain
//! it was built for differs from the requested gain, and the file it replaces
//! is deleted as soon as the new one is on disk.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, info, warn};

use crate::container::AudioContainer;
use crate::error::SoundError;
use crate::scaler;

/// How many names to try before giving up on finding a free one.
const MAX_NAME_ATTEMPTS: u32 = 64;

const ARTIFACT_EXTENSION: &str = "wav";

struct Artifact {
    path: PathBuf,
    gain: f64,
}

pub struct ScaledCopyCache {
    dir: PathBuf,
    prefix: String,
    /// Next counter value used to name an artifact.
    counter: u64,
    current: Option<Artifact>,
}

impl ScaledCopyCache {
    /// Creates a cache that writes artifacts named `<prefix>_<pid>_<n>.wav`
    /// into `dir`. Nothing is written until [`ScaledCopyCache::ensure_fresh`].
    pub fn new<P: Into<PathBuf>>(dir: P, prefix: &str) -> Self {
        ScaledCopyCache {
            dir: dir.into(),
            prefix: prefix.to_string(),
            counter: 0,
            current: None,
        }
    }

    /// Path of the current artifact, whether or not it is fresh.
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|artifact| artifact.path.as_path())
    }

    /// The gain the current artifact was built with.
    pub fn applied_gain(&self) -> Option<f64> {
        self.current.as_ref().map(|artifact| artifact.gain)
    }

    /// True if the current artifact can be played for `gain` as is.
    pub fn is_fresh_for(&self, gain: f64) -> bool {
        self.applied_gain() == Some(gain)
    }

    /// Makes sure an artifact scaled by `gain` exists and returns its path.
    ///
    /// On failure the previous artifact (if any) is left exactly as it was.
    pub fn ensure_fresh(
        &mut self,
        source: &AudioContainer,
        gain: f64,
    ) -> Result<PathBuf, SoundError> {
        if let Some(current) = self.current.as_ref().filter(|artifact| artifact.gain == gain) {
            debug!(gain, "Scaled artifact is current, reusing it.");
            return Ok(current.path.clone());
        }

        let layout = source.layout()?;
        let mut scaled = source.bytes().to_vec();
        let samples = scaler::scale_region(
            &mut scaled,
            layout.region,
            layout.format.bits_per_sample,
            gain,
        );

        let path = self.write_artifact(&scaled)?;
        info!(
            path = %path.display(),
            gain,
            samples,
            channels = layout.format.channels,
            bits_per_sample = layout.format.bits_per_sample,
            "Created scaled artifact."
        );

        let previous = self.current.replace(Artifact {
            path: path.clone(),
            gain,
        });
        if let Some(previous) = previous {
            remove_artifact(&previous.path);
        }

        Ok(path)
    }

    /// Deletes the current artifact, if any.
    pub fn clear(&mut self) {
        if let Some(artifact) = self.current.take() {
            remove_artifact(&artifact.path);
        }
    }

    fn next_path(&mut self) -> PathBuf {
        let name = format!(
            "{}_{}_{}.{}",
            self.prefix,
            process::id(),
            self.counter,
            ARTIFACT_EXTENSION
        );
        self.counter += 1;
        self.dir.join(name)
    }

    /// Writes `bytes` to a file nobody else is using. Names that already
    /// exist (another engine in this process, or a leftover from a previous
    /// run with the same pid) are skipped.
    fn write_artifact(&mut self, bytes: &[u8]) -> Result<PathBuf, SoundError> {
        let mut last = None;
        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = self.next_path();
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "Artifact name taken, trying the next one.");
                    last = Some(path);
                    continue;
                }
                Err(source) => return Err(SoundError::ArtifactWrite { path, source }),
            };

            if let Err(source) = file.write_all(bytes).and_then(|_| file.sync_all()) {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(SoundError::ArtifactWrite { path, source });
            }
            return Ok(path);
        }

        Err(SoundError::ArtifactWrite {
            path: last.unwrap_or_else(|| self.dir.clone()),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "no free artifact name available",
            ),
        })
    }
}

impl Drop for ScaledCopyCache {
    fn drop(&mut self) {
        self.clear();
    }
}

fn remove_artifact(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed scaled artifact."),
        Err(e) => warn!(
            path = %path.display(),
            err = %e,
            "Could not remove scaled artifact."
        ),
    }
}
