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
use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, span, warn, Level};

use crate::backend::{self, Backend, BackendKind, PlaybackState};
use crate::cache::ScaledCopyCache;
use crate::config;
use crate::container::AudioContainer;
use crate::error::SoundError;

type DiagnosticHook = Box<dyn FnMut(&SoundError)>;

/// Plays a single WAV file at a software-controlled volume.
///
/// Every operation is synchronous and none of them fail from the caller's
/// point of view: problems are logged, passed to the diagnostic hook if one is
/// installed, and the operation quietly does nothing. An engine is not meant
/// to be shared between threads.
pub struct Engine {
    source_path: PathBuf,
    source: Option<AudioContainer>,
    volume: f64,
    cache: ScaledCopyCache,
    backend: Box<dyn Backend>,
    state: PlaybackState,
    diagnostics: Option<DiagnosticHook>,
}

impl Engine {
    /// Creates an engine for the file at `path` with the default
    /// configuration (native backend, system temp directory).
    pub fn new<P: AsRef<Path>>(path: P) -> Engine {
        Engine::with_config(path, &config::Playback::default())
    }

    /// Creates an engine for the file at `path` using `config`.
    pub fn with_config<P: AsRef<Path>>(path: P, config: &config::Playback) -> Engine {
        let kind = config.backend().unwrap_or_else(|e| {
            warn!(err = %e, "Falling back to the native backend.");
            BackendKind::Native
        });
        Engine::with_backend(path, config, backend::select(kind))
    }

    /// Creates an engine for the file at `path` driving the given backend.
    pub fn with_backend<P: AsRef<Path>>(
        path: P,
        config: &config::Playback,
        backend: Box<dyn Backend>,
    ) -> Engine {
        let source_path = path.as_ref().to_path_buf();
        let source = match AudioContainer::load(&source_path) {
            Ok(source) => Some(source),
            Err(e) => {
                warn!(err = %e, "Audio source could not be loaded, playback will be silent.");
                None
            }
        };

        let engine = Engine {
            source_path,
            source,
            volume: clamp_volume(config.volume()),
            cache: ScaledCopyCache::new(config.artifact_dir(), config.artifact_prefix()),
            backend,
            state: PlaybackState::Idle,
            diagnostics: None,
        };
        info!(engine = %engine, "Created playback engine.");
        engine
    }

    /// Installs a hook that sees every error the engine swallows.
    pub fn on_diagnostic<F>(&mut self, hook: F)
    where
        F: FnMut(&SoundError) + 'static,
    {
        self.diagnostics = Some(Box::new(hook));
    }

    /// Plays the sound from the beginning at the current volume.
    pub fn play(&mut self) {
        self.start("play", None);
    }

    /// Pauses playback. Does nothing unless the sound is playing.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            debug!(state = %self.state, "Nothing playing, ignoring pause.");
            return;
        }

        match self.backend.pause() {
            Ok(()) => self.state = PlaybackState::Paused,
            Err(e) => self.report(e),
        }
    }

    /// Plays the sound from the beginning, picking up any volume change.
    pub fn restart(&mut self) {
        self.start("restart", None);
    }

    /// Plays the sound starting `seconds` in. The offset is passed to the
    /// backend unchecked.
    pub fn play_from(&mut self, seconds: f64) {
        self.start("play_from", Some(seconds));
    }

    /// Sets the volume, clamped to [0.0, 1.0]. The scaled copy is rebuilt on
    /// the next playback call, not here.
    pub fn set_volume(&mut self, volume: f64) {
        let volume = clamp_volume(volume);
        self.volume = volume;

        if !self.cache.is_fresh_for(volume) {
            debug!(volume, "Volume changed, scaled artifact is stale.");
        }
    }

    /// Returns the last volume set.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Path of the current scaled artifact, if one has been written.
    pub fn artifact_path(&self) -> Option<&Path> {
        self.cache.current_path()
    }

    fn start(&mut self, operation: &'static str, offset: Option<f64>) {
        let span = span!(Level::DEBUG, "start playback", operation);
        let _enter = span.enter();

        if let Err(e) = self.try_start(offset) {
            self.report(e);
        }
    }

    fn try_start(&mut self, offset: Option<f64>) -> Result<(), SoundError> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| SoundError::SourceUnavailable {
                path: self.source_path.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "source was never loaded"),
            })?;
        let artifact = self.cache.ensure_fresh(source, self.volume)?;

        // Always rebind, so the backend can't keep playing an older artifact.
        if let Err(e) = self.backend.open(&artifact) {
            self.state = PlaybackState::Idle;
            return Err(e);
        }
        self.state = PlaybackState::Opened;

        if let Some(offset) = offset {
            self.backend.seek(offset)?;
        }
        self.backend.play()?;
        self.state = PlaybackState::Playing;

        info!(
            path = %artifact.display(),
            volume = self.volume,
            offset = ?offset,
            "Playing."
        );
        Ok(())
    }

    fn report(&mut self, err: SoundError) {
        warn!(kind = err.kind(), err = %err, "Audio operation failed.");
        if let Some(hook) = self.diagnostics.as_mut() {
            hook(&err);
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.backend.close();
        self.state = PlaybackState::Closed;
        self.cache.clear();
        debug!(path = %self.source_path.display(), "Closed playback engine.");
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via {} (volume {})",
            self.source_path.display(),
            self.backend,
            self.volume
        )
    }
}

/// Clamps to [0.0, 1.0]. NaN is treated as silence.
fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}
