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
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use tracing::info;

use super::Backend;
use crate::error::SoundError;

/// A call received by a [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(PathBuf),
    Play,
    Pause,
    Seek(f64),
    Close,
}

/// Operations a [`MockBackend`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Open,
    Play,
    Pause,
    Seek,
}

#[derive(Default)]
struct Shared {
    calls: Vec<Call>,
    failures: Vec<Failure>,
}

/// A mock backend. Doesn't actually play anything, it just records what it
/// was asked to do.
pub struct MockBackend {
    name: String,
    shared: Arc<Mutex<Shared>>,
}

/// Observes (and steers) a [`MockBackend`] after it has been handed to an
/// engine.
#[derive(Clone)]
pub struct MockHandle {
    shared: Arc<Mutex<Shared>>,
}

impl MockBackend {
    pub fn new(name: &str) -> MockBackend {
        MockBackend {
            name: name.to_string(),
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            shared: self.shared.clone(),
        }
    }

    fn record(&self, call: Call, failure: Failure) -> Result<(), SoundError> {
        let mut shared = self.shared.lock();
        if shared.failures.contains(&failure) {
            return Err(SoundError::Backend(format!(
                "{} injected {:?} failure",
                self.name, failure
            )));
        }
        shared.calls.push(call);
        Ok(())
    }
}

impl MockHandle {
    /// Every successful call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.shared.lock().calls.clone()
    }

    /// Paths passed to successful opens, in order.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.shared
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Open(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.shared.lock().calls.clear();
    }

    /// Makes every subsequent call of the given kind fail.
    pub fn fail(&self, failure: Failure) {
        self.shared.lock().failures.push(failure);
    }
}

impl Backend for MockBackend {
    fn open(&mut self, path: &Path) -> Result<(), SoundError> {
        // Native players refuse files they can't read, so the mock does too.
        fs::metadata(path).map_err(|e| {
            SoundError::Backend(format!("{} cannot open {}: {}", self.name, path.display(), e))
        })?;
        info!(backend = %self, path = %path.display(), "Opened.");
        self.record(Call::Open(path.to_path_buf()), Failure::Open)
    }

    fn play(&mut self) -> Result<(), SoundError> {
        self.record(Call::Play, Failure::Play)
    }

    fn pause(&mut self) -> Result<(), SoundError> {
        self.record(Call::Pause, Failure::Pause)
    }

    fn seek(&mut self, offset: f64) -> Result<(), SoundError> {
        self.record(Call::Seek(offset), Failure::Seek)
    }

    fn close(&mut self) {
        self.shared.lock().calls.push(Call::Close);
    }
}

impl fmt::Display for MockBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
