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
use std::{fmt, path::Path, str::FromStr};

use crate::error::SoundError;

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub mod linux;
#[cfg(target_os = "macos")]
pub mod mac;
pub mod mock;
#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub use linux::LinuxBackend;
#[cfg(target_os = "macos")]
pub use mac::MacBackend;
pub use mock::MockBackend;
#[cfg(target_os = "windows")]
pub use windows::WindowsBackend;

/// A native player. Implementations only ever see the path of the scaled
/// artifact; they never own or delete it.
pub trait Backend: fmt::Display {
    /// Binds the backend to the file at `path`, releasing whatever was bound
    /// before.
    fn open(&mut self, path: &Path) -> Result<(), SoundError>;

    /// Starts (or continues) playback of the bound file.
    fn play(&mut self) -> Result<(), SoundError>;

    /// Pauses playback. Not every platform can resume from where it paused.
    fn pause(&mut self) -> Result<(), SoundError>;

    /// Moves the playback position to `offset` seconds from the start.
    /// Out-of-range offsets are handled however the platform handles them.
    fn seek(&mut self, offset: f64) -> Result<(), SoundError>;

    /// Releases the native resource. Must be safe to call repeatedly.
    fn close(&mut self);
}

/// Logical playback state shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Opened,
    Playing,
    Paused,
    Closed,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Opened => "opened",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Closed => "closed",
        };
        write!(f, "{}", name)
    }
}

/// Which backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// The backend for the platform this crate was built for.
    #[default]
    Native,
    /// A backend that records calls instead of making sound.
    Mock,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" | "Native" => Ok(BackendKind::Native),
            "mock" | "Mock" => Ok(BackendKind::Mock),
            _ => Err(s.to_string()),
        }
    }
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constructs the requested backend.
pub fn select(kind: BackendKind) -> Box<dyn Backend> {
    match kind {
        BackendKind::Native => native(),
        BackendKind::Mock => Box::new(MockBackend::new("mock")),
    }
}

#[cfg(target_os = "windows")]
fn native() -> Box<dyn Backend> {
    Box::new(WindowsBackend::new())
}

#[cfg(target_os = "macos")]
fn native() -> Box<dyn Backend> {
    Box::new(MacBackend::new())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn native() -> Box<dyn Backend> {
    Box::new(LinuxBackend::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!(BackendKind::from_str("native").unwrap(), BackendKind::Native);
        assert_eq!(BackendKind::from_str("Native").unwrap(), BackendKind::Native);
        assert_eq!(BackendKind::from_str("mock").unwrap(), BackendKind::Mock);
        assert_eq!(BackendKind::from_str("Mock").unwrap(), BackendKind::Mock);
        assert!(BackendKind::from_str("alsa").is_err());
        assert!(BackendKind::from_str("").is_err());
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Native.to_string(), "native");
        assert_eq!(BackendKind::Mock.to_string(), "mock");
        assert_eq!(BackendKind::default(), BackendKind::Native);
    }

    #[test]
    fn test_select_mock() {
        let backend = select(BackendKind::Mock);
        assert_eq!(backend.to_string(), "mock (Mock)");
    }

    #[test]
    fn test_playback_state_display() {
        assert_eq!(PlaybackState::Idle.to_string(), "idle");
        assert_eq!(PlaybackState::Paused.to_string(), "paused");
        assert_eq!(PlaybackState::Closed.to_string(), "closed");
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn test_select_native_is_linux_stub() {
        let backend = select(BackendKind::Native);
        assert_eq!(backend.to_string(), "Linux (not implemented)");
    }
}
