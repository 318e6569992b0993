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

//! Playback through AppKit's `NSSound`.
//!
//! `NSSound` is recreated on every open, so nothing about the previous
//! playback position survives a change of artifact.

#![allow(unused_unsafe)]

use std::{fmt, path::Path};

use objc2::rc::Retained;
use objc2::AllocAnyThread;
use objc2_app_kit::NSSound;
use objc2_foundation::NSString;
use tracing::info;

use super::Backend;
use crate::error::SoundError;

#[derive(Default)]
pub struct MacBackend {
    sound: Option<Retained<NSSound>>,
}

impl MacBackend {
    pub fn new() -> MacBackend {
        MacBackend { sound: None }
    }

    fn sound(&self) -> Result<&NSSound, SoundError> {
        self.sound
            .as_deref()
            .ok_or_else(|| SoundError::Backend("no NSSound is loaded".to_string()))
    }
}

impl Backend for MacBackend {
    fn open(&mut self, path: &Path) -> Result<(), SoundError> {
        self.close();

        let path_str = path.to_str().ok_or_else(|| {
            SoundError::Backend(format!("path is not valid UTF-8: {}", path.display()))
        })?;
        let ns_path = NSString::from_str(path_str);
        let sound =
            unsafe { NSSound::initWithContentsOfFile_byReference(NSSound::alloc(), &ns_path, true) }
                .ok_or_else(|| {
                    SoundError::Backend(format!(
                        "NSSound could not load {}",
                        path.display()
                    ))
                })?;

        info!(path = %path.display(), "Loaded NSSound.");
        self.sound = Some(sound);
        Ok(())
    }

    fn play(&mut self) -> Result<(), SoundError> {
        if unsafe { self.sound()?.play() } {
            Ok(())
        } else {
            Err(SoundError::Backend("NSSound refused to play".to_string()))
        }
    }

    /// NSSound has no pause that survives reloading, so this stops instead.
    fn pause(&mut self) -> Result<(), SoundError> {
        unsafe { self.sound()?.stop() };
        Ok(())
    }

    fn seek(&mut self, offset: f64) -> Result<(), SoundError> {
        unsafe { self.sound()?.setCurrentTime(offset) };
        Ok(())
    }

    fn close(&mut self) {
        if let Some(sound) = self.sound.take() {
            unsafe { sound.stop() };
        }
    }
}

impl Drop for MacBackend {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Display for MacBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "macOS NSSound")
    }
}
