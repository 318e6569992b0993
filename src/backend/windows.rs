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

//! Playback through the Windows Media Control Interface (winmm).

use std::{ffi::CString, fmt, path::Path};

use tracing::{debug, info, warn};
use ::windows::core::PCSTR;
use ::windows::Win32::Foundation::HWND;
use ::windows::Win32::Media::Multimedia::{mciGetErrorStringA, mciSendStringA};

use super::Backend;
use crate::error::SoundError;

const ALIAS_PREFIX: &str = "gainplay_";

/// Drives an MCI `waveaudio` device. Each opened file gets its own alias,
/// derived from the file name, which stays bound until the next open or
/// close.
#[derive(Default)]
pub struct WindowsBackend {
    alias: Option<String>,
}

impl WindowsBackend {
    pub fn new() -> WindowsBackend {
        WindowsBackend { alias: None }
    }

    fn alias(&self) -> Result<&str, SoundError> {
        self.alias
            .as_deref()
            .ok_or_else(|| SoundError::Backend("no MCI device is open".to_string()))
    }
}

/// Builds an MCI alias from the file stem. Anything other than an ASCII
/// letter or digit is written as `_` plus its six digit hex code, so distinct stems give
/// distinct aliases. Artifact names are unique, so the aliases are too.
fn alias_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut alias = String::from(ALIAS_PREFIX);
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            alias.push(c);
        } else {
            alias.push_str(&format!("_{:06x}", u32::from(c)));
        }
    }
    alias
}

fn send(command: &str) -> Result<(), SoundError> {
    let c_command = CString::new(command)
        .map_err(|_| SoundError::Backend(format!("MCI command contains NUL: {}", command)))?;

    debug!(command, "Sending MCI command.");
    let code = unsafe {
        mciSendStringA(
            PCSTR(c_command.as_ptr() as *const u8),
            None,
            HWND::default(),
        )
    };
    if code == 0 {
        return Ok(());
    }

    Err(SoundError::Backend(format!(
        "MCI command '{}' failed: {} (code {})",
        command,
        error_text(code),
        code
    )))
}

fn error_text(code: u32) -> String {
    let mut buffer = [0u8; 256];
    let ok = unsafe { mciGetErrorStringA(code, &mut buffer) };
    if !ok.as_bool() {
        return "unknown MCI error".to_string();
    }
    let len = buffer.iter().position(|b| *b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..len]).into_owned()
}

impl Backend for WindowsBackend {
    fn open(&mut self, path: &Path) -> Result<(), SoundError> {
        self.close();

        let alias = alias_for(path);
        send(&format!(
            "open \"{}\" type waveaudio alias {}",
            path.display(),
            alias
        ))?;
        info!(alias = %alias, path = %path.display(), "Opened MCI device.");
        self.alias = Some(alias);
        Ok(())
    }

    fn play(&mut self) -> Result<(), SoundError> {
        send(&format!("play {}", self.alias()?))
    }

    fn pause(&mut self) -> Result<(), SoundError> {
        send(&format!("pause {}", self.alias()?))
    }

    fn seek(&mut self, offset: f64) -> Result<(), SoundError> {
        // waveaudio devices default to a millisecond time format.
        let ms = (offset * 1000.0) as i64;
        send(&format!("seek {} to {}", self.alias()?, ms))
    }

    fn close(&mut self) {
        if let Some(alias) = self.alias.take() {
            if let Err(e) = send(&format!("close {}", alias)) {
                warn!(alias = %alias, err = %e, "Could not close MCI device.");
            }
        }
    }
}

impl Drop for WindowsBackend {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Display for WindowsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "Windows MCI ({})", alias),
            None => write!(f, "Windows MCI"),
        }
    }
}
