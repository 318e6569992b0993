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

//! Placeholder for Linux (and every other platform without a native player).
//!
//! Every operation succeeds without doing anything and says so in the log, so
//! callers behave exactly as they would with sound, only silently.

use std::{fmt, path::Path};

use tracing::{debug, warn};

use super::Backend;
use crate::error::SoundError;

#[derive(Default)]
pub struct LinuxBackend {}

impl LinuxBackend {
    pub fn new() -> LinuxBackend {
        LinuxBackend {}
    }
}

impl Backend for LinuxBackend {
    fn open(&mut self, path: &Path) -> Result<(), SoundError> {
        warn!(path = %path.display(), "Linux audio playback not implemented.");
        Ok(())
    }

    fn play(&mut self) -> Result<(), SoundError> {
        warn!("Linux audio playback not implemented.");
        Ok(())
    }

    fn pause(&mut self) -> Result<(), SoundError> {
        warn!("Linux audio pause not implemented.");
        Ok(())
    }

    fn seek(&mut self, offset: f64) -> Result<(), SoundError> {
        warn!(offset, "Linux audio seek not implemented.");
        Ok(())
    }

    fn close(&mut self) {
        debug!("Linux audio close not implemented.");
    }
}

impl fmt::Display for LinuxBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Linux (not implemented)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;

    #[test]
    fn test_every_operation_is_a_no_op() {
        let mut backend = LinuxBackend::new();
        assert!(backend.open(Path::new("/does/not/exist.wav")).is_ok());
        assert!(backend.seek(-1.0).is_ok());
        assert!(backend.play().is_ok());
        assert!(backend.pause().is_ok());
        backend.close();
        backend.close();
    }
}
