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

//! Volume-controlled playback of PCM WAV files.
//!
//! The [`Engine`] loads a WAV file once, writes a gain-scaled copy of it to a
//! temporary file whenever the volume changes, and hands that copy to the
//! platform's native player. Audio trouble never reaches the caller: failures
//! are logged (and optionally forwarded to a diagnostic hook) and the affected
//! operation becomes a no-op.

pub mod backend;
pub mod cache;
pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod scaler;
#[cfg(test)]
mod testutil;

pub use backend::{Backend, BackendKind, PlaybackState};
pub use engine::Engine;
pub use error::SoundError;
