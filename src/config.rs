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
use std::path::Path;

use ::config::{Config, Environment, File};
use tracing::debug;

mod error;
mod playback;

pub use self::error::ConfigError;
pub use self::playback::Playback;

/// Environment variables starting with this prefix override file settings,
/// e.g. `GAINPLAY_BACKEND=mock`.
pub const ENV_PREFIX: &str = "GAINPLAY";

/// Loads the playback configuration from `path` (format chosen by extension),
/// with `GAINPLAY_*` environment variables layered on top.
pub fn load(path: &Path) -> Result<Playback, ConfigError> {
    let playback: Playback = Config::builder()
        .add_source(File::from(path))
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()?
        .try_deserialize()?;

    debug!(path = %path.display(), ?playback, "Loaded playback config.");
    Ok(playback)
}

/// Environment overrides only, for callers without a config file.
pub fn from_env() -> Result<Playback, ConfigError> {
    let playback: Playback = Config::builder()
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()?
        .try_deserialize()?;
    Ok(playback)
}
