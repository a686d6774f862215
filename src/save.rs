//! Session persistence.
//!
//! Only the actor's last on-foot position survives between sessions. Saves
//! are read before the first frame and written after the last one, never
//! from inside a tick.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glam::Vec3;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::frame::Simulation;

/// Errors raised while reading or writing a save file.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Reading, writing or creating directories failed.
    #[error("failed to access save file {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The contents were not a valid save.
    #[error("save file {path} is malformed: {source}")]
    Json {
        /// File being parsed or written.
        path: PathBuf,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
}

/// The persisted subset of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    /// Actor position as `[x, y, z]`.
    pub actor_position: [f32; 3],
}

impl SaveState {
    /// Records where the actor is standing. A seated actor is recorded at
    /// its vehicle's position.
    #[must_use]
    pub fn capture(sim: &Simulation) -> Self {
        Self {
            actor_position: sim.world().actor.position.to_array(),
        }
    }

    /// Restores the actor position into a freshly built simulation.
    pub fn apply(&self, sim: &mut Simulation) {
        let position = Vec3::from_array(self.actor_position);
        if position.is_finite() {
            sim.world_mut().place_actor(position);
        } else {
            warn!("ignoring saved actor position {position:?}");
        }
    }

    /// Reads a save file. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Option<Self>, SaveError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SaveError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let state = serde_json::from_str(&text).map_err(|source| SaveError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loaded save from {}", path.display());
        Ok(Some(state))
    }

    /// Writes the save file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] when serialization or the write fails.
    pub fn store(&self, path: &Path) -> Result<(), SaveError> {
        let io_err = |source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SaveError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)?;
        info!("saved session to {}", path.display());
        Ok(())
    }
}
