//! Commit hook that writes each snapshot to disk.

use crate::store::SnapshotSink;
use sim_core::GameState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Saves every `every`-th commit. A failed write is logged and the game
/// carries on.
pub struct AutosaveSink {
    path: PathBuf,
    every: u64,
    commits: u64,
}

impl AutosaveSink {
    pub fn new(path: PathBuf, every: u64) -> Self {
        Self {
            path,
            every: every.max(1),
            commits: 0,
        }
    }
}

impl SnapshotSink for AutosaveSink {
    fn on_commit(&mut self, snapshot: &Arc<GameState>) {
        self.commits += 1;
        if self.commits % self.every != 0 {
            return;
        }
        if let Err(err) = persistence::save_to_path(&self.path, snapshot) {
            warn!(path = %self.path.display(), error = %err, "autosave failed");
        }
    }
}
