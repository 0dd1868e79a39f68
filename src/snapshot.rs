use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::manager::KindStats;
use crate::viewport::ViewWindow;

/// Point-in-time record of the streaming state, written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct StreamSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub captured_at: DateTime<Utc>,
    pub window: ViewWindow,
    pub player_x: f32,
    pub coins_collected: u64,
    pub kinds: Vec<KindStats>,
}

/// Interval-gated snapshot writer. An interval of zero disables snapshots.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    pub fn maybe_write(&self, snapshot: &StreamSnapshot) -> Result<Option<PathBuf>> {
        if self.interval_ticks == 0 || snapshot.tick % self.interval_ticks != 0 {
            return Ok(None);
        }
        let dir = self.dir.join(&snapshot.scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{:06}.json", snapshot.tick));
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}
