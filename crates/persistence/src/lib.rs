#![deny(warnings)]

//! Persistence layer: versioned JSON save files for game snapshots.
//!
//! A save holds the full [`GameState`]. Notifications and timers are never
//! saved; a restored game starts with an empty feed.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sim_core::{validate_state, GameState, ResourceBounds};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: GameState,
}

/// Returns the default path used for local saves.
pub fn default_save_path() -> PathBuf {
    PathBuf::from("./saves/main.json")
}

/// Serialize a snapshot into a save document.
pub fn encode(state: &GameState, saved_at: DateTime<Utc>) -> Result<String> {
    let file = SaveFile {
        version: SAVE_VERSION,
        saved_at,
        state: state.clone(),
    };
    serde_json::to_string_pretty(&file).context("serializing save file")
}

/// Parse a save document, checking its version and the snapshot invariants.
pub fn decode(text: &str, bounds: &ResourceBounds) -> Result<SaveFile> {
    let file: SaveFile = serde_json::from_str(text).context("parsing save file")?;
    if file.version != SAVE_VERSION {
        bail!(
            "unsupported save version {} (expected {})",
            file.version,
            SAVE_VERSION
        );
    }
    validate_state(&file.state, bounds).context("save file violates game invariants")?;
    Ok(file)
}

/// Write a snapshot to `path`, replacing any previous save atomically.
pub fn save_to_path(path: &Path, state: &GameState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating save directory {}", parent.display()))?;
        }
    }
    let text = encode(state, Utc::now())?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, text).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    debug!(path = %path.display(), ticks = state.ticks, "game saved");
    Ok(())
}

pub fn load_from_path(path: &Path, bounds: &ResourceBounds) -> Result<GameState> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(decode(&text, bounds)?.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::EconomyConfig;

    fn scratch_dir(tag: &str) -> PathBuf {
        let name = format!("starship-legacy-{tag}-{}", std::process::id());
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn save_path_is_json() {
        assert_eq!(default_save_path().extension().unwrap(), "json");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let cfg = EconomyConfig::default();
        let mut state = GameState::new_game(&cfg);
        state.selected_system = Some("Vega".into());
        state.ticks = 12;
        state.rng_cursor = u128::from(u64::MAX) + 7;
        let path = scratch_dir("roundtrip").join("slot.json");
        save_to_path(&path, &state).unwrap();
        let back = load_from_path(&path, &cfg.bounds).unwrap();
        assert_eq!(back, state);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn rejects_future_version() {
        let cfg = EconomyConfig::default();
        let state = GameState::new_game(&cfg);
        let text = encode(&state, Utc::now())
            .unwrap()
            .replacen("\"version\": 1", "\"version\": 99", 1);
        let err = decode(&text, &cfg.bounds).unwrap_err();
        assert!(err.to_string().contains("unsupported save version 99"));
    }

    #[test]
    fn rejects_corrupted_snapshot() {
        let cfg = EconomyConfig::default();
        let mut state = GameState::new_game(&cfg);
        state.crew[1].is_heir = true;
        state.crew[2].is_heir = true;
        let text = encode(&state, Utc::now()).unwrap();
        assert!(decode(&text, &cfg.bounds).is_err());
    }
}
