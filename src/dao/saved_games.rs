use std::{io::ErrorKind, path::PathBuf};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};
use tokio::fs;
use tracing::warn;

use crate::{
    dao::{
        json_file::JsonFile,
        storage::{StorageError, StorageResult},
    },
    state::game::GameState,
};

const SAVE_EXTENSION: &str = ".json";

/// A named snapshot of a game written by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    /// Name chosen by the host.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// RFC 3339 timestamp of the save.
    pub timestamp: String,
    /// State at the time of the save.
    pub game_state: GameState,
}

/// Listing entry for a saved game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedGameInfo {
    /// File name inside the saved games directory.
    pub filename: String,
    /// Name chosen by the host.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// RFC 3339 timestamp of the save.
    pub timestamp: String,
}

/// Directory of saved game snapshots, one JSON file per save.
#[derive(Debug, Clone)]
pub struct SavedGames {
    dir: PathBuf,
}

impl SavedGames {
    /// Saved games stored under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write a snapshot and return the file name it was stored under.
    pub async fn save(
        &self,
        name: &str,
        description: &str,
        game_state: GameState,
        at: OffsetDateTime,
    ) -> StorageResult<String> {
        let stamp = at
            .format(format_description!(
                "[year][month][day]_[hour][minute][second]"
            ))
            .unwrap_or_else(|_| "00000000_000000".into());
        let filename = format!("{}_{stamp}{SAVE_EXTENSION}", file_stem_for(name));

        let saved = SavedGame {
            name: name.to_string(),
            description: description.to_string(),
            timestamp: at.format(&Rfc3339).unwrap_or_else(|_| stamp.clone()),
            game_state,
        };
        JsonFile::new(self.dir.join(&filename)).write(&saved).await?;
        Ok(filename)
    }

    /// Every readable snapshot, newest first. Unreadable files are skipped.
    pub async fn list(&self) -> StorageResult<Vec<SavedGameInfo>> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StorageError::io(&self.dir, err)),
        };

        let mut games = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|err| StorageError::io(&self.dir, err))?
        {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !is_valid_filename(&filename) {
                continue;
            }
            match JsonFile::new(entry.path()).read::<SavedGame>().await {
                Ok(Some(saved)) => games.push(SavedGameInfo {
                    filename,
                    name: saved.name,
                    description: saved.description,
                    timestamp: saved.timestamp,
                }),
                Ok(None) => {}
                Err(err) => warn!(%filename, error = %err, "skipping unreadable saved game"),
            }
        }

        games.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(games)
    }

    /// Read the snapshot stored as `filename`.
    ///
    /// Callers must check the name with [`is_valid_filename`] first.
    pub async fn load(&self, filename: &str) -> StorageResult<Option<SavedGame>> {
        JsonFile::new(self.dir.join(filename)).read().await
    }
}

/// Whether `filename` names a file directly inside the saved games directory.
pub fn is_valid_filename(filename: &str) -> bool {
    filename.len() > SAVE_EXTENSION.len()
        && filename.ends_with(SAVE_EXTENSION)
        && !filename.starts_with('.')
        && filename
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !filename.contains("..")
}

fn file_stem_for(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() { "game".into() } else { stem }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn filenames_stay_inside_the_directory() {
        assert!(is_valid_filename("Friday_night_20250101_200000.json"));
        assert!(!is_valid_filename("../game_state.json"));
        assert!(!is_valid_filename("nested/game.json"));
        assert!(!is_valid_filename(".json"));
        assert!(!is_valid_filename("game.txt"));
        assert!(!is_valid_filename(".hidden.json"));
    }

    #[test]
    fn stem_replaces_unsafe_characters() {
        assert_eq!(file_stem_for("Friday night!"), "Friday_night_");
        assert_eq!(file_stem_for("  "), "game");
    }

    #[tokio::test]
    async fn save_list_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let games = SavedGames::new(dir.path().join("saved_games"));
        let state = GameState {
            current_playlist: Some("pl".into()),
            ..GameState::default()
        };

        let older = games
            .save("First", "", state.clone(), datetime!(2025-01-01 20:00:00 UTC))
            .await
            .unwrap();
        let newer = games
            .save("Second", "finals", state.clone(), datetime!(2025-01-02 20:00:00 UTC))
            .await
            .unwrap();
        assert_eq!(newer, "Second_20250102_200000.json");

        let listed = games.list().await.unwrap();
        let names: Vec<_> = listed.iter().map(|g| g.filename.as_str()).collect();
        assert_eq!(names, vec![newer.as_str(), older.as_str()]);
        assert_eq!(listed[0].description, "finals");

        let loaded = games.load(&older).await.unwrap().unwrap();
        assert_eq!(loaded.name, "First");
        assert_eq!(loaded.game_state, state);
    }

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let games = SavedGames::new(dir.path().join("nothing_here"));
        assert!(games.list().await.unwrap().is_empty());
    }
}
