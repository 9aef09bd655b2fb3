use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::dao::{json_file::JsonFile, storage::StorageResult};

/// Playlist remembered by the host for quick loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Music-service playlist identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owner display name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Whether this playlist is preselected.
    #[serde(default)]
    pub is_default: bool,
}

/// Result of a registry mutation that targets one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryUpdate {
    /// The entry was changed.
    Updated,
    /// No entry with the requested identifier exists.
    Missing,
}

/// Whole-file JSON array of [`PlaylistEntry`] values.
///
/// Every mutation reloads the file, edits it and writes it back. Writers
/// inside this process are serialized; other processes editing the file
/// concurrently may still lose updates.
pub struct PlaylistRegistry {
    file: JsonFile,
    write_gate: Mutex<()>,
}

impl PlaylistRegistry {
    /// Registry stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
            write_gate: Mutex::new(()),
        }
    }

    /// All entries, creating an empty registry on first access.
    pub async fn list(&self) -> StorageResult<Vec<PlaylistEntry>> {
        if let Some(entries) = self.file.read::<Vec<PlaylistEntry>>().await? {
            return Ok(entries);
        }
        let _gate = self.write_gate.lock().await;
        self.load_or_create().await
    }

    /// Caller must hold `write_gate`.
    async fn load_or_create(&self) -> StorageResult<Vec<PlaylistEntry>> {
        match self.file.read::<Vec<PlaylistEntry>>().await? {
            Some(entries) => Ok(entries),
            None => {
                info!(path = %self.file.path().display(), "creating empty playlist registry");
                self.file.write(&Vec::<PlaylistEntry>::new()).await?;
                Ok(Vec::new())
            }
        }
    }

    /// The entry flagged as default, if any.
    pub async fn default_playlist(&self) -> StorageResult<Option<PlaylistEntry>> {
        Ok(self.list().await?.into_iter().find(|entry| entry.is_default))
    }

    /// Add `entry`, replacing an existing entry with the same identifier.
    pub async fn add(&self, entry: PlaylistEntry) -> StorageResult<Vec<PlaylistEntry>> {
        self.modify(|entries| {
            if entry.is_default {
                clear_default(entries);
            }
            match entries.iter_mut().find(|existing| existing.id == entry.id) {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
            RegistryUpdate::Updated
        })
        .await
        .map(|(entries, _)| entries)
    }

    /// Make `id` the only default playlist.
    pub async fn set_default(&self, id: &str) -> StorageResult<RegistryUpdate> {
        self.modify(|entries| {
            if !entries.iter().any(|entry| entry.id == id) {
                return RegistryUpdate::Missing;
            }
            for entry in entries.iter_mut() {
                entry.is_default = entry.id == id;
            }
            RegistryUpdate::Updated
        })
        .await
        .map(|(_, update)| update)
    }

    /// Drop the entry with identifier `id`.
    pub async fn remove(&self, id: &str) -> StorageResult<RegistryUpdate> {
        self.modify(|entries| {
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            if entries.len() == before {
                RegistryUpdate::Missing
            } else {
                RegistryUpdate::Updated
            }
        })
        .await
        .map(|(_, update)| update)
    }

    async fn modify<F>(&self, edit: F) -> StorageResult<(Vec<PlaylistEntry>, RegistryUpdate)>
    where
        F: FnOnce(&mut Vec<PlaylistEntry>) -> RegistryUpdate,
    {
        let _gate = self.write_gate.lock().await;
        let mut entries = self.load_or_create().await?;
        let update = edit(&mut entries);
        if update == RegistryUpdate::Updated {
            self.file.write(&entries).await?;
        }
        Ok((entries, update))
    }
}

fn clear_default(entries: &mut [PlaylistEntry]) {
    for entry in entries {
        entry.is_default = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, is_default: bool) -> PlaylistEntry {
        PlaylistEntry {
            id: id.into(),
            name: format!("{id} name"),
            owner: None,
            is_default,
        }
    }

    fn registry(dir: &tempfile::TempDir) -> PlaylistRegistry {
        PlaylistRegistry::new(dir.path().join("playlists.json"))
    }

    #[tokio::test]
    async fn first_list_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        assert!(registry.list().await.unwrap().is_empty());
        assert!(dir.path().join("playlists.json").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn first_listing_never_drops_a_concurrent_add() {
        for round in 0..20 {
            let dir = tempfile::tempdir().unwrap();
            let registry = std::sync::Arc::new(registry(&dir));

            let lister = tokio::spawn({
                let registry = registry.clone();
                async move { registry.list().await }
            });
            let adder = tokio::spawn({
                let registry = registry.clone();
                async move { registry.add(entry("a", false)).await }
            });
            lister.await.unwrap().unwrap();
            adder.await.unwrap().unwrap();

            let ids: Vec<_> = registry.list().await.unwrap().into_iter().map(|e| e.id).collect();
            assert_eq!(ids, vec!["a".to_string()], "round {round}");
        }
    }

    #[tokio::test]
    async fn adding_a_default_clears_previous_default() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        registry.add(entry("a", true)).await.unwrap();
        registry.add(entry("b", false)).await.unwrap();
        let entries = registry.add(entry("c", true)).await.unwrap();

        let defaults: Vec<_> = entries.iter().filter(|e| e.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, "c");
    }

    #[tokio::test]
    async fn set_default_leaves_exactly_one() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        for id in ["a", "b", "c"] {
            registry.add(entry(id, id == "a")).await.unwrap();
        }

        assert_eq!(
            registry.set_default("b").await.unwrap(),
            RegistryUpdate::Updated
        );
        let entries = registry.list().await.unwrap();
        let defaults: Vec<_> = entries.iter().filter(|e| e.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, "b");
        assert_eq!(
            registry.default_playlist().await.unwrap().map(|e| e.id),
            Some("b".to_string())
        );
    }

    #[tokio::test]
    async fn set_default_on_unknown_id_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        registry.add(entry("a", true)).await.unwrap();

        assert_eq!(
            registry.set_default("zzz").await.unwrap(),
            RegistryUpdate::Missing
        );
        assert!(registry.list().await.unwrap()[0].is_default);
    }

    #[tokio::test]
    async fn re_adding_replaces_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        registry.add(entry("a", false)).await.unwrap();
        registry.add(entry("b", false)).await.unwrap();
        let mut renamed = entry("a", false);
        renamed.name = "Renamed".into();
        let entries = registry.add(renamed).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Renamed");
    }

    #[tokio::test]
    async fn remove_reports_missing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(&dir);
        registry.add(entry("a", false)).await.unwrap();

        assert_eq!(registry.remove("a").await.unwrap(), RegistryUpdate::Updated);
        assert_eq!(registry.remove("a").await.unwrap(), RegistryUpdate::Missing);
        assert!(registry.list().await.unwrap().is_empty());
    }
}
