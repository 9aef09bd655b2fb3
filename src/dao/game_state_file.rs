use std::path::PathBuf;

use futures::future::BoxFuture;

use crate::{
    dao::{json_file::JsonFile, storage::StorageResult},
    state::game::GameState,
};

/// Durable home of the game state document.
pub trait StateStorage: Send + Sync {
    /// Load the persisted state, `None` when nothing was saved yet.
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<GameState>>>;
    /// Replace the persisted state with `state`.
    fn save(&self, state: GameState) -> BoxFuture<'static, StorageResult<()>>;
}

/// [`StateStorage`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStateStorage {
    file: JsonFile,
}

impl FileStateStorage {
    /// Store the game state at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

impl StateStorage for FileStateStorage {
    fn load(&self) -> BoxFuture<'static, StorageResult<Option<GameState>>> {
        let file = self.file.clone();
        Box::pin(async move { file.read::<GameState>().await })
    }

    fn save(&self, state: GameState) -> BoxFuture<'static, StorageResult<()>> {
        let file = self.file.clone();
        Box::pin(async move { file.write(&state).await })
    }
}
