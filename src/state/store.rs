use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    dao::{
        game_state_file::StateStorage,
        storage::{StorageError, StorageResult},
    },
    state::{
        commands::{Command, CommandError},
        game::GameState,
    },
};

/// Failure of [`GameStateStore::apply`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The command refused to run; nothing changed.
    #[error(transparent)]
    Rejected(#[from] CommandError),
    /// The new state could not be persisted; the previous state is kept.
    #[error("failed to persist game state")]
    Persistence(#[from] StorageError),
}

/// Sole owner of the live [`GameState`].
///
/// Mutations are serialized behind one lock. Each command runs against a
/// copy, the copy is persisted, and only then does it replace the live state,
/// so memory never gets ahead of disk.
pub struct GameStateStore {
    live: Mutex<GameState>,
    storage: Arc<dyn StateStorage>,
}

impl GameStateStore {
    /// Load the persisted state, falling back to a fresh one when the
    /// document is missing, unreadable or breaks the state invariants.
    pub async fn open(storage: Arc<dyn StateStorage>) -> StorageResult<Self> {
        let (state, heal) = match storage.load().await {
            Ok(Some(mut state)) => {
                let recorded = state.num_tracks;
                match state.validate() {
                    Ok(()) if state.num_tracks != recorded => {
                        info!(recorded, actual = state.num_tracks, "track counter repaired");
                        (state, true)
                    }
                    Ok(()) => (state, false),
                    Err(reason) => {
                        warn!(%reason, "persisted game state is inconsistent, starting fresh");
                        (GameState::default(), true)
                    }
                }
            }
            Ok(None) => {
                info!("no persisted game state, starting fresh");
                (GameState::default(), true)
            }
            Err(err) if err.is_corrupt() => {
                warn!(error = %err, "persisted game state is corrupt, starting fresh");
                (GameState::default(), true)
            }
            Err(err) => return Err(err),
        };

        if heal {
            storage.save(state.clone()).await?;
        }

        info!(
            unplayed = state.unplayed_tracks.len(),
            played = state.played_tracks.len(),
            cards = state.cards.len(),
            "game state ready"
        );

        Ok(Self {
            live: Mutex::new(state),
            storage,
        })
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> GameState {
        self.live.lock().await.clone()
    }

    /// Run `f` against the current state without copying it.
    pub async fn read<T>(&self, f: impl FnOnce(&GameState) -> T) -> T {
        let guard = self.live.lock().await;
        f(&guard)
    }

    /// Apply `command` atomically, returning its output and the committed state.
    pub async fn apply<C>(&self, command: C) -> Result<(C::Output, GameState), StoreError>
    where
        C: Command,
    {
        let name = command.name();
        let mut live = self.live.lock().await;

        let mut next = live.clone();
        let output = command.apply(&mut next).inspect_err(|err| {
            debug!(command = name, error = %err, "command rejected");
        })?;

        if let Err(err) = self.storage.save(next.clone()).await {
            warn!(command = name, error = %err, "game state not persisted, keeping previous state");
            return Err(err.into());
        }

        *live = next;
        debug!(command = name, "command committed");
        Ok((output, live.clone()))
    }

    /// Replace the state with a fresh default one, persisting it first.
    pub async fn reset_to_default(&self) -> StorageResult<GameState> {
        let mut live = self.live.lock().await;
        let fresh = GameState::default();
        self.storage.save(fresh.clone()).await?;
        *live = fresh.clone();
        info!("game state reset to defaults");
        Ok(fresh)
    }
}
