use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::{
    dao::{music::MusicServiceError, storage::StorageError},
    state::{commands::CommandError, store::StoreError},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the client.
    #[error("{0}")]
    InvalidInput(String),
    /// No music service session is installed, or it expired.
    #[error("not logged in to the music service")]
    AuthRequired,
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// Too few unplayed tracks to fill a card.
    #[error("not enough tracks to generate cards: need {required}, have {available}")]
    InsufficientTracks {
        /// Tracks needed per card.
        required: usize,
        /// Tracks available in the pool.
        available: usize,
    },
    /// Every track of the pool was already drawn.
    #[error("no more tracks to play")]
    EmptyPool,
    /// No playback device is currently active.
    #[error("no active playback device found; start playback on a device first")]
    NoActiveDevice,
    /// The music service call failed.
    #[error("music service request failed")]
    External(#[source] MusicServiceError),
    /// The music service did not answer in time.
    #[error("music service timed out, please retry")]
    Timeout,
    /// A document could not be written or read back.
    #[error("failed to persist game data")]
    Persistence(#[source] StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Persistence(err)
    }
}

impl From<MusicServiceError> for ServiceError {
    fn from(err: MusicServiceError) -> Self {
        match err {
            MusicServiceError::Unauthorized => ServiceError::AuthRequired,
            MusicServiceError::NotFound { path } => {
                ServiceError::NotFound(format!("music service resource `{path}` not found"))
            }
            MusicServiceError::Timeout { .. } => ServiceError::Timeout,
            other => ServiceError::External(other),
        }
    }
}

impl From<CommandError> for ServiceError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::EmptyPool => ServiceError::EmptyPool,
            CommandError::InsufficientTracks {
                required,
                available,
            } => ServiceError::InsufficientTracks {
                required,
                available,
            },
            CommandError::NoTrackSelected | CommandError::UnknownCard(_) => {
                ServiceError::NotFound(err.to_string())
            }
            CommandError::InvalidSnapshot(reason) => {
                ServiceError::InvalidInput(format!("invalid saved game: {reason}"))
            }
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(command) => command.into(),
            StoreError::Persistence(storage) => ServiceError::Persistence(storage),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Music service session missing.
    #[error("{0}")]
    Unauthorized(String),
    /// Requested resource not found.
    #[error("{0}")]
    NotFound(String),
    /// A retryable upstream timeout.
    #[error("{0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::InvalidInput(_)
            | ServiceError::InsufficientTracks { .. }
            | ServiceError::EmptyPool
            | ServiceError::NoActiveDevice => AppError::BadRequest(message),
            ServiceError::AuthRequired => AppError::Unauthorized(message),
            ServiceError::NotFound(_) => AppError::NotFound(message),
            ServiceError::External(source) => {
                if source.is_refusal() {
                    AppError::BadRequest(format!("{message}: {source}"))
                } else {
                    error!(error = %source, "music service failure");
                    AppError::Internal(message)
                }
            }
            ServiceError::Timeout => AppError::ServiceUnavailable(message),
            ServiceError::Persistence(source) => {
                error!(error = %source, "persistence failure");
                AppError::Internal(message)
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let payload = Json(ErrorBody {
            error: self.to_string(),
        });

        (status, payload).into_response()
    }
}
