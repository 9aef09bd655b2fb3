use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::validate_not_blank;

/// Music service access token obtained by the host.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SessionTokenRequest {
    /// Bearer token for the music service API.
    #[validate(length(min = 1, max = 2048), custom(function = "validate_not_blank"))]
    pub access_token: String,
}

/// Whether a music service session is installed.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthStatusResponse {
    /// `true` once a token was provided.
    pub authenticated: bool,
}
