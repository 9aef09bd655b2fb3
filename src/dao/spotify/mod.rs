mod client;
mod config;
mod models;

pub use client::SpotifyClient;
pub use config::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT, SpotifyConfig};
