pub mod auth;
pub mod cards;
pub mod common;
pub mod events;
pub mod game;
pub mod health;
pub mod playback;
pub mod playlist;
pub mod validation;
pub mod ws;
