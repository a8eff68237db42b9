//! Fetch failures surfaced to the widget. `Display` is the banner text.

use serde::Serialize;

pub const INVALID_KEY_MESSAGE: &str = "Invalid API key. Please get a valid TMDB API key.";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found.";
pub const TRANSPORT_MESSAGE: &str =
    "Failed to fetch movies. Please check your internet connection.";

pub const API_KEY_HELP: &str =
    "Get a free API key at https://www.themoviedb.org/settings/api and set TMDB_API_KEY.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    // status_code 7
    #[error("{}", INVALID_KEY_MESSAGE)]
    Auth,

    // status_code 34
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    #[error("{}", TRANSPORT_MESSAGE)]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    NotFound,
    Transport,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Auth => ErrorKind::Auth,
            FetchError::NotFound => ErrorKind::NotFound,
            FetchError::Transport(_) => ErrorKind::Transport,
        }
    }

    pub fn shows_help(&self) -> bool {
        matches!(self, FetchError::Auth)
    }
}
