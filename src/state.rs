//! The widget's state object and its pure projection onto a [`Screen`].
use serde::Serialize;

use crate::error::{ErrorKind, FetchError, API_KEY_HELP};
use crate::movie::{build_card, Card, MovieSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    // Previous grid stays on screen until the fetch lands.
    Loading { stale: Vec<MovieSummary> },
    Failed(FetchError),
    Content(Vec<MovieSummary>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub status: Status,
    pub search_text: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            search_text: String::new(),
        }
    }
}

impl ViewState {
    pub fn movies(&self) -> &[MovieSummary] {
        match &self.status {
            Status::Loading { stale } => stale.as_slice(),
            Status::Content(movies) => movies.as_slice(),
            Status::Idle | Status::Failed(_) => &[],
        }
    }

    pub fn begin_loading(&mut self) {
        let stale = match std::mem::replace(&mut self.status, Status::Idle) {
            Status::Content(movies) => movies,
            Status::Loading { stale } => stale,
            Status::Idle | Status::Failed(_) => Vec::new(),
        };
        self.status = Status::Loading { stale };
    }

    pub fn finish(&mut self, outcome: Result<Vec<MovieSummary>, FetchError>) {
        self.status = match outcome {
            Ok(movies) => Status::Content(movies),
            Err(err) => Status::Failed(err),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub kind: ErrorKind,
    pub message: String,
    pub help: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    pub revision: u64,
    pub loading: bool,
    pub error: Option<Banner>,
    pub no_results: bool,
    pub search_text: String,
    pub cards: Vec<Card>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            revision: 0,
            loading: false,
            error: None,
            no_results: false,
            search_text: String::new(),
            cards: Vec::new(),
        }
    }
}

pub fn render(state: &ViewState, revision: u64, image_base: &str) -> Screen {
    let loading = matches!(state.status, Status::Loading { .. });
    let error = match &state.status {
        Status::Failed(err) => Some(Banner {
            kind: err.kind(),
            message: err.to_string(),
            help: err.shows_help().then_some(API_KEY_HELP),
        }),
        _ => None,
    };
    let movies = state.movies();
    let no_results = !loading && movies.is_empty() && !state.search_text.is_empty();
    let cards = movies
        .iter()
        .enumerate()
        .map(|(i, m)| build_card(i, m, image_base))
        .collect();

    Screen {
        revision,
        loading,
        error,
        no_results,
        search_text: state.search_text.clone(),
        cards,
    }
}
