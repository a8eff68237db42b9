use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::state::{render, ViewState};
use crate::tmdb::{Endpoint, TmdbApi};
use crate::view::View;

pub struct SearchController {
    tmdb: Arc<dyn TmdbApi>,
    view: Arc<dyn View>,
    image_base: String,
    debounce: Duration,
    issued: AtomicU64,
    inner: Mutex<Inner>,
}

struct Inner {
    state: ViewState,
    // Single debounce slot, replaced on every keystroke.
    pending: Option<JoinHandle<()>>,
    // Highest sequence number whose response has been applied.
    applied: u64,
    revision: u64,
}

impl SearchController {
    pub fn new(
        tmdb: Arc<dyn TmdbApi>,
        view: Arc<dyn View>,
        image_base: impl Into<String>,
        debounce: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            tmdb,
            view,
            image_base: image_base.into(),
            debounce,
            issued: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                state: ViewState::default(),
                pending: None,
                applied: 0,
                revision: 0,
            }),
        })
    }

    pub fn from_config(config: &Config, tmdb: Arc<dyn TmdbApi>, view: Arc<dyn View>) -> Arc<Self> {
        Self::new(tmdb, view, config.image_base.clone(), config.debounce)
    }

    pub async fn on_startup(&self) {
        info!("Loading popular movies");
        self.fetch_and_render(Endpoint::Popular).await;
    }

    pub async fn on_search_input(self: &Arc<Self>, raw_text: impl Into<String>) {
        let text = raw_text.into();
        let endpoint = Endpoint::for_input(&text);

        let mut inner = self.inner.lock().await;
        if let Some(timer) = inner.pending.take() {
            timer.abort();
        }
        inner.state.search_text = text;

        let controller = Arc::clone(self);
        let delay = self.debounce;
        inner.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached: aborting a fired timer must not cancel its request.
            tokio::spawn(async move {
                controller.fetch_and_render(endpoint).await;
            });
        }));
    }

    pub async fn fetch_and_render(&self, endpoint: Endpoint) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut inner = self.inner.lock().await;
            inner.state.begin_loading();
            self.paint(&mut inner);
        }

        debug!(seq, endpoint = ?endpoint, "Issuing request");
        let outcome = match self.tmdb.fetch_page(&endpoint).await {
            Ok(page) => page.into_movies(),
            Err(e) => {
                error!("Error fetching movies: {:#}", e);
                Err(FetchError::Transport(format!("{e:#}")))
            }
        };

        let mut inner = self.inner.lock().await;
        if seq <= inner.applied {
            debug!(seq, applied = inner.applied, "Discarding out-of-order response");
            return;
        }
        inner.applied = seq;
        match &outcome {
            Ok(movies) => info!("Showing {} movies", movies.len()),
            Err(e) => warn!("Fetch failed: {}", e),
        }
        inner.state.finish(outcome);
        self.paint(&mut inner);
    }

    fn paint(&self, inner: &mut Inner) {
        inner.revision += 1;
        let screen = render(&inner.state, inner.revision, &self.image_base);
        self.view.paint(&screen);
    }
}
