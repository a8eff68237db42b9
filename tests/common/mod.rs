#![allow(dead_code)]

use cinegrid::state::Screen;
use cinegrid::tmdb::{ApiPage, Endpoint, TmdbApi};
use cinegrid::view::View;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const IMG: &str = "https://image.tmdb.org/t/p/w500";

/// Stands in for TMDB. Responses and delays are keyed by query text,
/// with `"<popular>"` for the discover listing.
#[derive(Default)]
pub struct FakeTmdb {
    pub responses: HashMap<String, Value>,
    pub delays: HashMap<String, Duration>,
    pub unreachable: bool,
    pub calls: Mutex<Vec<Endpoint>>,
}

pub fn key(endpoint: &Endpoint) -> String {
    match endpoint {
        Endpoint::Popular => "<popular>".to_string(),
        Endpoint::Search(q) => q.clone(),
    }
}

impl FakeTmdb {
    pub fn with(mut self, key: &str, body: Value) -> Self {
        self.responses.insert(key.to_string(), body);
        self
    }

    pub fn delayed(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TmdbApi for FakeTmdb {
    async fn fetch_page(&self, endpoint: &Endpoint) -> anyhow::Result<ApiPage> {
        self.calls.lock().unwrap().push(endpoint.clone());
        let k = key(endpoint);
        if let Some(delay) = self.delays.get(&k) {
            tokio::time::sleep(*delay).await;
        }
        if self.unreachable {
            anyhow::bail!("error sending request: connection refused");
        }
        let body = self
            .responses
            .get(&k)
            .cloned()
            .unwrap_or_else(|| json!({ "page": 1, "results": [] }));
        Ok(ApiPage::from(body))
    }
}

#[derive(Default)]
pub struct RecordingView {
    pub frames: Mutex<Vec<Screen>>,
}

impl RecordingView {
    pub fn last(&self) -> Screen {
        self.frames.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn frames(&self) -> Vec<Screen> {
        self.frames.lock().unwrap().clone()
    }
}

impl View for RecordingView {
    fn paint(&self, screen: &Screen) {
        self.frames.lock().unwrap().push(screen.clone());
    }
}

pub fn results(titles: &[&str]) -> Value {
    let items: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(i, t)| {
            json!({
                "id": i,
                "title": t,
                "poster_path": format!("/{}.jpg", i),
                "vote_average": 7.1,
                "release_date": "2010-07-16",
                "overview": format!("About {}", t)
            })
        })
        .collect();
    json!({ "page": 1, "results": items })
}

/// Lets every timer and spawned fetch run to completion on a paused clock.
pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(5)).await;
}
