use tokio::sync::watch;

use crate::state::Screen;

pub trait View: Send + Sync {
    fn paint(&self, screen: &Screen);
}

#[derive(Debug)]
pub struct WatchView {
    tx: watch::Sender<Screen>,
}

impl WatchView {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Screen::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Screen {
        self.tx.borrow().clone()
    }
}

impl Default for WatchView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for WatchView {
    fn paint(&self, screen: &Screen) {
        // send_replace works without live receivers.
        self.tx.send_replace(screen.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_the_latest_frame() {
        let view = WatchView::new();
        let mut rx = view.subscribe();
        view.paint(&Screen {
            revision: 4,
            ..Default::default()
        });
        rx.changed().await.expect("sender alive");
        assert_eq!(rx.borrow().revision, 4);
        assert_eq!(view.current().revision, 4);
    }
}
