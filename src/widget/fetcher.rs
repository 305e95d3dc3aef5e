//! Runs loads off the UI thread.
//!
//! Each `FetchRequest` gets its own short-lived worker thread; completions
//! come back over a channel tagged with the request's generation. Nothing is
//! aborted mid-flight: the widget simply ignores superseded generations.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tracing::error;

use crate::app::pipeline::{LoadOutput, load_dataset};
use crate::data::DailySource;
use crate::error::{AppError, EXIT_DATA};

use super::FetchRequest;

#[derive(Debug)]
pub struct Completion {
    pub generation: u64,
    pub result: Result<LoadOutput, AppError>,
}

pub struct Fetcher {
    source: Arc<dyn DailySource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn DailySource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { source, tx, rx }
    }

    pub fn source(&self) -> &dyn DailySource {
        self.source.as_ref()
    }

    pub fn spawn(&self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("covid-fetch-{}", request.generation))
            .spawn(move || {
                let result = load_dataset(source.as_ref(), request.range);
                // The receiver only disappears when the UI is shutting down.
                let _ = tx.send(Completion {
                    generation: request.generation,
                    result,
                });
            });

        if let Err(e) = spawned {
            error!(error = %e, "failed to start fetch thread");
            let _ = self.tx.send(Completion {
                generation: request.generation,
                result: Err(AppError::new(EXIT_DATA, format!("Failed to start fetch: {e}"))),
            });
        }
    }

    /// Next finished load, if any. Never blocks.
    pub fn try_next(&self) -> Option<Completion> {
        match self.rx.try_recv() {
            Ok(c) => Some(c),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the next load finishes.
    pub fn wait(&self) -> Option<Completion> {
        self.rx.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{Value, json};

    use super::*;
    use crate::domain::DayRange;
    use crate::widget::{ChartWidget, Phase, WidgetConfig};

    struct Fixture {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl DailySource for Fixture {
        fn fetch_raw(&self) -> Result<Vec<Value>, AppError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                return Err(AppError::data_unavailable("COVID request failed with status 500."));
            }
            Ok(json!([
                {"date": 20240101, "positiveIncrease": 1000, "deathIncrease": 10},
                {"date": 20240102, "positiveIncrease": 2000, "deathIncrease": 20}
            ])
            .as_array()
            .cloned()
            .unwrap_or_default())
        }

        fn describe(&self) -> String {
            "fixture".to_string()
        }
    }

    #[test]
    fn error_then_retry_round_trip() {
        let source = Arc::new(Fixture {
            calls: AtomicUsize::new(0),
            fail_first: true,
        });
        let fetcher = Fetcher::new(source.clone());
        let mut widget = ChartWidget::new(WidgetConfig::default());

        fetcher.spawn(widget.mount().unwrap());
        let done = fetcher.wait().unwrap();
        widget.complete(done.generation, done.result.map(|o| o.dataset));
        assert!(matches!(widget.phase(), Phase::Errored(_)));

        fetcher.spawn(widget.retry().unwrap());
        let done = fetcher.wait().unwrap();
        widget.complete(done.generation, done.result.map(|o| o.dataset));
        assert_eq!(widget.phase(), &Phase::Ready);
        assert_eq!(widget.dataset().unwrap().len(), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn completions_carry_their_generation() {
        let source = Arc::new(Fixture {
            calls: AtomicUsize::new(0),
            fail_first: false,
        });
        let fetcher = Fetcher::new(source);
        fetcher.spawn(FetchRequest {
            generation: 7,
            range: DayRange::Last60,
        });
        let done = fetcher.wait().unwrap();
        assert_eq!(done.generation, 7);
        assert_eq!(done.result.unwrap().dataset.len(), 2);
        assert!(fetcher.try_next().is_none());
    }
}
