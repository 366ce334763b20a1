use tracing::{debug, warn};

use super::DetailSurface;
use crate::engine::{QueryEngine, QueryRequest};

/// What the detail pane currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// Nothing selected
    Empty,
    /// Query loaded, not run yet
    Pending,
    Ready { result: String },
    Failed { error: String },
}

/// Detail pane that re-runs the selected query through a [`QueryEngine`].
///
/// The stored result of the history entry is not shown here;
/// every selection produces a fresh answer.
pub struct LiveQueryDetail {
    engine: Box<dyn QueryEngine>,
    request: Option<QueryRequest>,
    state: DetailState,
    runs: usize,
}

impl LiveQueryDetail {
    pub fn new(engine: Box<dyn QueryEngine>) -> Self {
        Self { engine, request: None, state: DetailState::Empty, runs: 0 }
    }

    pub fn request(&self) -> Option<&QueryRequest> {
        self.request.as_ref()
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// How many times the engine has been invoked
    pub fn runs(&self) -> usize {
        self.runs
    }
}

impl DetailSurface for LiveQueryDetail {
    fn load_query(&mut self, request: QueryRequest) {
        self.request = Some(request);
        self.state = DetailState::Pending;
    }

    fn retry_query(&mut self) {
        let Some(request) = self.request.as_ref() else {
            return;
        };

        self.runs += 1;
        self.state = match self.engine.query(request) {
            Ok(result) => {
                debug!(chars = result.chars().count(), "live query finished");
                DetailState::Ready { result }
            }
            Err(e) => {
                let error = format!("{:#}", e);
                warn!(error = %error, "live query failed");
                DetailState::Failed { error }
            }
        };
    }

    fn clear(&mut self) {
        self.request = None;
        self.state = DetailState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};

    use super::*;
    use crate::engine::UnconfiguredEngine;

    struct ReverseEngine;

    impl QueryEngine for ReverseEngine {
        fn name(&self) -> &str {
            "reverse"
        }

        fn query(&self, request: &QueryRequest) -> Result<String> {
            if request.text == "fail" {
                bail!("engine down");
            }
            Ok(request.text.chars().rev().collect())
        }
    }

    #[test]
    fn test_retry_runs_engine() {
        let mut detail = LiveQueryDetail::new(Box::new(ReverseEngine));
        detail.load_query(QueryRequest::new("abc", "en", "fr"));
        assert_eq!(detail.state(), &DetailState::Pending);

        detail.retry_query();

        assert_eq!(detail.state(), &DetailState::Ready { result: "cba".to_string() });
        assert_eq!(detail.runs(), 1);
    }

    #[test]
    fn test_retry_without_request_does_nothing() {
        let mut detail = LiveQueryDetail::new(Box::new(ReverseEngine));
        detail.retry_query();

        assert_eq!(detail.state(), &DetailState::Empty);
        assert_eq!(detail.runs(), 0);
    }

    #[test]
    fn test_engine_error_becomes_failed_state() {
        let mut detail = LiveQueryDetail::new(Box::new(ReverseEngine));
        detail.load_query(QueryRequest::new("fail", "en", "fr"));
        detail.retry_query();

        assert_eq!(detail.state(), &DetailState::Failed { error: "engine down".to_string() });
    }

    #[test]
    fn test_unconfigured_engine_reports_hint() {
        let mut detail = LiveQueryDetail::new(Box::new(UnconfiguredEngine));
        detail.load_query(QueryRequest::new("hello", "en", "fr"));
        detail.retry_query();

        match detail.state() {
            DetailState::Failed { error } => assert!(error.contains("--engine")),
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(detail.engine_name(), "none");
    }

    #[test]
    fn test_clear_resets() {
        let mut detail = LiveQueryDetail::new(Box::new(ReverseEngine));
        detail.load_query(QueryRequest::new("abc", "en", "fr"));
        detail.clear();

        assert!(detail.request().is_none());
        assert_eq!(detail.state(), &DetailState::Empty);
    }
}
