//! Mock map executor for testing
//!
//! Records every operation as a short string, e.g. `zoom In x2`.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use wayfinder::domain::{PanDirection, TransportMode, ZoomDirection};
use wayfinder::error::AssistantResult;
use wayfinder::executor::{ActionExecutor, SearchOutcome};

#[derive(Debug)]
pub struct MockExecutor {
    pub ops: Arc<Mutex<Vec<String>>>,
    pub street_view: Arc<Mutex<bool>>,
    pub directions_ok: Arc<Mutex<bool>>,
    pub search_outcome: Arc<Mutex<SearchOutcome>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            ops: Arc::new(Mutex::new(Vec::new())),
            street_view: Arc::new(Mutex::new(false)),
            directions_ok: Arc::new(Mutex::new(true)),
            search_outcome: Arc::new(Mutex::new(SearchOutcome::NotFound)),
        }
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    pub fn did(&self, op: &str) -> bool {
        self.ops.lock().unwrap().iter().any(|o| o == op)
    }

    pub fn set_street_view(&self, on: bool) {
        *self.street_view.lock().unwrap() = on;
    }

    pub fn set_search_outcome(&self, outcome: SearchOutcome) {
        *self.search_outcome.lock().unwrap() = outcome;
    }

    fn record(&self, op: impl Into<String>) {
        self.ops.lock().unwrap().push(op.into());
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionExecutor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn reset_view(&self) -> AssistantResult<()> {
        self.record("reset_view");
        Ok(())
    }

    async fn search(&self, query: &str) -> AssistantResult<SearchOutcome> {
        self.record(format!("search {}", query));
        Ok(self.search_outcome.lock().unwrap().clone())
    }

    async fn set_directions(
        &self,
        destination: &str,
        origin: Option<&str>,
    ) -> AssistantResult<bool> {
        self.record(format!(
            "directions {} -> {}",
            origin.unwrap_or("here"),
            destination
        ));
        Ok(*self.directions_ok.lock().unwrap())
    }

    async fn select_transport_mode(&self, mode: TransportMode) -> AssistantResult<bool> {
        self.record(format!("mode {}", mode.as_str()));
        Ok(true)
    }

    async fn start_navigation(&self) -> AssistantResult<bool> {
        self.record("start_navigation");
        Ok(true)
    }

    async fn zoom(&self, direction: ZoomDirection, steps: u32) -> AssistantResult<()> {
        self.record(format!("zoom {:?} x{}", direction, steps));
        Ok(())
    }

    async fn pan(&self, direction: PanDirection, steps: u32) -> AssistantResult<bool> {
        self.record(format!("pan {} x{}", direction.as_str(), steps));
        Ok(true)
    }

    async fn in_street_view(&self) -> AssistantResult<bool> {
        Ok(*self.street_view.lock().unwrap())
    }

    async fn rotate_street_view(&self, direction: PanDirection) -> AssistantResult<bool> {
        self.record(format!("rotate {}", direction.as_str()));
        Ok(true)
    }

    async fn move_street_view(&self, forward: bool) -> AssistantResult<bool> {
        self.record(if forward { "step forward" } else { "step back" });
        Ok(true)
    }
}
