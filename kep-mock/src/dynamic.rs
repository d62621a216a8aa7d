use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kep_core::{ExtractRequest, Extractor, KepError, Record, SUCCESS_STATUS, Transport};

/// Instruction for how an extractor should behave on its next calls.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(KepError),
    /// Hang indefinitely (simulate a stalled upstream).
    Hang,
}

/// Instruction for how the transport should answer one POST.
#[derive(Clone, Debug)]
pub enum TransportBehavior {
    /// Answer with this HTTP status.
    Status(u16),
    /// Fail the request without a status (connection-level error).
    Fail(KepError),
    /// Never answer.
    Hang,
}

struct InternalState {
    extract_behavior: Option<MockBehavior<Vec<Record>>>,
    extract_requests: Vec<ExtractRequest>,
    transport_script: VecDeque<TransportBehavior>,
    default_status: u16,
    bodies: Vec<String>,
}

impl Default for InternalState {
    fn default() -> Self {
        Self {
            extract_behavior: None,
            extract_requests: Vec::new(),
            transport_script: VecDeque::new(),
            default_status: SUCCESS_STATUS,
            bodies: Vec::new(),
        }
    }
}

/// Controller handle used by tests to drive the dynamic mocks from the outside.
#[derive(Clone)]
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for every subsequent `extract` call.
    pub async fn set_extract_behavior(&self, behavior: MockBehavior<Vec<Record>>) {
        let mut guard = self.state.lock().await;
        guard.extract_behavior = Some(behavior);
    }

    /// Queue answers for the next POSTs, consumed in order.
    pub async fn push_transport_script(&self, script: impl IntoIterator<Item = TransportBehavior>) {
        let mut guard = self.state.lock().await;
        guard.transport_script.extend(script);
    }

    /// Queue `count` answers with the same status.
    pub async fn push_statuses(&self, status: u16, count: usize) {
        self.push_transport_script(std::iter::repeat_n(TransportBehavior::Status(status), count))
            .await;
    }

    /// Status returned once the script is drained (200 unless changed).
    pub async fn set_default_status(&self, status: u16) {
        let mut guard = self.state.lock().await;
        guard.default_status = status;
    }

    /// Bodies received by the transport, in call order.
    pub async fn bodies(&self) -> Vec<String> {
        let guard = self.state.lock().await;
        guard.bodies.clone()
    }

    /// Number of POSTs received by the transport.
    pub async fn post_count(&self) -> usize {
        let guard = self.state.lock().await;
        guard.bodies.len()
    }

    /// Requests received by the extractor, in call order.
    pub async fn extract_requests(&self) -> Vec<ExtractRequest> {
        let guard = self.state.lock().await;
        guard.extract_requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        *guard = InternalState::default();
    }
}

/// An extractor that defers all behavior to an external controller.
pub struct DynamicMockExtractor {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockExtractor {
    /// Create a new dynamic mock extractor and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn Extractor>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn Extractor>, controller)
    }
}

#[async_trait]
impl Extractor for DynamicMockExtractor {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn extract(&self, req: &ExtractRequest) -> Result<Vec<Record>, KepError> {
        // Acquire behavior snapshot without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.extract_requests.push(*req);
            guard.extract_behavior.clone()
        };

        match behavior {
            Some(MockBehavior::Return(records)) => Ok(records),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(Vec::new()),
        }
    }
}

/// A transport that answers from a script set by an external controller.
///
/// Every body is logged before the scripted answer is applied, so hung and
/// failed requests still show up in [`DynamicMockController::bodies`].
pub struct DynamicMockTransport {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockTransport {
    /// Create a new dynamic mock transport and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn Transport>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn Transport>, controller)
    }
}

#[async_trait]
impl Transport for DynamicMockTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn post(&self, body: &str) -> Result<u16, KepError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.bodies.push(body.to_string());
            let fallback = TransportBehavior::Status(guard.default_status);
            guard.transport_script.pop_front().unwrap_or(fallback)
        };

        match behavior {
            TransportBehavior::Status(status) => Ok(status),
            TransportBehavior::Fail(e) => Err(e),
            TransportBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}
