//! Shared test doubles: a scripted gateway and a settable clock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use minerva_common::GatewayError;

use crate::session::Clock;
use crate::{ApiGateway, ConverseMode, ConverseRequest, ConverseResponse, ValidationInfo};

/// Clock whose "now" is set explicitly by the test.
#[derive(Clone)]
pub(crate) struct FixedClock {
    now: Arc<AtomicI64>,
}

impl FixedClock {
    pub(crate) fn at(now: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now)),
        }
    }

    pub(crate) fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Gateway double fed with scripted results. Calls are recorded; `converse`
/// can optionally block on a [`Notify`] gate so tests can hold a request
/// in flight.
pub(crate) struct MockGateway {
    validate_results: Mutex<VecDeque<Result<ValidationInfo, GatewayError>>>,
    converse_results: Mutex<VecDeque<Result<ConverseResponse, GatewayError>>>,
    validate_calls: AtomicUsize,
    converse_requests: Mutex<Vec<(String, ConverseMode, ConverseRequest)>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockGateway {
    pub(crate) fn new() -> Self {
        Self {
            validate_results: Mutex::new(VecDeque::new()),
            converse_results: Mutex::new(VecDeque::new()),
            validate_calls: AtomicUsize::new(0),
            converse_requests: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    pub(crate) fn push_validate(&self, result: Result<ValidationInfo, GatewayError>) {
        self.validate_results.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_converse(&self, result: Result<ConverseResponse, GatewayError>) {
        self.converse_results.lock().unwrap().push_back(result);
    }

    /// Hold every subsequent `converse` call until the gate is notified.
    pub(crate) fn hold_converse(&self, gate: Arc<Notify>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub(crate) fn validate_calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn converse_calls(&self) -> usize {
        self.converse_requests.lock().unwrap().len()
    }

    pub(crate) fn converse_requests(&self) -> Vec<(String, ConverseMode, ConverseRequest)> {
        self.converse_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiGateway for MockGateway {
    async fn validate(&self, _credential: &str) -> Result<ValidationInfo, GatewayError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        self.validate_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ValidationInfo::default()))
    }

    async fn converse(
        &self,
        _credential: &str,
        project: &str,
        mode: ConverseMode,
        request: &ConverseRequest,
    ) -> Result<ConverseResponse, GatewayError> {
        self.converse_requests
            .lock()
            .unwrap()
            .push((project.to_string(), mode, request.clone()));

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.converse_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ConverseResponse {
                    id: "turn-1".into(),
                    text: "ok".into(),
                    aux: None,
                })
            })
    }
}
