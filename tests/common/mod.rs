// Shared test doubles for the upstream API and the chat destination.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use tapsim_bot::error::{FetchError, NotifyError};
use tapsim_bot::notifier::Notifier;
use tapsim_bot::render::OutgoingMessage;
use tapsim_bot::upstream::{Endpoint, RecordSource};

#[derive(Default)]
struct Script {
    queued: VecDeque<Option<Value>>,
    fixed: HashMap<&'static str, Value>,
    calls: Vec<Endpoint>,
}

/// Upstream stand-in. Queued responses are served first, in order; after
/// that each endpoint gets its fixed payload, or a 503 if it has none.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(self, endpoint: &'static str, payload: Value) -> Self {
        self.script.lock().unwrap().fixed.insert(endpoint, payload);
        self
    }

    pub fn push_ok(&self, payload: Value) {
        self.script.lock().unwrap().queued.push_back(Some(payload));
    }

    pub fn push_failure(&self) {
        self.script.lock().unwrap().queued.push_back(None);
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.script.lock().unwrap().calls.clone()
    }

    fn next(&self, endpoint: Endpoint) -> Result<Value, FetchError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(endpoint);
        let response = match script.queued.pop_front() {
            Some(queued) => queued,
            None => script.fixed.get(endpoint.label()).cloned(),
        };
        response.ok_or_else(|| FetchError::Status {
            endpoint: endpoint.label().to_string(),
            status: 503,
        })
    }
}

impl RecordSource for ScriptedSource {
    fn fetch(&self, endpoint: Endpoint) -> impl Future<Output = Result<Value, FetchError>> + Send {
        let response = self.next(endpoint);
        async move { response }
    }
}

/// Destination that keeps every message it is given.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<OutgoingMessage>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A destination that rejects every message.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(
        &self,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send {
        let result = if self.fail {
            Err(NotifyError::Status(500))
        } else {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        };
        async move { result }
    }
}
