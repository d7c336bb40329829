//! Shared fixtures for service integration tests.

#![allow(dead_code)]

use lifeos_core::ai::{CompletionRequest, CompletionService};
use lifeos_core::config::TasksConfig;
use lifeos_core::notify::NotificationLog;
use lifeos_core::{AiError, LifeOs, MemoryStore, Severity};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type Hook = Box<dyn FnOnce() + Send>;

/// Completion service that replays canned answers in order.
#[derive(Default)]
pub struct Scripted {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    prompts: Mutex<Vec<CompletionRequest>>,
    gate: Option<Arc<Notify>>,
    during_call: Mutex<Option<Hook>>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(AiError::Transport("connection refused".into())));
        self
    }

    /// Hold every reply until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Run `hook` once, while the next request is in flight.
    pub fn during_next_call(&self, hook: impl FnOnce() + Send + 'static) {
        *self.during_call.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().map(|r| r.prompt.clone())
    }
}

impl CompletionService for Scripted {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let hook = self.during_call.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::EmptyResponse))
    }
}

pub struct Harness {
    pub app: LifeOs<MemoryStore, Scripted>,
    pub store: Arc<MemoryStore>,
    pub log: Arc<NotificationLog>,
}

impl Harness {
    pub fn new(ai: Scripted) -> Self {
        Self::with_config(ai, TasksConfig::default())
    }

    pub fn with_config(ai: Scripted, config: TasksConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let log = Arc::new(NotificationLog::new());
        let app = LifeOs::connect(store.clone(), ai, log.clone(), config).unwrap();
        Self { app, store, log }
    }

    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.log
            .entries()
            .into_iter()
            .filter(|n| n.severity == severity)
            .map(|n| n.message)
            .collect()
    }
}
