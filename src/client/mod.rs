//! Client-side conversation store: optimistic append, in-flight tracking,
//! and fallback turns when the relay cannot be reached.

use crate::llm::FALLBACK_REPLY;
use crate::models::chat::{ ChatReply, ChatRequest, Turn };
use async_trait::async_trait;
use log::warn;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Seeded assistant greeting every fresh conversation starts with.
pub const GREETING: &str =
    "Hello — I'm HealthTalk. Ask anything about sexual & reproductive health.";

/// Assistant turn rendered when the relay itself cannot be reached.
pub const UNREACHABLE_MESSAGE: &str =
    "Server error — please make sure the backend is running.";

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay returned status {status}")]
    Status { status: u16 },

    #[error("relay body was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError>;
}

/// Posts to `{base_url}/api/chat`. The base address is fixed at
/// construction, not discovered dynamically.
pub struct HttpChatTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatTransport {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let resp = self.http.post(&url).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Session activity derived from the in-flight dispatch counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionActivity {
    Idle,
    Sending { in_flight: usize },
}

pub struct ChatSession {
    turns: Arc<Mutex<Vec<Turn>>>,
    input: Arc<Mutex<String>>,
    in_flight: Arc<AtomicUsize>,
    transport: Arc<dyn ChatTransport>,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            turns: Arc::new(Mutex::new(vec![Turn::assistant(GREETING)])),
            input: Arc::new(Mutex::new(String::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            transport,
        }
    }

    pub async fn set_input(&self, text: &str) {
        *self.input.lock().await = text.to_string();
    }

    pub async fn turns(&self) -> Vec<Turn> {
        self.turns.lock().await.clone()
    }

    pub fn is_typing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn activity(&self) -> SessionActivity {
        match self.in_flight.load(Ordering::SeqCst) {
            0 => SessionActivity::Idle,
            n => SessionActivity::Sending { in_flight: n },
        }
    }

    /// Sends `text`, or the current input buffer when `None`. Empty input
    /// after trimming is a no-op. The user turn is appended before any
    /// network IO; exactly one assistant turn (reply or fallback) is
    /// appended once the dispatch settles. Never returns an error.
    ///
    /// Multiple submits may be in flight at once; assistant turns land in
    /// resolution order, not issue order. That is documented behavior, a
    /// strict FIFO would need a request queue.
    pub async fn submit(&self, text: Option<&str>) {
        let text = match text {
            Some(t) => t.trim().to_string(),
            None => self.input.lock().await.trim().to_string(),
        };
        if text.is_empty() {
            return;
        }

        let snapshot = {
            let mut turns = self.turns.lock().await;
            turns.push(Turn::user(text));
            turns.iter().map(Turn::to_wire).collect()
        };
        self.input.lock().await.clear();

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let reply = self.dispatch(ChatRequest { messages: snapshot }).await;
        self.turns.lock().await.push(Turn::assistant(reply));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    /// Pre-canned prompts go through the exact same path as typed input.
    pub async fn send_quick_prompt(&self, text: &str) {
        self.submit(Some(text)).await;
    }

    /// Replaces the conversation with a fresh greeting and clears the
    /// input buffer.
    pub async fn reset(&self) {
        *self.turns.lock().await = vec![Turn::assistant(GREETING)];
        self.input.lock().await.clear();
    }

    async fn dispatch(&self, request: ChatRequest) -> String {
        match self.transport.send(&request).await {
            Ok(reply) if !reply.reply.trim().is_empty() => reply.reply,
            Ok(_) => FALLBACK_REPLY.to_string(),
            Err(e) => {
                warn!("Chat dispatch failed: {}", e);
                UNREACHABLE_MESSAGE.to_string()
            }
        }
    }
}
