use crate::api::{ChatApi, ChatReply, ChatTransport};
use crate::errors::StockchatResult;
use crate::message::ChatMessage;
use ratatui::style::Color;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Online,
    Offline,
    Connecting,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Online => "online",
            ConnectionStatus::Offline => "offline",
            ConnectionStatus::Connecting => "connecting",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ConnectionStatus::Online => Color::Green,
            ConnectionStatus::Offline => Color::Red,
            ConnectionStatus::Connecting => Color::Yellow,
        }
    }
}

/// A send that has passed the guards and had its state transitions applied.
/// Executing it holds the API lock only around the session-id bookkeeping on
/// either side of the request, never across the request itself, so health
/// probes and dashboard fetches are not stuck behind a slow turn.
pub struct PendingSend {
    api: Arc<Mutex<ChatApi>>,
    text: String,
    session_id: Option<String>,
    epoch: u64,
}

impl PendingSend {
    /// The conversation this send belongs to; a completion whose epoch no
    /// longer matches the session's is stale and must be discarded.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub async fn execute(self) -> StockchatResult<ChatReply> {
        let (transport, user_id) = {
            let mut api = self.api.lock().await;
            let user_id = api.prepare_session_id(self.session_id.as_deref());
            (api.transport(), user_id)
        };

        let raw = transport.post_message(&self.text, &user_id).await?;

        // Reacquire only to adopt the returned id; nothing but a completed
        // send updates it.
        let mut api = self.api.lock().await;
        Ok(api.adopt_reply(raw, user_id))
    }
}

/// The authoritative in-memory state for one chat view: message log, loading
/// flag, last error, and connection status. Each turn runs
/// idle -> sending -> (success | error) -> idle; overlapping sends are
/// rejected while one is in flight.
pub struct ChatSession {
    api: Arc<Mutex<ChatApi>>,
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub connection: ConnectionStatus,
    session_id: Option<String>,
    next_id: u64,
    epoch: u64,
}

impl ChatSession {
    pub fn new(api: ChatApi) -> Self {
        let mut session = Self {
            api: Arc::new(Mutex::new(api)),
            messages: Vec::new(),
            is_loading: false,
            error: None,
            connection: ConnectionStatus::Online,
            session_id: None,
            next_id: 0,
            epoch: 0,
        };
        let id = session.allocate_id();
        session.messages.push(ChatMessage::welcome(id));
        session
    }

    /// Ids are a strictly monotonic counter, never wall-clock time: two sends
    /// inside one millisecond must still get distinct ids.
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Bumped whenever the conversation is reset; completions carrying a
    /// stale epoch belong to a discarded conversation and must be dropped.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// First phase of a turn: guards, the optimistic user-message insert, and
    /// the loading/status flip. Returns `None` (and changes nothing) for
    /// blank text or while a send is already in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingSend> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.is_loading {
            return None;
        }

        let id = self.allocate_id();
        self.messages.push(ChatMessage::user(id, trimmed.to_string()));
        self.is_loading = true;
        self.error = None;
        self.connection = ConnectionStatus::Connecting;

        Some(PendingSend {
            api: Arc::clone(&self.api),
            text: trimmed.to_string(),
            session_id: self.session_id.clone(),
            epoch: self.epoch,
        })
    }

    /// Final phase of a turn; always clears the loading flag.
    pub fn complete_send(&mut self, result: StockchatResult<ChatReply>) {
        match result {
            Ok(reply) => {
                self.session_id = Some(reply.session_id.clone());
                let id = self.allocate_id();
                self.messages.push(ChatMessage::bot(
                    id,
                    reply.response,
                    reply.products,
                    reply.timestamp,
                ));
                self.connection = ConnectionStatus::Online;
            }
            Err(err) => {
                log::warn!("chat turn failed: {}", err);
                let user_text = err.user_message().to_string();
                self.error = Some(user_text.clone());
                let id = self.allocate_id();
                self.messages.push(ChatMessage::error(id, user_text));
                self.connection = ConnectionStatus::Offline;
            }
        }
        self.is_loading = false;
    }

    /// One whole turn. The TUI splits this into `begin_send` / `execute` /
    /// `complete_send` so the app lock is not held across the request.
    pub async fn send_message(&mut self, text: &str) {
        if let Some(pending) = self.begin_send(text) {
            let epoch = pending.epoch();
            let result = pending.execute().await;
            if epoch == self.epoch {
                self.complete_send(result);
            }
        }
    }

    /// Resets to a single fresh welcome message and severs the backend
    /// session, fully decoupling the next turn from this conversation. Works
    /// mid-send too: the epoch bump makes any in-flight completion stale, so
    /// its result never lands in the new conversation.
    pub async fn start_new_chat(&mut self) {
        let id = self.allocate_id();
        self.messages = vec![ChatMessage::welcome(id)];
        self.error = None;
        self.session_id = None;
        self.is_loading = false;
        self.connection = ConnectionStatus::Online;
        self.epoch += 1;
        self.api.lock().await.reset_session();
    }

    /// Drops every error-flagged message and stages the most recent user
    /// message for another attempt. The user message stays in the log; only
    /// the new bot result is appended. `None` if there is nothing to retry or
    /// a send is in flight.
    pub fn prepare_retry(&mut self) -> Option<PendingSend> {
        if self.is_loading {
            return None;
        }
        let text = self
            .messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content.clone())?;

        self.messages.retain(|m| !m.is_error);
        self.is_loading = true;
        self.error = None;
        self.connection = ConnectionStatus::Connecting;

        Some(PendingSend {
            api: Arc::clone(&self.api),
            text,
            session_id: self.session_id.clone(),
            epoch: self.epoch,
        })
    }

    pub async fn retry_last_message(&mut self) {
        if let Some(pending) = self.prepare_retry() {
            let epoch = pending.epoch();
            let result = pending.execute().await;
            if epoch == self.epoch {
                self.complete_send(result);
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Applies a periodic health-probe result. An in-flight send owns the
    /// connection status, so probe results are discarded while loading; this
    /// is the precedence rule that replaces the source's status flicker.
    pub fn apply_health(&mut self, healthy: bool) {
        if self.is_loading {
            return;
        }
        self.connection = if healthy {
            ConnectionStatus::Online
        } else {
            ConnectionStatus::Offline
        };
    }

    /// Clones the API handle for background tasks (health polling).
    pub fn api_handle(&self) -> Arc<Mutex<ChatApi>> {
        Arc::clone(&self.api)
    }

    /// A stateless transport clone for requests that must not queue behind
    /// the chat turn in flight (health probes, inventory fetches).
    pub async fn transport(&self) -> ChatTransport {
        self.api.lock().await.transport()
    }
}
