//! In-memory chat transcript assembly.
//!
//! The chat service streams assistant replies as incremental chunks followed
//! by optional source citations and a terminal done or error frame. This
//! module folds that stream into a flat message list, independent of any
//! socket handling so it can be tested without one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A citation attached to an assistant reply. The service sends whatever
/// subset of fields it has for a given source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub credentials: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Message list plus the streaming flag that decides whether the next chunk
/// extends the last assistant message or starts a fresh one.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    streaming: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// True between the first chunk of a reply and its done or error frame.
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn push_user(&mut self, text: &str) {
        self.streaming = false;
        self.messages.push(Message {
            role: Role::User,
            text: text.to_string(),
            sources: Vec::new(),
        });
    }

    /// Append chunk text to the reply in progress, or open a new assistant
    /// message when there isn't one.
    pub fn apply_chunk(&mut self, text: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant && self.streaming => {
                last.text.push_str(text);
            }
            _ => {
                self.streaming = true;
                self.messages.push(Message {
                    role: Role::Assistant,
                    text: text.to_string(),
                    sources: Vec::new(),
                });
            }
        }
    }

    /// Attach citations to the assistant message being streamed. Sources
    /// that arrive outside an assistant turn are dropped.
    pub fn apply_sources(&mut self, sources: Vec<Source>) {
        if let Some(last) = self.messages.last_mut() {
            if last.role == Role::Assistant {
                last.sources = sources;
            }
        }
    }

    /// Mark the assistant turn complete. The next chunk starts a new message.
    pub fn finish_turn(&mut self) {
        self.streaming = false;
    }

    /// Record a server-side error as its own assistant message and end the
    /// turn.
    pub fn apply_error(&mut self, message: &str) {
        self.streaming = false;
        self.messages.push(Message {
            role: Role::Assistant,
            text: format!("Error: {}", message),
            sources: Vec::new(),
        });
    }
}
