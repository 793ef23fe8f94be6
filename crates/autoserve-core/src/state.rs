//! UI-agnostic application state types
//!
//! These are shared by any front end and don't depend on a UI framework.

use serde::{Deserialize, Serialize};

/// A chat message in the assistant conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Ordered, append-only conversation history (oldest first)
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with an assistant greeting
    pub fn with_greeting(greeting: &str) -> Self {
        let mut log = Self::new();
        log.push(ChatRole::Assistant, greeting);
        log
    }

    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Body of a service booking, sent once with no retry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub vehicle_id: String,
    pub date: String,
    pub time: String,
    pub service_center: String,
}

/// Selections on the scheduling panel. Confirming is only possible once every field
/// has a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub service_center: Option<String>,
    pub date: String,
    pub time: Option<String>,
}

impl BookingForm {
    pub fn is_complete(&self) -> bool {
        let filled = |s: &str| !s.trim().is_empty();
        self.service_center.as_deref().is_some_and(filled)
            && filled(&self.date)
            && self.time.as_deref().is_some_and(filled)
    }

    /// Build the request for `vehicle_id`, or `None` while the form is incomplete
    pub fn request_for(&self, vehicle_id: &str) -> Option<ScheduleRequest> {
        if !self.is_complete() {
            return None;
        }
        Some(ScheduleRequest {
            vehicle_id: vehicle_id.to_string(),
            date: self.date.trim().to_string(),
            time: self.time.clone()?,
            service_center: self.service_center.clone()?,
        })
    }
}
