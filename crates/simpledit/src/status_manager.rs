//! Transient messages that temporarily replace the cursor status line.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageType {
    fn default_duration(self) -> Duration {
        match self {
            MessageType::Info => Duration::from_secs(3),
            MessageType::Success => Duration::from_secs(2),
            MessageType::Warning => Duration::from_secs(5),
            MessageType::Error => Duration::from_secs(7),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl StatusMessage {
    pub fn new(content: String, message_type: MessageType) -> Self {
        Self::with_duration(content, message_type, message_type.default_duration())
    }

    fn with_duration(content: String, message_type: MessageType, duration: Duration) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusManager {
    current: Option<StatusMessage>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, content: String, message_type: MessageType) {
        self.current = Some(StatusMessage::new(content, message_type));
    }

    /// Drop the current message once it has expired.
    pub fn update(&mut self) {
        if self.current.as_ref().is_some_and(StatusMessage::is_expired) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }
}
