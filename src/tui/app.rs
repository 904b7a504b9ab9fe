//! TUI application state: two chat logs, input, scroll, and challenge data.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::core::challenges::{Challenge, ChallengeStats};
use crate::core::message;
use crate::core::profile::LearningProfile;

/// Which of the two chat views is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Tutor,
    Challenge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChatMessage {
    User(String),
    Assistant(String),
    /// One-line status note (attempt recorded, fetch failed, ...).
    Notice(String),
    Thinking,
}

fn unix_timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// One chat transcript plus per-message timestamps.
#[derive(Debug, Default)]
pub(crate) struct MessageLog {
    pub messages: Vec<ChatMessage>,
    pub timestamps: Vec<Option<u64>>,
}

impl MessageLog {
    pub(crate) fn push_user(&mut self, text: &str) {
        self.messages.push(ChatMessage::User(text.to_string()));
        self.timestamps.push(Some(unix_timestamp_secs()));
    }

    pub(crate) fn push_notice(&mut self, text: String) {
        self.messages.push(ChatMessage::Notice(text));
        self.timestamps.push(None);
    }

    /// Append a streamed chunk to the last assistant message, or start one.
    pub(crate) fn append_assistant_chunk(&mut self, chunk: &str) {
        match self.messages.last_mut() {
            Some(ChatMessage::Assistant(s)) => s.push_str(chunk),
            _ => {
                self.messages
                    .push(ChatMessage::Assistant(chunk.to_string()));
                self.timestamps.push(Some(unix_timestamp_secs()));
            }
        }
    }

    /// Replace the last assistant message, or push one if none.
    pub(crate) fn replace_or_push_assistant(&mut self, content: String) {
        if let Some(ChatMessage::Assistant(s)) = self.messages.last_mut() {
            *s = content;
        } else {
            self.messages.push(ChatMessage::Assistant(content));
            self.timestamps.push(Some(unix_timestamp_secs()));
        }
    }

    pub(crate) fn set_thinking(&mut self, thinking: bool) {
        if thinking {
            self.messages.push(ChatMessage::Thinking);
            self.timestamps.push(None);
        } else {
            let (messages, timestamps): (Vec<_>, Vec<_>) = self
                .messages
                .drain(..)
                .zip(self.timestamps.drain(..))
                .filter(|(m, _)| !matches!(m, ChatMessage::Thinking))
                .unzip();
            self.messages = messages;
            self.timestamps = timestamps;
        }
    }

    /// Append a cancelled notice, keeping any streamed partial content.
    pub(crate) fn append_cancelled_notice(&mut self) {
        match self.messages.last_mut() {
            Some(ChatMessage::Assistant(s)) if !s.is_empty() => {
                s.push_str("\n\n*[Request cancelled]*");
            }
            _ => self.push_notice("Request cancelled".to_string()),
        }
    }

    /// Populate from persisted API-format messages.
    pub(crate) fn set_from_api(&mut self, api_messages: &[Value]) {
        self.messages.clear();
        self.timestamps.clear();
        for msg in api_messages {
            let role = msg.get("role").and_then(|r| r.as_str()).unwrap_or("");
            if role != "user" && role != "assistant" {
                continue;
            }
            let content = match message::extract_content(msg) {
                Some(c) => c,
                None => {
                    log::warn!("could not extract content from {} message", role);
                    "[Unsupported message format]".to_string()
                }
            };
            if role == "user" {
                self.messages.push(ChatMessage::User(content));
            } else {
                self.messages.push(ChatMessage::Assistant(content));
            }
            self.timestamps
                .push(msg.get("timestamp").and_then(|t| t.as_u64()));
        }
    }
}

/// Challenge view state: today's challenge, stats, and submission tracking.
#[derive(Debug, Default)]
pub(crate) struct ChallengeState {
    pub challenge: Option<Challenge>,
    pub stats: Option<ChallengeStats>,
    pub fetch_error: Option<String>,
    /// When the student started composing the current answer.
    pub answer_started_at: Option<Instant>,
    /// Answer text awaiting submission once the assessment arrives.
    pub pending_answer: Option<String>,
}

pub(crate) struct App {
    pub view: View,
    pub model_name: String,
    pub show_timestamps: bool,
    pub profile: LearningProfile,

    pub tutor_log: MessageLog,
    pub challenge_log: MessageLog,
    pub challenge: ChallengeState,

    pub input: String,
    pub is_streaming: bool,
    /// Lines scrolled up from the bottom of the transcript (0 = stick to end).
    pub scroll_from_bottom: usize,
    /// Set by the draw pass: how far the transcript can scroll.
    pub last_max_scroll: usize,
    pub conversation_id: Option<String>,
    pub dirty: bool,
    pub thinking_frame: usize,
}

impl App {
    pub(crate) fn new(
        model_name: String,
        profile: LearningProfile,
        show_timestamps: bool,
    ) -> Self {
        Self {
            view: View::Tutor,
            model_name,
            show_timestamps,
            profile,
            tutor_log: MessageLog::default(),
            challenge_log: MessageLog::default(),
            challenge: ChallengeState::default(),
            input: String::new(),
            is_streaming: false,
            scroll_from_bottom: 0,
            last_max_scroll: 0,
            conversation_id: None,
            dirty: false,
            thinking_frame: 0,
        }
    }

    pub(crate) fn log_for_mut(&mut self, view: View) -> &mut MessageLog {
        match view {
            View::Tutor => &mut self.tutor_log,
            View::Challenge => &mut self.challenge_log,
        }
    }

    pub(crate) fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Tutor => View::Challenge,
            View::Challenge => View::Tutor,
        };
        self.scroll_from_bottom = 0;
    }

    pub(crate) fn scroll_up(&mut self, lines: usize) {
        self.scroll_from_bottom = (self.scroll_from_bottom + lines).min(self.last_max_scroll);
    }

    pub(crate) fn scroll_down(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }
}

/// Format elapsed seconds the way the backend stores time spent: "45s"
/// under a minute, whole minutes above.
pub(crate) fn format_time_spent(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m", secs / 60)
    }
}
