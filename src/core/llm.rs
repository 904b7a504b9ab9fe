//! Tutoring chat: streaming model calls personalized by the learning
//! profile, the academic calendar, and (in the challenge view) today's
//! challenge.

use std::sync::OnceLock;

use async_openai::Client;
use futures::StreamExt;
use regex::Regex;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::core::calendar;
use crate::core::challenges::Challenge;
use crate::core::config::Config;
use crate::core::profile::LearningProfile;

/// Max content size to prevent unbounded memory growth from malformed streams.
const MAX_CONTENT_BYTES: usize = 2 * 1024 * 1024;

/// Errors from the chat pipeline.
#[derive(Debug)]
pub enum ChatError {
    ApiAuth(String),
    ApiMessage(String),
    /// The request was cancelled by the user.
    Cancelled,
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::ApiAuth(msg) => write!(f, "{}", msg),
            ChatError::ApiMessage(msg) => write!(f, "API error: {}", msg),
            ChatError::Cancelled => write!(f, "Request cancelled"),
            ChatError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ChatError {}

/// Map async-openai or API errors into ChatError.
fn map_api_error<E>(e: E) -> ChatError
where
    E: std::fmt::Display + Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    let s = e.to_string();
    if s.contains("401") {
        return ChatError::ApiAuth(
            "API error (401): model endpoint rejected the key. Check NALA_MODEL_API_KEY in .env."
                .to_string(),
        );
    }
    if s.contains("\"error\"")
        && let Some((_, rest)) = s.split_once("\"message\":\"")
        && let Some((msg, _)) = rest.split_once('"')
    {
        return ChatError::ApiMessage(msg.to_string());
    }
    ChatError::Other(e.into())
}

/// Callback for each streamed content chunk.
pub type OnContentChunk = Box<dyn Fn(&str) + Send>;

pub struct ChatRequest<'a> {
    pub config: &'a Config,
    pub prompt: &'a str,
    /// Prior conversation in API format; the system message is refreshed.
    pub previous_messages: Option<Vec<Value>>,
    pub profile: &'a LearningProfile,
    /// Set in the challenge view: the reply assesses an answer to this.
    pub challenge: Option<&'a Challenge>,
    pub on_content_chunk: Option<OnContentChunk>,
    pub cancel_token: Option<CancellationToken>,
}

pub struct ChatOutcome {
    pub content: String,
    /// Full conversation including the new exchange, for persistence.
    pub messages: Vec<Value>,
}

/// Assemble the tutor's system prompt for `today`.
pub fn system_prompt(
    profile: &LearningProfile,
    today: chrono::NaiveDate,
    challenge: Option<&Challenge>,
) -> String {
    let mut prompt = String::from(
        "You are NALA, the tutoring assistant for the Discrete Mathematics course. \
         Be precise and encouraging. Write mathematics in LaTeX: $...$ for inline \
         expressions and $$...$$ for display equations; use **bold** for emphasis.",
    );

    if let Some(style) = profile.style {
        prompt.push_str(&format!(
            " The student is {}: favour {}.",
            style.display_name(),
            style.strategy()
        ));
    }
    let tier = calendar::question_level(profile.mastery);
    prompt.push_str(&format!(
        " Pitch questions at the '{}' tier ({}): {}.",
        tier.level, tier.blooms, tier.description
    ));

    if let Some(week) = calendar::current_week(today) {
        prompt.push_str(&format!(" It is {}", week.name()));
        if let Some(n) = week.teaching_week() {
            let topics = calendar::weekly_topics(n);
            if !topics.is_empty() {
                prompt.push_str(&format!("; this week's topics: {}", topics.join(", ")));
            }
        }
        prompt.push('.');
    }

    if let Some(c) = challenge {
        prompt.push_str(&format!(
            " The student is answering today's {} challenge on {}:\n{}\n\
             Assess their answer. Start your reply with a line of the exact form \
             `Assessment: NN%` (0-100), then give concrete feedback.",
            c.difficulty, c.category, c.question
        ));
    }
    prompt
}

/// Extract the `Assessment: NN%` score from a challenge-assessment reply.
pub fn parse_assessment_score(reply: &str) -> Option<u32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"Assessment:\s*\**\s*(\d{1,3})\s*%").expect("valid regex"));
    let score: u32 = re.captures(reply)?.get(1)?.as_str().parse().ok()?;
    Some(score.min(100))
}

/// One streamed chat turn. Returns the assistant reply and the updated
/// conversation; the request can be cancelled at any point.
pub async fn chat(req: ChatRequest<'_>) -> Result<ChatOutcome, ChatError> {
    let client = Client::with_config(req.config.openai_config.clone());
    let today = chrono::Local::now().date_naive();
    let system = json!({
        "role": "system",
        "content": system_prompt(req.profile, today, req.challenge),
    });

    let mut messages: Vec<Value> = req
        .previous_messages
        .unwrap_or_default()
        .into_iter()
        .filter(|m| m.get("role").and_then(|r| r.as_str()) != Some("system"))
        .collect();
    messages.insert(0, system);
    messages.push(json!({"role": "user", "content": req.prompt}));

    let chat_api = client.chat();
    let stream_future = chat_api.create_stream_byot::<_, Value>(json!({
        "model": req.config.model_id,
        "messages": &messages,
        "stream": true,
    }));

    let cancel = req.cancel_token.as_ref();
    let stream_result = if let Some(token) = cancel {
        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ChatError::Cancelled),
            result = stream_future => result,
        }
    } else {
        stream_future.await
    };
    let mut stream = stream_result.map_err(map_api_error)?;

    let mut content = String::new();
    loop {
        let chunk_opt = if let Some(token) = cancel {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ChatError::Cancelled),
                chunk = stream.next() => chunk,
            }
        } else {
            stream.next().await
        };
        let Some(chunk_result) = chunk_opt else { break };
        let chunk = chunk_result.map_err(map_api_error)?;

        if let Some(err) = chunk.get("error") {
            let msg = err
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown API error");
            return Err(ChatError::ApiMessage(msg.to_string()));
        }

        let delta_text = chunk
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("delta"))
            .and_then(|d| d.get("content"))
            .and_then(|c| c.as_str());
        if let Some(text) = delta_text
            && !text.is_empty()
            && content.len() + text.len() <= MAX_CONTENT_BYTES
        {
            content.push_str(text);
            if let Some(ref on_chunk) = req.on_content_chunk {
                on_chunk(text);
            }
        }
    }

    messages.push(json!({"role": "assistant", "content": content}));
    Ok(ChatOutcome { content, messages })
}
