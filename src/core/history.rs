//! Persistence of tutoring conversations in the platform data directory.
//!
//! Each conversation is one JSON file of API-format messages next to an
//! `index.json` holding metadata. Load failures degrade to a fresh session.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::message;
use crate::core::paths;

/// Max length for a conversation title derived from the first user message.
const TITLE_MAX_LEN: usize = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMeta {
    pub id: String,
    pub title: String,
    pub created_at: u64,
    pub updated_at: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Index {
    conversations: Vec<ConversationMeta>,
}

fn index_path(dir: &Path) -> PathBuf {
    dir.join("index.json")
}

fn conv_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.json", id))
}

fn load_index(dir: &Path) -> Index {
    let raw = match fs::read_to_string(index_path(dir)) {
        Ok(raw) => raw,
        Err(_) => return Index::default(),
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        log::warn!("corrupt conversation index: {}", e);
        Index::default()
    })
}

fn write_index(dir: &Path, index: &Index) -> io::Result<()> {
    let json = serde_json::to_string_pretty(index)
        .map_err(|e| io::Error::other(format!("serialize index: {}", e)))?;
    fs::write(index_path(dir), json)
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_else(|e| {
            log::warn!("system time before UNIX epoch: {}", e);
            0
        })
}

/// Title from the first user message, truncated with an ellipsis.
pub fn title_from_messages(messages: &[Value]) -> String {
    for msg in messages {
        if msg.get("role").and_then(|r| r.as_str()) == Some("user")
            && let Some(content) = message::extract_content(msg)
        {
            let s = content.trim().replace('\n', " ");
            if s.chars().count() <= TITLE_MAX_LEN {
                return s;
            }
            let truncated: String = s.chars().take(TITLE_MAX_LEN - 1).collect();
            return format!("{}…", truncated);
        }
    }
    "(No title)".to_string()
}

/// Keep only user and assistant messages; system prompts are rebuilt fresh
/// on each run and never persisted.
fn persistable(messages: &[Value]) -> Vec<Value> {
    messages
        .iter()
        .filter(|m| {
            matches!(
                m.get("role").and_then(|r| r.as_str()),
                Some("user") | Some("assistant")
            )
        })
        .cloned()
        .collect()
}

fn save_in(dir: &Path, id: Option<&str>, messages: &[Value]) -> io::Result<String> {
    fs::create_dir_all(dir)?;
    let keep = persistable(messages);
    if keep.is_empty() {
        return match id {
            Some(existing) => Ok(existing.to_string()),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot save an empty conversation",
            )),
        };
    }

    let conv_id = id
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let json = serde_json::to_string_pretty(&keep)
        .map_err(|e| io::Error::other(format!("serialize conversation: {}", e)))?;
    fs::write(conv_path(dir, &conv_id), json)?;

    let now = unix_now();
    let mut index = load_index(dir);
    match index.conversations.iter_mut().find(|c| c.id == conv_id) {
        Some(meta) => {
            meta.title = title_from_messages(&keep);
            meta.updated_at = now;
        }
        None => index.conversations.push(ConversationMeta {
            id: conv_id.clone(),
            title: title_from_messages(&keep),
            created_at: now,
            updated_at: now,
        }),
    }
    write_index(dir, &index)?;
    Ok(conv_id)
}

fn load_in(dir: &Path, id: &str) -> Option<Vec<Value>> {
    let raw = fs::read_to_string(conv_path(dir, id)).ok()?;
    match serde_json::from_str(&raw) {
        Ok(messages) => Some(messages),
        Err(e) => {
            log::warn!("corrupt conversation {}: {}", id, e);
            None
        }
    }
}

fn latest_in(dir: &Path) -> Option<ConversationMeta> {
    load_index(dir)
        .conversations
        .into_iter()
        .max_by_key(|c| c.updated_at)
}

/// Save a conversation (create or update). Returns the conversation id.
pub fn save_conversation(id: Option<&str>, messages: &[Value]) -> io::Result<String> {
    let dir = paths::conversations_dir()
        .ok_or_else(|| io::Error::other("no home directory for conversations"))?;
    save_in(&dir, id, messages)
}

/// Load the most recently updated conversation, if any.
pub fn load_latest() -> Option<(ConversationMeta, Vec<Value>)> {
    let dir = paths::conversations_dir()?;
    let meta = latest_in(&dir)?;
    let messages = load_in(&dir, &meta.id)?;
    Some((meta, messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_messages() -> Vec<Value> {
        vec![
            json!({"role": "system", "content": "tutor prompt"}),
            json!({"role": "user", "content": "Explain strong induction"}),
            json!({"role": "assistant", "content": "Strong induction assumes..."}),
        ]
    }

    #[test]
    fn save_strips_system_and_round_trips() {
        let tmp = tempfile::TempDir::new().unwrap();
        let id = save_in(tmp.path(), None, &sample_messages()).unwrap();
        let loaded = load_in(tmp.path(), &id).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0]["role"], "user");
    }

    #[test]
    fn save_empty_conversation_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = save_in(tmp.path(), None, &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn resave_updates_index_in_place() {
        let tmp = tempfile::TempDir::new().unwrap();
        let id = save_in(tmp.path(), None, &sample_messages()).unwrap();
        let mut more = sample_messages();
        more.push(json!({"role": "user", "content": "and weak induction?"}));
        let id2 = save_in(tmp.path(), Some(&id), &more).unwrap();
        assert_eq!(id, id2);
        let index = load_index(tmp.path());
        assert_eq!(index.conversations.len(), 1);
    }

    #[test]
    fn latest_prefers_most_recently_updated() {
        let tmp = tempfile::TempDir::new().unwrap();
        let first = save_in(tmp.path(), None, &sample_messages()).unwrap();
        let second = save_in(tmp.path(), None, &sample_messages()).unwrap();
        // Force distinct update times without sleeping.
        let mut index = load_index(tmp.path());
        for meta in index.conversations.iter_mut() {
            if meta.id == second {
                meta.updated_at += 10;
            }
        }
        write_index(tmp.path(), &index).unwrap();
        assert_eq!(latest_in(tmp.path()).unwrap().id, second);
        assert_ne!(first, second);
    }

    #[test]
    fn title_truncates_long_first_message() {
        let long = "x".repeat(200);
        let messages = vec![json!({"role": "user", "content": long})];
        let title = title_from_messages(&messages);
        assert!(title.chars().count() <= TITLE_MAX_LEN);
        assert!(title.ends_with('…'));
    }

    #[test]
    fn missing_conversation_loads_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(load_in(tmp.path(), "nope").is_none());
    }
}
