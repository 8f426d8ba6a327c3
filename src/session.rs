//! Session persistence for ward.
//!
//! Each session is stored as a JSONL file under `~/.local/share/ward/sessions/`.
//! A `sessions/index.json` file maintains metadata for all sessions.
//! JSONL is crash-safe (append-only) and human-readable; tool-call proposals
//! and tool results persist alongside ordinary messages, so a resumed session
//! replays the full conversation including executed tool activity.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::message::{Message, Role};

/// Metadata for a single session, stored in the session index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMeta {
    pub id: String,
    pub title: Option<String>,
    pub model: String,
    pub created_at: String,
    pub updated_at: String,
    pub message_count: usize,
}

/// Index of all sessions, persisted as `index.json`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SessionIndex {
    pub sessions: Vec<SessionMeta>,
}

/// An active conversation session.
///
/// Holds the in-memory history the control loop appends to, and mirrors it
/// into a JSONL file plus the session index.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub messages: Vec<Message>,
    pub model: String,
    pub file_path: PathBuf,
}

impl Session {
    /// Creates a new session with a UUID v4 identifier.
    pub fn new(model: &str) -> Result<Self> {
        let id = Uuid::new_v4().to_string();
        let dir = Self::sessions_dir()?;
        fs::create_dir_all(&dir).context("Failed to create sessions directory")?;
        let file_path = Self::session_path(&id)?;

        Ok(Self {
            id,
            messages: Vec::new(),
            model: model.to_string(),
            file_path,
        })
    }

    /// Loads an existing session from its JSONL file.
    ///
    /// Reads the model from the session index and all messages from the JSONL file.
    pub fn load(id: &str) -> Result<Self> {
        let file_path = Self::session_path(id)?;
        // The ID is user-supplied here; byte-slicing it could split a char.
        let short: String = id.chars().take(8).collect();
        anyhow::ensure!(file_path.exists(), "Session {} not found", short);

        // Read model from index
        let index = Self::load_index()?;
        let model = index
            .sessions
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.model.clone())
            .unwrap_or_default();

        // Read messages from JSONL
        let file = fs::File::open(&file_path)
            .with_context(|| format!("Failed to open session file {:?}", file_path))?;
        let reader = BufReader::new(file);
        let mut messages = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let msg: Message = serde_json::from_str(&line)
                .with_context(|| "Failed to parse message from session file")?;
            messages.push(msg);
        }

        Ok(Self {
            id: id.to_string(),
            messages,
            model,
            file_path,
        })
    }

    /// Appends a message and persists it immediately.
    pub fn append(&mut self, msg: Message) -> Result<()> {
        self.messages.push(msg);
        self.flush_from(self.messages.len() - 1)
    }

    /// Persists `messages[start..]` to the JSONL file and updates the index.
    ///
    /// The control loop appends several messages per turn (tool-call
    /// proposals, tool results, the final answer) directly to the in-memory
    /// history; the chat loop calls this once per completed turn with the
    /// pre-turn length.
    pub fn flush_from(&mut self, start: usize) -> Result<()> {
        if start >= self.messages.len() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .with_context(|| format!("Failed to open session file {:?}", self.file_path))?;

        for msg in &self.messages[start..] {
            let json = serde_json::to_string(msg)?;
            writeln!(file, "{}", json)?;
        }
        file.flush()?;

        self.update_index()
    }

    /// Drops everything but system messages, in memory and on disk, so a
    /// resumed session does not replay a cleared conversation.
    pub fn clear(&mut self) -> Result<()> {
        self.messages.retain(|m| m.role == Role::System);
        self.rewrite()?;
        self.update_index()
    }

    /// Rewrites the whole JSONL file from the in-memory messages.
    fn rewrite(&self) -> Result<()> {
        let mut out = String::new();
        for msg in &self.messages {
            out.push_str(&serde_json::to_string(msg)?);
            out.push('\n');
        }
        fs::write(&self.file_path, out)
            .with_context(|| format!("Failed to rewrite session file {:?}", self.file_path))
    }

    /// Returns the session title derived from the first user message.
    ///
    /// Truncates to 50 characters. Returns `None` if no user message exists.
    pub fn title(&self) -> Option<String> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| {
                let text = m.text();
                if text.chars().count() > 50 {
                    let truncated: String = text.chars().take(50).collect();
                    format!("{}...", truncated)
                } else {
                    text.to_string()
                }
            })
    }

    /// Updates (or creates) this session's entry in the index file.
    fn update_index(&self) -> Result<()> {
        let mut index = Self::load_index()?;
        let now = Utc::now().to_rfc3339();

        if let Some(entry) = index.sessions.iter_mut().find(|s| s.id == self.id) {
            entry.title = self.title();
            entry.updated_at = now;
            entry.message_count = self.messages.len();
        } else {
            index.sessions.push(SessionMeta {
                id: self.id.clone(),
                title: self.title(),
                model: self.model.clone(),
                created_at: now.clone(),
                updated_at: now,
                message_count: self.messages.len(),
            });
        }

        let path = Self::index_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&index)?;
        fs::write(&path, json).with_context(|| "Failed to write session index")?;

        Ok(())
    }

    /// Loads the session index, returning a default empty index if the file doesn't exist.
    fn load_index() -> Result<SessionIndex> {
        let path = Self::index_path()?;
        if !path.exists() {
            return Ok(SessionIndex::default());
        }
        let contents = fs::read_to_string(&path).with_context(|| "Failed to read session index")?;
        let index: SessionIndex =
            serde_json::from_str(&contents).with_context(|| "Failed to parse session index")?;
        Ok(index)
    }

    /// Returns the sessions directory path (`~/.local/share/ward/sessions/`).
    fn sessions_dir() -> Result<PathBuf> {
        Ok(Config::data_dir()?.join("sessions"))
    }

    /// Returns the JSONL file path for a given session ID.
    fn session_path(id: &str) -> Result<PathBuf> {
        Ok(Self::sessions_dir()?.join(format!("{}.jsonl", id)))
    }

    /// Returns the path to the session index file.
    fn index_path() -> Result<PathBuf> {
        Ok(Self::sessions_dir()?.join("index.json"))
    }

    /// Returns metadata for all sessions.
    pub fn list_all() -> Result<Vec<SessionMeta>> {
        let index = Self::load_index()?;
        Ok(index.sessions)
    }

    /// Deletes a session's JSONL file and removes it from the index.
    pub fn delete(id: &str) -> Result<()> {
        let path = Self::session_path(id)?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete session file {:?}", path))?;
        }

        let mut index = Self::load_index()?;
        index.sessions.retain(|s| s.id != id);

        let index_path = Self::index_path()?;
        let dir = Self::sessions_dir()?;
        if dir.exists() {
            let json = serde_json::to_string_pretty(&index)?;
            fs::write(&index_path, json).with_context(|| "Failed to update session index")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn load_with_multibyte_id_reports_not_found() {
        // A byte slice at position 8 would land inside a multibyte char.
        let err = Session::load("日本語セッション").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn clear_drops_conversation_from_the_session_file() {
        let id = Uuid::new_v4().to_string();
        let path = std::env::temp_dir().join(format!("ward-clear-{}.jsonl", id));
        let mut session = Session {
            id: id.clone(),
            messages: vec![
                Message::system("be helpful"),
                Message::user("hi"),
                Message::assistant("hello"),
            ],
            model: "test-model".to_string(),
            file_path: path.clone(),
        };

        session.clear().unwrap();

        assert_eq!(session.messages.len(), 1);
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let kept: Message = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(kept.role, Role::System);

        fs::remove_file(&path).ok();
        Session::delete(&id).ok();
    }
}
