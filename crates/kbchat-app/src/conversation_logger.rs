use anyhow::Result;
use chrono::Local;
use kbchat_types::Message;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

#[derive(Serialize)]
struct LogEntry {
    timestamp: String, // ISO-8601 Local time
    role: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

/// Append-only JSONL log of the session, one file per run under `logs/`.
///
/// Diagnostics output only: nothing is ever read back, and logging failures
/// never interrupt the conversation.
pub struct ConversationLogger {
    file_path: PathBuf,
    file: Option<tokio::fs::File>,
}

impl ConversationLogger {
    /// Create a new logger; generates the file name based on the current local time.
    pub async fn new(workspace: &Path) -> Result<Self> {
        Self::create(workspace, "").await
    }

    /// Create a new logger for one-shot ask mode; the file name gets an "-ask" suffix.
    pub async fn new_ask_mode(workspace: &Path) -> Result<Self> {
        Self::create(workspace, "-ask").await
    }

    async fn create(workspace: &Path, suffix: &str) -> Result<Self> {
        let logs_dir = workspace.join("logs");
        fs::create_dir_all(&logs_dir).await?;

        let now_local = Local::now();
        let filename = format!("kbchat-{}{}.jsonl", now_local.format("%Y-%m-%d-%H%M%S"), suffix);
        let file_path = logs_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        Ok(Self {
            file_path,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Append a single log entry.
    pub async fn log(&mut self, role: &str, text: &str, model: Option<&str>) {
        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            role: role.to_string(),
            text: text.to_string(),
            model: model.map(|s| s.to_string()),
        };
        if let Some(file) = &mut self.file {
            if let Ok(json) = serde_json::to_string(&entry) {
                if let Err(e) = file.write_all(json.as_bytes()).await {
                    eprintln!("[Logging error] {}", e);
                } else if let Err(e) = file.write_all(b"\n").await {
                    eprintln!("[Logging error] {}", e);
                }
            }
        }
    }

    /// Append a conversation message.
    pub async fn log_message(&mut self, message: &Message, model: Option<&str>) {
        self.log(message.role.as_str(), &message.text, model).await;
    }

    /// Close the logger (explicit drop). Called on graceful shutdown.
    pub async fn shutdown(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.sync_all().await;
        }
    }
}
