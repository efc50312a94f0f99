//! Core types and structures for kbchat
//!
//! This crate provides the foundational types used across all kbchat crates.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Constants
// ============================================================================

/// Id of the synthetic welcome message every conversation starts with
pub const WELCOME_MESSAGE_ID: &str = "welcome";

/// Model queried when no profile or CLI override is given
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Sampling temperature sent with every request
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

// ============================================================================
// Message Types
// ============================================================================

/// Who authored a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One entry in the conversation log. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp_ms: i64,
}

impl Message {
    /// Create a message with a fresh unique id and the current timestamp.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    /// The synthetic greeting that opens (and re-opens, after a reset) every
    /// conversation. Uses a fixed id so the log always starts from the same
    /// known entry.
    pub fn welcome(text: impl Into<String>) -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_string(),
            role: Role::Model,
            text: text.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

// ============================================================================
// Bot Profile
// ============================================================================

/// A developer-configured binary payload sent with every request, distinct
/// from anything the user attaches during the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemAttachment {
    pub media_type: String,
    pub base64_payload: String,
}

/// Immutable bot configuration, loaded once at startup and read-only
/// thereafter. Passed to the prompt composer and the response service at
/// construction instead of living in global constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotProfile {
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
    #[serde(default = "default_knowledge_base")]
    pub knowledge_base: String,
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    #[serde(default = "default_suggested_questions")]
    pub suggested_questions: Vec<String>,
    #[serde(default)]
    pub system_attachments: Vec<SystemAttachment>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_bot_name() -> String {
    "kbchat".to_string()
}

fn default_system_instruction() -> String {
    "You are a product documentation assistant. Answer strictly from the \
    KNOWLEDGE_BASE block provided with each request, in a concise and \
    friendly tone, using markdown formatting. If the knowledge base does \
    not cover a question, say so instead of guessing."
        .to_string()
}

fn default_knowledge_base() -> String {
    "kbchat is a knowledge-base-grounded chat assistant.\n\
    It injects this reference text into every model request so answers stay \
    grounded in the configured material.\n\
    Configuration lives in an optional TOML profile; the API credential is \
    read from the GEMINI_API_KEY environment variable."
        .to_string()
}

fn default_welcome_message() -> String {
    "Hi, I'm **kbchat**.\n\nAsk me anything covered by my knowledge base."
        .to_string()
}

fn default_suggested_questions() -> Vec<String> {
    vec![
        "What can you help me with?".to_string(),
        "How is the knowledge base configured?".to_string(),
        "Where does the API credential come from?".to_string(),
        "What file types can I attach?".to_string(),
    ]
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            system_instruction: default_system_instruction(),
            knowledge_base: default_knowledge_base(),
            welcome_message: default_welcome_message(),
            suggested_questions: default_suggested_questions(),
            system_attachments: Vec::new(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl BotProfile {
    /// Load a profile from a TOML file. Fields missing from the file fall
    /// back to the built-in defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile: {}", path.display()))?;
        let profile: BotProfile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse profile: {}", path.display()))?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        let role: Role = serde_json::from_str("\"model\"").unwrap();
        assert_eq!(role, Role::Model);
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("hello");
        let b = Message::model("hi");
        assert_ne!(a.id, b.id);
        assert_eq!(a.role, Role::User);
        assert_eq!(b.role, Role::Model);
    }

    #[test]
    fn test_welcome_message_uses_fixed_id() {
        let welcome = Message::welcome("greetings");
        assert_eq!(welcome.id, WELCOME_MESSAGE_ID);
        assert_eq!(welcome.role, Role::Model);
        assert_eq!(welcome.text, "greetings");
    }

    #[test]
    fn test_profile_defaults() {
        let profile = BotProfile::default();
        assert_eq!(profile.model, DEFAULT_MODEL);
        assert_eq!(profile.temperature, DEFAULT_TEMPERATURE);
        assert!(profile.system_attachments.is_empty());
        assert!(!profile.suggested_questions.is_empty());
    }

    #[test]
    fn test_profile_partial_toml() {
        let profile: BotProfile = toml::from_str(
            r#"
            bot_name = "docs-bot"
            knowledge_base = "The product ships on Tuesdays."

            [[system_attachments]]
            media_type = "application/pdf"
            base64_payload = "aGVsbG8="
            "#,
        )
        .unwrap();

        assert_eq!(profile.bot_name, "docs-bot");
        assert_eq!(profile.knowledge_base, "The product ships on Tuesdays.");
        // Unspecified fields keep the built-in defaults
        assert_eq!(profile.model, DEFAULT_MODEL);
        assert_eq!(profile.system_attachments.len(), 1);
        assert_eq!(profile.system_attachments[0].media_type, "application/pdf");
    }
}
