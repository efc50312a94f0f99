//! Remote model integration for kbchat
//!
//! This crate owns the wire format of the `generateContent` endpoint, the
//! client that speaks it, and the total reply function that converts every
//! provider failure into user-presentable fallback text.

mod gemini_client;
mod request_logger;

pub use gemini_client::{
    CompletionClient, CompletionRequest, GeminiClient, InlineData, Part, GEMINI_BASE_URL,
};
pub use request_logger::log_request;

use colored::Colorize;

/// Shown when the provider answers but produces no text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "I couldn't generate a response.";

/// Shown when the call fails for any reason: network, auth, malformed
/// response, provider error.
pub const PROVIDER_ERROR_FALLBACK: &str =
    "Something went wrong while reaching the model service. Please try again.";

/// Resolve one conversation turn against the provider.
///
/// Total: never returns an error. Failures are logged for diagnostics and
/// absorbed into the fixed fallback strings, so callers only ever see
/// ordinary reply text.
pub async fn generate_reply(client: &dyn CompletionClient, request: &CompletionRequest) -> String {
    match client.complete(request).await {
        Ok(text) if text.is_empty() => EMPTY_RESPONSE_FALLBACK.to_string(),
        Ok(text) => text,
        Err(err) => {
            eprintln!("{} Model request failed: {:#}", "❌".red(), err);
            PROVIDER_ERROR_FALLBACK.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    struct ScriptedClient {
        reply: Result<String, String>,
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(anyhow::anyhow!("{}", message)),
            }
        }
    }

    fn empty_request() -> CompletionRequest {
        CompletionRequest {
            parts: vec![Part::Text {
                text: "hello".to_string(),
            }],
            system_instruction: "be nice".to_string(),
            temperature: 0.5,
        }
    }

    #[tokio::test]
    async fn test_successful_reply_passes_through() {
        let client = ScriptedClient {
            reply: Ok("It uses a modular design.".to_string()),
        };
        let reply = generate_reply(&client, &empty_request()).await;
        assert_eq!(reply, "It uses a modular design.");
    }

    #[tokio::test]
    async fn test_empty_reply_becomes_placeholder() {
        let client = ScriptedClient {
            reply: Ok(String::new()),
        };
        let reply = generate_reply(&client, &empty_request()).await;
        assert_eq!(reply, EMPTY_RESPONSE_FALLBACK);
    }

    #[tokio::test]
    async fn test_whitespace_reply_is_not_empty() {
        // Mirrors the provider contract: only a truly empty result gets the
        // placeholder.
        let client = ScriptedClient {
            reply: Ok(" ".to_string()),
        };
        let reply = generate_reply(&client, &empty_request()).await;
        assert_eq!(reply, " ");
    }

    #[tokio::test]
    async fn test_failure_becomes_fallback_not_error_text() {
        let client = ScriptedClient {
            reply: Err("connection refused".to_string()),
        };
        let reply = generate_reply(&client, &empty_request()).await;
        assert_eq!(reply, PROVIDER_ERROR_FALLBACK);
        assert!(!reply.contains("connection refused"));
    }
}
