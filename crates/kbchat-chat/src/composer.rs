//! Prompt composition
//!
//! Pure assembly of the outbound request: one inline-data part per
//! configured system attachment, then a single text part carrying the
//! knowledge base and the user question. Same profile and prompt always
//! yield the same request.

use kbchat_api::{CompletionRequest, InlineData, Part};
use kbchat_types::BotProfile;

/// Strip a `data:...;base64,` prefix if present. Payloads pasted from
/// browser tooling often carry one; the wire format wants raw base64.
fn clean_base64(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    }
}

/// Build the request for one user turn.
///
/// User-selected attachments are deliberately not part of this signature:
/// only the profile's system attachments are ever sent.
pub fn compose(profile: &BotProfile, user_prompt: &str) -> CompletionRequest {
    let mut parts: Vec<Part> = profile
        .system_attachments
        .iter()
        .map(|attachment| Part::InlineData {
            inline_data: InlineData {
                mime_type: attachment.media_type.clone(),
                data: clean_base64(&attachment.base64_payload).to_string(),
            },
        })
        .collect();

    parts.push(Part::Text {
        text: format!(
            "KNOWLEDGE_BASE:\n{}\n\nUSER QUESTION:\n{}",
            profile.knowledge_base, user_prompt
        ),
    });

    CompletionRequest {
        parts,
        system_instruction: profile.system_instruction.clone(),
        temperature: profile.temperature,
    }
}
