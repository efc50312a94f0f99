//! Chat session orchestration
//!
//! One session owns the conversation log, the pending attachment list, and
//! the handles to the profile and the completion client. A turn is: accept
//! the input, compose the request, await the single in-flight call, record
//! the reply.

use std::sync::Arc;

use kbchat_api::{generate_reply, CompletionClient};
use kbchat_ingest::PendingAttachments;
use kbchat_types::{BotProfile, Message};

use crate::composer::compose;
use crate::conversation::{Conversation, SendOutcome};

/// Result of submitting one line of user input.
#[derive(Debug)]
pub enum Turn {
    /// The turn completed; `reply` is the model message that was appended.
    Replied { reply: Message },
    /// Blank input; nothing happened.
    RejectedEmpty,
    /// A request was already in flight; the input was dropped.
    RejectedBusy,
}

pub struct ChatSession {
    conversation: Conversation,
    pending: PendingAttachments,
    profile: Arc<BotProfile>,
    client: Arc<dyn CompletionClient>,
}

impl ChatSession {
    pub fn new(profile: Arc<BotProfile>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            conversation: Conversation::new(&profile.welcome_message),
            pending: PendingAttachments::new(),
            profile,
            client,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    pub fn attachments(&self) -> &PendingAttachments {
        &self.pending
    }

    pub fn attachments_mut(&mut self) -> &mut PendingAttachments {
        &mut self.pending
    }

    /// Run one full turn. The network call is awaited inline; the
    /// conversation's phase guard guarantees a single outstanding call.
    pub async fn submit(&mut self, text: &str) -> Turn {
        match self.conversation.send(text) {
            SendOutcome::RejectedEmpty => Turn::RejectedEmpty,
            SendOutcome::RejectedBusy => Turn::RejectedBusy,
            SendOutcome::Accepted => {
                let request = compose(&self.profile, text);
                let reply_text = generate_reply(self.client.as_ref(), &request).await;
                let reply = self.conversation.response_arrived(&reply_text).clone();
                Turn::Replied { reply }
            }
        }
    }

    /// Drop the conversation back to the welcome message and discard every
    /// pending attachment (releasing their previews).
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.pending.clear();
    }
}
