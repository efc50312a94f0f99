//! Conversation state machine
//!
//! An explicit two-phase state machine over an append-only message log.
//! Transitions return what happened so they can be unit-tested without any
//! rendering or network environment.

use kbchat_types::Message;

/// Where the conversation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingResponse,
}

/// What `send` did with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// User message appended; a response is now awaited.
    Accepted,
    /// Blank or whitespace-only input; nothing changed.
    RejectedEmpty,
    /// A request is already in flight; nothing changed.
    RejectedBusy,
}

/// The ordered message log plus the loading phase.
///
/// At most one request is pending at a time: `send` refuses new input while
/// `AwaitingResponse`. There is no error state; failed calls arrive here as
/// ordinary model messages carrying fallback text.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    phase: Phase,
}

impl Conversation {
    /// Start a conversation containing only the synthetic welcome message.
    pub fn new(welcome_text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::welcome(welcome_text)],
            phase: Phase::Idle,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::AwaitingResponse
    }

    /// Accept a user turn, if there is one to accept.
    pub fn send(&mut self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::RejectedEmpty;
        }
        if self.phase == Phase::AwaitingResponse {
            return SendOutcome::RejectedBusy;
        }

        self.messages.push(Message::user(text));
        self.phase = Phase::AwaitingResponse;
        SendOutcome::Accepted
    }

    /// Record the model's reply and return to idle.
    ///
    /// Accepted in any phase: a reply that lands after a reset is still
    /// appended to the (truncated) log, matching the absence of any
    /// cancellation path.
    pub fn response_arrived(&mut self, text: &str) -> &Message {
        self.messages.push(Message::model(text));
        self.phase = Phase::Idle;
        self.messages.last().expect("log is never empty")
    }

    /// Truncate the log back to the original welcome message. The phase is
    /// left alone; an in-flight reply still resolves through
    /// `response_arrived`.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbchat_types::{Role, WELCOME_MESSAGE_ID};

    fn conversation() -> Conversation {
        Conversation::new("welcome")
    }

    #[test]
    fn test_starts_with_single_welcome_message() {
        let conversation = conversation();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].id, WELCOME_MESSAGE_ID);
        assert_eq!(conversation.phase(), Phase::Idle);
        assert!(!conversation.is_loading());
    }

    #[test]
    fn test_send_appends_user_message_and_awaits() {
        let mut conversation = conversation();
        let outcome = conversation.send("What is the architecture?");
        assert_eq!(outcome, SendOutcome::Accepted);
        assert_eq!(conversation.messages().len(), 2);

        let last = conversation.messages().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.text, "What is the architecture?");
        assert!(conversation.is_loading());
    }

    #[test]
    fn test_blank_input_is_a_no_op() {
        let mut conversation = conversation();
        assert_eq!(conversation.send(""), SendOutcome::RejectedEmpty);
        assert_eq!(conversation.send("   \n\t"), SendOutcome::RejectedEmpty);
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.phase(), Phase::Idle);
    }

    #[test]
    fn test_send_while_awaiting_is_a_no_op() {
        let mut conversation = conversation();
        conversation.send("first");
        assert_eq!(conversation.send("second"), SendOutcome::RejectedBusy);
        assert_eq!(conversation.messages().len(), 2);
        assert!(conversation.is_loading());
    }

    #[test]
    fn test_response_returns_to_idle() {
        let mut conversation = conversation();
        conversation.send("What is the architecture?");
        let reply = conversation.response_arrived("It uses a modular design.");
        assert_eq!(reply.role, Role::Model);
        assert_eq!(reply.text, "It uses a modular design.");

        assert_eq!(conversation.messages().len(), 3);
        assert!(!conversation.is_loading());
    }

    #[test]
    fn test_reply_id_distinct_from_user_message_id() {
        let mut conversation = conversation();
        conversation.send("hi");
        conversation.response_arrived("hello");

        let user_id = &conversation.messages()[1].id;
        let model_id = &conversation.messages()[2].id;
        assert_ne!(user_id, model_id);
    }

    #[test]
    fn test_reset_keeps_only_the_welcome_message() {
        let mut conversation = conversation();
        conversation.send("one");
        conversation.response_arrived("two");
        conversation.send("three");
        conversation.response_arrived("four");

        conversation.reset();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].id, WELCOME_MESSAGE_ID);
    }

    #[test]
    fn test_late_reply_lands_in_truncated_log() {
        // Reset does not cancel an in-flight request; the reply is still
        // appended when it arrives.
        let mut conversation = conversation();
        conversation.send("question");
        conversation.reset();
        assert!(conversation.is_loading());

        conversation.response_arrived("late reply");
        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(conversation.messages()[1].text, "late reply");
        assert!(!conversation.is_loading());
    }
}
