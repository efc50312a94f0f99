use anyhow::Result;

use kbchat_chat::{ChatSession, Turn};

use crate::app::setup::AppContext;
use crate::conversation_logger::ConversationLogger;
use crate::render::render_markdown;

/// Run one-shot ask mode: a single question, a single printed reply.
pub async fn run_ask_mode(context: AppContext, question: String) -> Result<()> {
    if question.trim().is_empty() {
        anyhow::bail!("No question given. Usage: kbchat-cli ask <question>");
    }

    let mut logger = if context.log_enabled {
        match ConversationLogger::new_ask_mode(&context.work_dir).await {
            Ok(l) => Some(l),
            Err(e) => {
                eprintln!("Logging disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mut session = ChatSession::new(context.profile.clone(), context.client.clone());

    if let Turn::Replied { reply } = session.submit(&question).await {
        if let Some(logger) = &mut logger {
            logger.log("user", &question, None).await;
            logger
                .log_message(&reply, Some(&context.profile.model))
                .await;
        }
        println!("{}", render_markdown(&reply.text));
    }

    if let Some(logger) = &mut logger {
        logger.shutdown().await;
    }
    Ok(())
}
