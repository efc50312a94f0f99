use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

use kbchat_chat::{ChatSession, Turn};
use kbchat_ingest::ingest_files;
use kbchat_types::BotProfile;

use crate::app::setup::AppContext;
use crate::conversation_logger::ConversationLogger;
use crate::render::{render_message, render_suggestions, suggestions_visible};

/// Run interactive REPL mode
pub async fn run_repl_mode(context: AppContext) -> Result<()> {
    let AppContext {
        profile,
        client,
        work_dir,
        log_enabled,
        ..
    } = context;

    println!(
        "{}",
        format!("🤖 {} - knowledge-base chat", profile.bot_name)
            .bright_cyan()
            .bold()
    );
    println!("{}", format!("Model: {}", profile.model).bright_black());
    println!(
        "{}",
        format!("Working directory: {}", work_dir.display()).bright_black()
    );
    println!(
        "{}",
        "Type 'exit' or 'quit' to leave, '/help' for commands\n".bright_black()
    );

    let mut session = ChatSession::new(profile.clone(), client);

    // Initialize logger (async) - logs go into the working directory
    let mut logger = if log_enabled {
        match ConversationLogger::new(&work_dir).await {
            Ok(l) => Some(l),
            Err(e) => {
                eprintln!("Logging disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    // Show and log the welcome message the conversation starts with
    if let Some(welcome) = session.conversation().messages().first() {
        println!("{}\n", render_message(welcome, &profile.bot_name));
    }
    if let Some(logger) = &mut logger {
        if let Some(welcome) = session.conversation().messages().first() {
            logger.log_message(welcome, None).await;
        }
    }

    let mut rl = DefaultEditor::new()?;

    loop {
        let message_count = session.conversation().messages().len();
        if suggestions_visible(message_count, session.conversation().is_loading())
            && !profile.suggested_questions.is_empty()
        {
            println!("{}", render_suggestions(&profile.suggested_questions));
        }

        match rl.readline("❯ ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if line == "exit" || line == "quit" {
                    break;
                }

                if line.starts_with('/') {
                    handle_command(&line, &mut session, &profile, &mut logger).await;
                    continue;
                }

                let text = resolve_input(&line, &profile.suggested_questions, message_count);
                submit_turn(&mut session, &profile, &text, &mut logger).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Input error: {}", err);
                break;
            }
        }
    }

    if let Some(logger) = &mut logger {
        logger.shutdown().await;
    }
    Ok(())
}

/// A bare number picks the matching suggested question while the panel is
/// still offered; anything else is sent as typed.
fn resolve_input(line: &str, questions: &[String], message_count: usize) -> String {
    if suggestions_visible(message_count, false) {
        if let Ok(choice) = line.parse::<usize>() {
            if (1..=questions.len()).contains(&choice) {
                return questions[choice - 1].clone();
            }
        }
    }
    line.to_string()
}

async fn submit_turn(
    session: &mut ChatSession,
    profile: &BotProfile,
    text: &str,
    logger: &mut Option<ConversationLogger>,
) {
    println!("{}", "⏳ Processing...".bright_black());

    match session.submit(text).await {
        Turn::Replied { reply } => {
            if let Some(logger) = logger {
                let messages = session.conversation().messages();
                if messages.len() >= 2 {
                    logger.log_message(&messages[messages.len() - 2], None).await;
                }
                logger.log_message(&reply, Some(&profile.model)).await;
            }
            println!("\n{}\n", render_message(&reply, &profile.bot_name));
        }
        Turn::RejectedEmpty => {}
        Turn::RejectedBusy => {
            println!(
                "{}",
                "A response is still pending; input dropped.".yellow()
            );
        }
    }
}

async fn handle_command(
    line: &str,
    session: &mut ChatSession,
    profile: &BotProfile,
    logger: &mut Option<ConversationLogger>,
) {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");

    match command {
        "/help" => print_help(),
        "/reset" => {
            session.reset();
            if let Some(logger) = logger {
                logger.log("system", "session reset", None).await;
            }
            println!("{}\n", "Session reset.".green());
            if let Some(welcome) = session.conversation().messages().first() {
                println!("{}\n", render_message(welcome, &profile.bot_name));
            }
        }
        "/attach" => {
            let paths: Vec<PathBuf> = parts.map(PathBuf::from).collect();
            if paths.is_empty() {
                println!("{}", "Usage: /attach <path>...".yellow());
                return;
            }

            let report = ingest_files(&paths).await;
            for rejection in &report.rejected {
                println!("{} {}", "⚠️".yellow(), rejection);
            }
            for attachment in &report.attachments {
                let preview_note = match attachment.preview_path() {
                    Some(path) => format!(" (preview: {})", path.display()),
                    None => String::new(),
                };
                println!(
                    "📎 Attached {} [{}]{}",
                    attachment.file_name(),
                    attachment.media_type,
                    preview_note.bright_black()
                );
            }
            session.attachments_mut().extend(report.attachments);
        }
        "/attachments" => {
            if session.attachments().is_empty() {
                println!("{}", "No pending attachments.".bright_black());
            } else {
                for (index, attachment) in session.attachments().iter().enumerate() {
                    println!(
                        "  [{}] {} ({})",
                        index + 1,
                        attachment.file_name(),
                        attachment.media_type
                    );
                }
            }
        }
        "/detach" => match parts.next().and_then(|s| s.parse::<usize>().ok()) {
            Some(index) if index >= 1 => match session.attachments_mut().remove(index - 1) {
                Some(removed) => println!("Removed {}", removed.file_name()),
                None => println!("{}", format!("No attachment at index {}", index).yellow()),
            },
            _ => println!("{}", "Usage: /detach <index>".yellow()),
        },
        _ => println!(
            "{}",
            format!("Unknown command: {} (try /help)", command).yellow()
        ),
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_black());
    println!("{}", "  /reset              start the conversation over".bright_black());
    println!("{}", "  /attach <path>...   attach images or PDFs".bright_black());
    println!("{}", "  /attachments        list pending attachments".bright_black());
    println!("{}", "  /detach <index>     remove a pending attachment".bright_black());
    println!("{}", "  exit | quit         leave".bright_black());
}
