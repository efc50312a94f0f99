//! kbchat Application Library
//!
//! CLI parsing, configuration assembly, and the REPL/one-shot presentation
//! surfaces over the kbchat conversation engine.

// Re-export workspace crates
pub use kbchat_api as api;
pub use kbchat_chat::{self as chat, ChatSession, Turn};
pub use kbchat_ingest as ingest;
pub use kbchat_types::{self as types, BotProfile, Message, Role};

// Local modules
pub mod app;
pub mod cli;
pub mod conversation_logger;
pub mod render;

// Re-exports from local modules
pub use app::{run_ask_mode, run_repl_mode, setup_from_cli, AppContext};
pub use cli::{Cli, Commands};
pub use conversation_logger::ConversationLogger;
pub use render::{render_markdown, render_message, render_suggestions, suggestions_visible};
