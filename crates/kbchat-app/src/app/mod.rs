//! Application modes: configuration setup, interactive REPL, one-shot ask.

pub mod ask;
pub mod repl;
pub mod setup;

pub use ask::run_ask_mode;
pub use repl::run_repl_mode;
pub use setup::{setup_from_cli, AppContext};
