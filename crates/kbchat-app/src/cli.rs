use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// CLI arguments for kbchat
#[derive(Parser)]
#[command(name = "kbchat")]
#[command(about = "kbchat - knowledge-base-grounded chat assistant")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a TOML bot profile (system instruction, knowledge base,
    /// welcome message, suggested questions, system attachments).
    /// Built-in defaults are used when omitted
    #[arg(long, value_name = "PATH")]
    pub profile: Option<String>,

    /// Override the model name from the profile
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL of the generateContent endpoint (e.g. a local proxy)
    #[arg(long, value_name = "URL", env = "KBCHAT_API_URL")]
    pub api_url: Option<String>,

    /// Enable verbose debug output (dumps outgoing HTTP requests)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable the JSONL conversation log under logs/
    #[arg(long)]
    pub no_log: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question and print the reply
    Ask {
        /// The question text
        question: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
