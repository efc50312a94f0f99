use anyhow::Result;
use clap::{CommandFactory, Parser};

use kbchat::{run_ask_mode, run_repl_mode, setup_from_cli, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(*shell, &mut command, name, &mut std::io::stdout());
        return Ok(());
    }

    let context = setup_from_cli(&cli)?;

    if let Some(Commands::Ask { question }) = &cli.command {
        return run_ask_mode(context, question.join(" ")).await;
    }

    run_repl_mode(context).await
}
