use anyhow::Result;
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kbchat_api::GeminiClient;
use kbchat_types::BotProfile;

use crate::cli::Cli;

/// Everything a run mode needs, assembled once from CLI flags, environment,
/// and the optional profile file.
pub struct AppContext {
    pub profile: Arc<BotProfile>,
    pub client: Arc<GeminiClient>,
    pub work_dir: PathBuf,
    pub log_enabled: bool,
}

/// Set up application configuration from CLI
pub fn setup_from_cli(cli: &Cli) -> Result<AppContext> {
    let mut profile = match &cli.profile {
        Some(path) => BotProfile::from_toml_file(Path::new(path))?,
        None => BotProfile::default(),
    };

    if let Some(model) = &cli.model {
        profile.model = model.clone();
    }

    // A missing credential is not a startup error: the call site absorbs the
    // resulting provider failure into the fallback reply.
    let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        eprintln!(
            "{} GEMINI_API_KEY is not set - requests will fail with the fallback reply",
            "⚠️".yellow()
        );
    }

    let mut client = GeminiClient::new(api_key, profile.model.clone()).with_verbose(cli.verbose);
    if let Some(url) = &cli.api_url {
        client = client.with_base_url(url);
    }

    Ok(AppContext {
        profile: Arc::new(profile),
        client: Arc::new(client),
        work_dir: env::current_dir()?,
        log_enabled: !cli.no_log,
    })
}
