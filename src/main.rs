use anyhow::Result;
use audioscribe::app::run_transcribe_command;
use audioscribe::cli::{Cli, Commands};
use audioscribe::config::Config;
use clap::{CommandFactory, Parser};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "audioscribe",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let Some(path) = cli.path else {
        eprintln!("audioscribe: missing input path");
        eprintln!("Usage: audioscribe <PATH>");
        std::process::exit(2);
    };

    let mut config = load_config(cli.config.as_deref())?;

    // CLI flags win over environment variables and the config file.
    if let Some(endpoint) = cli.endpoint {
        config.service.endpoint = endpoint;
    }
    if let Some(language) = cli.language {
        config.service.language = language;
    }
    if let Some(timeout) = cli.timeout {
        config.service.timeout_secs = timeout;
    }

    run_transcribe_command(
        config,
        &path,
        cli.output.as_deref(),
        cli.fresh,
        cli.quiet,
        cli.verbose,
    )
    .await?;

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/audioscribe/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}
