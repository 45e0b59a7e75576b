//! Orchestrator CLI
//!
//! Loads the provider configuration, initializes the provider manager and
//! runs one orchestration command against it.

#![allow(missing_docs)]

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use llm_orchestrator::config::CONFIG_PATH_ENV;
use llm_orchestrator::utils::{LogFormat, init_tracing};
use llm_orchestrator::{Config, OrchestratorError, ProviderManager, build_info};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "orchestrator", version, about = "LLM provider orchestration")]
struct Cli {
    /// Configuration file; defaults plus environment overrides when omitted
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    log_format: LogFormatArg,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List configured providers and their health
    Providers,
    /// List the live models of every provider
    Models,
    /// Reconcile provider model lists into the registry
    Sync,
    /// Probe one provider/model pair, or every provider
    Probe {
        #[arg(long, requires = "model")]
        provider: Option<String>,
        #[arg(long, requires = "provider")]
        model: Option<String>,
    },
    /// Pick a provider for a model class
    Select {
        #[arg(long)]
        model: String,
        /// Estimated tokens of the request
        #[arg(long, default_value_t = 0)]
        tokens: u64,
    },
    /// Print the effective configuration; API keys are never printed
    Config,
    /// Print build information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing("info", cli.log_format.into());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<OrchestratorError>() {
            // Recoverable failures get a distinct code so scripts can retry
            Some(err) => {
                eprintln!("Error [{}]: {:#}", err.kind(), e);
                if err.is_recoverable() {
                    ExitCode::from(2)
                } else {
                    ExitCode::FAILURE
                }
            }
            None => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => {
            let mut config = Config::from_file(path).await?;
            config.apply_env_overrides()?;
            config.validate()?;
            config
        }
        None => Config::from_env()?,
    };
    debug!(providers = config.providers().len(), "Configuration ready");
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Version = cli.command {
        let info = build_info();
        println!(
            "orchestrator {} ({}, {})",
            info.version, info.git_commit, info.rustc
        );
        return Ok(());
    }

    let config = load_config(cli.config.as_ref())
        .await
        .context("failed to load configuration")?;
    if let Command::Config = cli.command {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let manager = ProviderManager::from_config(config.orchestrator);
    manager
        .initialize()
        .await
        .context("failed to initialize providers")?;

    match cli.command {
        Command::Providers => {
            let statuses = manager.statuses();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else {
                for status in statuses {
                    let health = match (&status.cooldown_reason, status.cooldown_remaining_secs) {
                        (Some(reason), Some(secs)) => format!("cooling down ({}, {}s)", reason, secs),
                        _ => "healthy".to_string(),
                    };
                    println!(
                        "{:<24} {:<12} {:<40} {}",
                        status.id,
                        status.provider_type,
                        status.base_url.unwrap_or_default(),
                        health
                    );
                }
            }
        }
        Command::Models => {
            let models = manager.get_all_models().await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&models)?);
            } else {
                for model in models {
                    let price = if model.is_free() { "free" } else { "" };
                    println!("{:<64} {}", model.qualified_id(), price);
                }
            }
        }
        Command::Sync => {
            let report = manager.sync_models_to_registry().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for (provider, count) in &report.synced {
                    println!("{:<24} {} models", provider, count);
                }
                for provider in &report.failed {
                    println!("{:<24} failed", provider);
                }
                for provider in &report.pruned {
                    println!("{:<24} pruned", provider);
                }
            }
        }
        Command::Probe {
            provider: Some(provider),
            model: Some(model),
        } => {
            let reachable = manager.probe(&provider, &model).await?;
            println!(
                "{}/{}: {}",
                provider,
                model,
                if reachable { "reachable" } else { "unreachable" }
            );
            if !reachable {
                return Err(OrchestratorError::ProbeFailure {
                    provider,
                    model,
                    message: "provider is cooling down".to_string(),
                }
                .into());
            }
        }
        Command::Probe { .. } => {
            let outcomes = manager.probe_all().await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcomes)?);
            } else {
                for (provider, reachable) in outcomes {
                    println!(
                        "{:<24} {}",
                        provider,
                        if reachable { "reachable" } else { "unreachable" }
                    );
                }
            }
        }
        Command::Select { model, tokens } => {
            let selection = manager.select(&model, tokens)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&selection)?);
            } else {
                println!("{}/{}", selection.provider_id, selection.model_id);
            }
        }
        Command::Config | Command::Version => {}
    }

    Ok(())
}
