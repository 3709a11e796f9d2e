use abstractor_config::Config;
use abstractor_fetch::{Credentials, HttpConfig, HttpFetcher};
use abstractor_parser::Abstractor;
use clap::{Parser, Subcommand};
use derive_more::{Display, Error};
use exn::ResultExt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Display, Error)]
enum CliError {
    #[display("could not load configuration")]
    Config,
    #[display("could not set up the HTTP client")]
    Fetcher,
    #[display("could not read input")]
    Input,
    #[display("lookup failed")]
    Lookup,
}

type Result<T> = std::result::Result<T, exn::Exn<CliError>>;

/// Summarizes fanfiction links found in chat messages
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Opts {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, short, env = "ABSTRACTOR_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a summary of every supported link in a message
    Summarize {
        /// Message text; read from stdin when omitted
        text: Option<String>,
    },
    /// Print the series member selected by reacting to a series summary
    React {
        /// File holding the series summary that was reacted to
        #[arg(long)]
        message: PathBuf,
        /// Keycap emoji (1️⃣ to 🔟) or a number from 1 to 10
        #[arg(long)]
        reaction: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let opts = Opts::parse();
    match run(opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init();
}

async fn run(opts: Opts) -> Result<()> {
    let config = Config::load(opts.config.as_deref()).or_raise(|| CliError::Config)?;
    debug!(?config, "loaded configuration");
    let abstractor = abstractor(&config)?;
    let cancel = cancel_on_interrupt();
    match opts.command {
        Command::Summarize { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut text = String::new();
                    tokio::io::stdin().read_to_string(&mut text).await.or_raise(|| CliError::Input)?;
                    text
                }
            };
            let summaries = abstractor.summarize(&text, &cancel).await;
            println!("{}", summaries.join("\n\n"));
        }
        Command::React { message, reaction } => {
            let message = tokio::fs::read_to_string(&message).await.or_raise(|| CliError::Input)?;
            match abstractor.react(&message, &reaction, &cancel).await.or_raise(|| CliError::Lookup)? {
                Some(summary) => println!("{summary}"),
                None => info!(reaction, "reaction does not select a series member"),
            }
        }
    }
    Ok(())
}

fn abstractor(config: &Config) -> Result<Abstractor> {
    let http = HttpConfig {
        user_agent: config.user_agent.clone(),
        timeout: config.timeout(),
        credentials: config.ao3_credentials().map(|(username, password)| Credentials::new(username, password)),
    };
    let fetcher = HttpFetcher::new(http).or_raise(|| CliError::Fetcher)?;
    Ok(Abstractor::new(Arc::new(fetcher), config.fichub_api.as_str())
        .with_max_links(config.max_links)
        .with_prefix(config.prefix.as_str()))
}

/// Abandons the current message on Ctrl+C.
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted");
            token.cancel();
        }
    });
    cancel
}
