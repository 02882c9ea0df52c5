mod command;
mod config;
mod error;
mod repl;
mod style;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use runtime::{AnthropicBackend, ChatClient, ChatOptions, McpClient, McpToolHost, ToolHost};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use command::CommandSpec;
use config::Config;
use error::{Error, Result};
use repl::Repl;

#[derive(Parser)]
#[command(name = "quickstart")]
#[command(about = "Chat with Claude using the tools of a local MCP server", long_about = None)]
#[command(version)]
struct Cli {
    /// Server script (.py, .js, Cargo project directory or Cargo.toml) and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "SCRIPT")]
    server: Vec<String>,

    /// Path to a config file (default: quickstart.toml, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// Maximum output tokens per response
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Disable colored prompts
    #[arg(long)]
    no_color: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = command::resolve(&cli.server)?;

    let mut config = Config::discover(cli.config.as_deref())?;
    config.apply_env(|name| std::env::var(name).ok());
    if let Some(model) = cli.model {
        config.backend.model = model;
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.backend.max_tokens = max_tokens;
    }
    let api_key = config.api_key()?.to_string();

    let host = start_server(&command).await?;
    for spec in host.specs() {
        println!("Connected to server with tools: {}", spec.name);
    }

    let options = ChatOptions::new(&config.backend.model)
        .with_max_output_tokens(config.backend.max_tokens)
        .with_tools(host.specs().to_vec());

    let mut backend = AnthropicBackend::builder(api_key);
    if let Some(base_url) = &config.backend.base_url {
        backend = backend.base_url(base_url);
    }
    let chat = ChatClient::new(backend.build(), host);

    let stdin = io::stdin();
    let mut repl = Repl::new(stdin.lock(), io::stdout(), style::color_enabled(cli.no_color));
    let outcome = repl.run(&chat, &options).await;

    if let Err(e) = chat.into_tools().shutdown().await {
        warn!(error = %e, "MCP server did not shut down cleanly");
    }

    let queries = outcome?;
    info!(queries, "session ended");
    Ok(())
}

/// Spawn the server and fetch its tool catalog.
async fn start_server(command: &CommandSpec) -> Result<McpToolHost> {
    info!(program = %command.program, args = ?command.args, "starting MCP server");
    let client = McpClient::spawn(&command.program, &command.args)
        .await
        .map_err(|e| Error::Spawn {
            program: command.program.clone(),
            reason: e.to_string(),
        })?;

    McpToolHost::connect(client)
        .await
        .map_err(|e| Error::CatalogFetch(e.to_string()))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
