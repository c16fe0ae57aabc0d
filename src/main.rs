use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use futures_util::StreamExt as _;
use gigagate_auth::{AuthKey, TokenCache};
use gigagate_config::Config;
use gigagate_provider::{GigaChatClient, build_client};
use gigagate_types::{ChatRequest, ChatResponse, Message, SamplingParams, StreamEvent};
use std::{io::Write as _, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gigagate", about = "GigaChat client with bearer token caching")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a single prompt and print the reply.
    Chat {
        /// User prompt.
        prompt: String,
        /// Optional system prompt.
        #[arg(long)]
        system: Option<String>,
        /// Model name (default: from config).
        #[arg(short, long)]
        model: Option<String>,
        /// Print the reply as it is generated.
        #[arg(short, long)]
        stream: bool,
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long)]
        max_tokens: Option<u32>,
        #[arg(long)]
        top_p: Option<f32>,
        #[arg(long)]
        repetition_penalty: Option<f32>,
    },
    /// Authenticate and show when the access token expires.
    Token,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("config error")?;
    init_tracing(&config, cli.log_json);
    tracing::debug!(scope = %config.scope, refresh = ?config.refresh, "configuration loaded");

    match cli.command {
        Commands::Chat {
            prompt,
            system,
            model,
            stream,
            temperature,
            max_tokens,
            top_p,
            repetition_penalty,
        } => {
            let mut messages = Vec::with_capacity(2);
            if let Some(system) = system {
                messages.push(Message::system(system));
            }
            messages.push(Message::user(prompt));
            let request = ChatRequest::new(model.unwrap_or_else(|| config.model.clone()), messages)
                .with_stream(stream)
                .with_sampling(SamplingParams {
                    temperature,
                    max_tokens,
                    top_p,
                    repetition_penalty,
                });
            cmd_chat(&config, request).await
        }
        Commands::Token => cmd_token(&config).await,
    }
}

fn init_tracing(config: &Config, force_json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if force_json || config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn cmd_chat(config: &Config, request: ChatRequest) -> Result<()> {
    config.validate()?;
    let key = AuthKey::from_config(config)?;
    let client = GigaChatClient::from_config(config)?;

    match client.send(request, &key).await? {
        ChatResponse::Complete(result) => {
            println!("{}", result.text);
            eprintln!(
                "[finish: {}, prompt tokens: {}, completion tokens: {}]",
                result.finish_reason, result.usage.prompt_tokens, result.usage.completion_tokens
            );
        }
        ChatResponse::Stream(mut events) => {
            let mut stdout = std::io::stdout();
            while let Some(event) = events.next().await {
                match event {
                    StreamEvent::TextDelta { text } => {
                        write!(stdout, "{text}")?;
                        stdout.flush()?;
                    }
                    StreamEvent::UsageUpdate { .. } => {}
                    StreamEvent::Finish { reason, usage } => {
                        writeln!(stdout)?;
                        eprintln!(
                            "[finish: {reason}, prompt tokens: {}, completion tokens: {}]",
                            usage.prompt_tokens, usage.completion_tokens
                        );
                    }
                    StreamEvent::Error { detail } => {
                        writeln!(stdout)?;
                        anyhow::bail!("stream interrupted: {detail}");
                    }
                }
            }
        }
    }
    Ok(())
}

async fn cmd_token(config: &Config) -> Result<()> {
    let key = AuthKey::from_config(config)?;
    let cache = TokenCache::from_config(config, build_client(config)?);
    let credential = cache.get_valid_token(&key).await?;
    println!(
        "token valid until {} (in {}s, scope {})",
        credential.expires_at(),
        credential.remaining().as_secs(),
        cache.scope()
    );
    Ok(())
}
