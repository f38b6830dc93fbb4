//! Rostra CLI binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rostra::config::{DebateConfig, FailurePolicy};
use rostra::react::ToolRunner;
use rostra::scheduler::{DebateRoster, DebateRunner};

/// Run a scripted multi-persona debate against an OpenAI-compatible service.
#[derive(Parser, Debug)]
#[command(name = "rostra", version, about)]
struct Cli {
    /// Debate topic announced in the welcome message.
    #[arg(long, default_value = "Is AI in education a net benefit?")]
    topic: String,

    /// Model identifier (overrides ROSTRA_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Service endpoint (overrides ROSTRA_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Sampling temperature (overrides ROSTRA_TEMPERATURE).
    #[arg(long)]
    temperature: Option<f64>,

    /// Recent-message window injected into each prompt.
    #[arg(long)]
    window_size: Option<usize>,

    /// Full pro/con cycles before the moderator closes.
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Fail the run on generator/tool errors instead of degrading to text.
    #[arg(long)]
    propagate_errors: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> rostra::error::Result<()> {
    let mut config = DebateConfig::from_env()?;
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    if let Some(url) = cli.base_url {
        config = config.with_base_url(url);
    }
    if let Some(t) = cli.temperature {
        config = config.with_temperature(t);
    }
    if let Some(w) = cli.window_size {
        config = config.with_window_size(w);
    }
    if let Some(r) = cli.max_rounds {
        config = config.with_max_rounds(r);
    }
    if cli.propagate_errors {
        config = config.with_failure_policy(FailurePolicy::Propagate);
    }

    let generator = rostra::provider::create_generator(&config)?;
    let tools = ToolRunner::new(&config);
    let mut runner = DebateRunner::new(
        DebateRoster::standard(),
        generator,
        tools,
        config,
        &cli.topic,
    );

    let rule = "-".repeat(78);
    println!("{}", "=".repeat(52));
    println!("Multi-persona debate  |  Topic: {}", cli.topic);
    println!("{}", "=".repeat(52));

    runner
        .run(|msg| {
            println!("\n{}:\n{}\n{rule}", msg.speaker, msg.content);
        })
        .await?;

    println!("Debate finished.");
    Ok(())
}
