mod commands;
mod gateway;

use clap::{Parser, Subcommand};
use polyglot_channels::console::ConsoleHost;
use polyglot_core::{
    config::{self, GeneralConfig},
    language::Language,
    sanitize::{sanitize, strip_colors},
};
use polyglot_providers::build_translator;
use std::path::Path;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "polyglot",
    version,
    about = "Polyglot: in-game chat translation for server admin bots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start translating chat read from the console.
    Start,
    /// Show resolved settings and provider readiness.
    Status,
    /// Translate once using the `!translate` argument syntax.
    Translate {
        /// `[<source>*<target>] <message>`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List supported language codes.
    Languages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Logging settings come from the file, so read it before anything logs.
    let table = config::read_table(&cli.config)?;
    let _log_guard = init_tracing(&config::general_section(&table))?;
    let cfg = config::Config::from_table(&table);

    match cli.command {
        Commands::Start => {
            let translator = build_translator(&cfg.settings)?;
            let host = Arc::new(ConsoleHost::new(cfg.console.command_prefixes.clone()));

            println!("Polyglot: starting translator...");
            let gw = Arc::new(gateway::Gateway::new(translator, host, cfg.settings));
            gw.run().await?;
        }
        Commands::Status => {
            let s = &cfg.settings;
            println!("Polyglot: status check\n");
            println!("Config: {}", cli.config);
            println!("Provider: {}", s.provider);
            println!("Dispatch: {}", s.dispatch);
            println!("Auto-translate: {}", s.effective_auto_translate());
            println!("Default source: {}", s.default_source);
            println!(
                "Default target: {} ({})",
                s.default_target,
                s.default_target.name()
            );
            println!("Minimum sentence length: {}", s.min_sentence_length);
            if s.rate_limited() {
                println!("Minimum time between: {}s", s.min_time_between.as_secs());
            } else {
                println!("Minimum time between: disabled");
            }
            println!(
                "Command prefixes: {}",
                cfg.console.command_prefixes.iter().collect::<String>()
            );
            println!();
            match build_translator(s) {
                Ok(t) => println!("  {}: ready", t.name()),
                Err(e) => println!("  {}: {e}", s.provider),
            }
        }
        Commands::Translate { args } => {
            let args = args.join(" ");
            let s = &cfg.settings;
            let request = commands::parse_translate(&args, s.default_source, s.default_target)
                .map_err(|e| anyhow::anyhow!("{}", strip_colors(&e.reply("translate"))))?;
            let translator = build_translator(s)?;
            let raw = translator
                .translate(&request.message, request.source, request.target)
                .await?;
            let text = sanitize(&raw);
            if text.is_empty() {
                anyhow::bail!("{}", strip_colors(commands::UNABLE_TO_TRANSLATE));
            }
            println!("{text}");
        }
        Commands::Languages => {
            for lang in Language::all() {
                println!("{:<4}{}", lang.code(), lang.name());
            }
        }
    }

    Ok(())
}

/// Log to stderr, and to `log_file` as well when configured.
/// `RUST_LOG` takes precedence over `log_level`.
fn init_tracing(general: &GeneralConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&general.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter).with(stderr);

    let Some(log_file) = &general.log_file else {
        registry.init();
        return Ok(None);
    };

    let path = Path::new(log_file);
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log_file has no file name: {log_file}"))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    registry
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}
