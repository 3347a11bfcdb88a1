//! Binary entrypoint for the gmshell CLI.
//!
//! Commands:
//! - `console` - interactive admin console over the configured world
//! - `exec <line>` - dispatch a single command line and exit
//! - `init` - create a starter `config.toml` and a demo `world.json`
//!
//! The binary drives the library's dispatcher with a console actor context;
//! embedding the dispatcher behind real player sessions is the library
//! crate's job (see `gmshell::` docs).

use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use gmshell::config::Config;
use gmshell::gm::commands::register_builtins;
use gmshell::gm::context::CommandSource;
use gmshell::gm::Policy;
use gmshell::world::memory::{InMemoryWorld, WorldSeed};
use gmshell::{CommandRegistry, Dispatcher};

#[derive(Parser)]
#[command(name = "gmshell")]
#[command(about = "Administrative command console for live game servers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive admin console
    Console,
    /// Dispatch one command line and exit non-zero unless it succeeds
    Exec {
        /// The command line, e.g.: gmshell exec pinfo Dorn
        #[arg(required = true, trailing_var_arg = true)]
        line: Vec<String>,
    },
    /// Write a starter config.toml and a demo world.json
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            Config::create_default(&cli.config).await?;
            let seed = serde_json::to_string_pretty(&WorldSeed::demo())
                .context("serializing demo world seed")?;
            tokio::fs::write("world.json", seed)
                .await
                .context("writing world.json")?;
            info!("Wrote {} and world.json", cli.config);
            println!("Created {} and world.json. Point [server].world_seed at the seed file and run `gmshell console`.", cli.config);
            Ok(())
        }
        Commands::Console => {
            let config = load_or_default(&cli.config).await;
            init_logging(&Some(config.clone()), cli.verbose);
            let dispatcher = build_dispatcher(&config).await?;
            run_console(&config, &dispatcher).await
        }
        Commands::Exec { line } => {
            let config = load_or_default(&cli.config).await;
            init_logging(&Some(config.clone()), cli.verbose);
            let dispatcher = build_dispatcher(&config).await?;
            let line = line.join(" ");
            let result = dispatcher.dispatch(CommandSource::Console, &line).await;
            for reply in &result.replies {
                println!("{reply}");
            }
            if !result.succeeded() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn load_or_default(path: &str) -> Config {
    match Config::load(path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not load {path} ({e}); using defaults.");
            Config::default()
        }
    }
}

async fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let world = match &config.server.world_seed {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading world seed {path}"))?;
            let seed: WorldSeed =
                serde_json::from_str(&raw).with_context(|| format!("parsing world seed {path}"))?;
            info!("Loaded world seed from {path}");
            Arc::new(InMemoryWorld::from_seed(&seed))
        }
        None => {
            warn!("No world_seed configured; using the built-in demo world");
            Arc::new(InMemoryWorld::demo())
        }
    };
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry).context("registering built-in commands")?;
    info!("Registered {} commands", registry.len());
    Ok(Dispatcher::new(
        Arc::new(registry),
        world.clone(),
        world,
        Policy::from(&config.security),
    ))
}

async fn run_console(config: &Config, dispatcher: &Dispatcher) -> Result<()> {
    use tokio::io::{AsyncBufReadExt, BufReader};

    println!(
        "[{}] admin console - {} commands registered. Type 'commands' to list them, 'quit' to leave.",
        config.server.name,
        dispatcher.registry().len()
    );
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        print!("gm> ");
        std::io::stdout().flush().ok();
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        let result = dispatcher.dispatch(CommandSource::Console, trimmed).await;
        for reply in &result.replies {
            println!("{reply}");
        }
    }
    println!("Goodbye.");
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level.
    let level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);

    let file = config.as_ref().and_then(|c| c.logging.file.clone());
    match file.and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    }) {
        Some(file) => {
            let sink = std::sync::Mutex::new(file);
            // Foreground runs still get console output; redirected runs
            // (no TTY) write to the file only.
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = sink.lock() {
                    let _ = writeln!(guard, "{line}");
                }
                if is_tty {
                    writeln!(fmt, "{line}")
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
