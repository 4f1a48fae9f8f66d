//! delve - play the demo adventure on the terminal

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use delve::history::History;
use delve::{demo, Config, GameMode, TransitionContext};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Delve text adventure
#[derive(Parser, Debug)]
#[command(name = "delve", version, about = "Play the Delve demo adventure")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed, overrides config
    #[arg(long)]
    seed: Option<u64>,

    /// Resume from the configured save file at startup
    #[arg(long)]
    load: bool,
}

fn print_unread(history: &mut History) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for entry in history.unread() {
        writeln!(out, "{}", entry.message)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let start_mode = config.start_mode()?;
    let mut game = demo::game().with_config(&config);
    if args.load {
        game.load_game()?;
    } else {
        game.transition_to(start_mode, TransitionContext::default());
    }
    info!("delve started in {} mode", game.mode());

    if game.is_in_state(GameMode::Title) {
        println!("Welcome to Delve. Type 'start' to begin, 'load' to continue, or 'help'.");
    }
    print_unread(game.history_mut())?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        if let Some(reply) = game.process_command(&line) {
            println!("{}", reply);
        }
        game.update();
        print_unread(game.history_mut())?;

        if game.quit_requested() {
            break;
        }
    }

    info!("delve shutdown complete");
    Ok(())
}
