use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, debug, error, info, warn};

use relay_app::repl::{self, HELP, ReplCommand};
use relay_app::{Command, Interrupts, Session, view};
use relay_core::{ConfigOrigin, RelayConfig, RelayError, logging};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Priority-weighted LLM routing simulator.
#[derive(Debug, Parser)]
#[command(name = "relay", version, about)]
struct Args {
    /// Config file to use instead of ~/.relay/config.json.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for reproducible estimates and simulated runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Answer runs immediately instead of waiting for the estimated latency.
    #[arg(long)]
    no_delay: bool,

    /// Directory for log files (default ~/.relay/logs).
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Also print log output to stderr.
    #[arg(long, short)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<(RelayConfig, PathBuf, ConfigOrigin)> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => RelayConfig::config_path()?,
    };
    let (mut config, origin) = RelayConfig::load_or_create(&path)?;
    if args.no_delay {
        config.simulate_delay = false;
    }
    Ok((config, path, origin))
}

fn log_failure(e: &RelayError) {
    let level = e.category().log_level();
    if level == Level::ERROR {
        error!("Command failed: {e}");
    } else if level == Level::WARN {
        warn!("Command failed: {e}");
    } else {
        debug!("Command failed: {e}");
    }
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

async fn execute(
    session: &Session,
    interrupts: &Interrupts,
    command: ReplCommand,
) -> Result<String, RelayError> {
    let output = match command {
        ReplCommand::Help => HELP.to_string(),
        ReplCommand::Rank => view::render_ranking(&session.route()?, session.catalog()),
        ReplCommand::Weights(weights) => {
            let state = session.dispatch(Command::SetWeights(weights))?;
            view::render_state(&state)
        }
        ReplCommand::Name(name) => {
            let state = session.dispatch(Command::SetProfileName(name))?;
            view::render_state(&state)
        }
        ReplCommand::Model(model) => {
            let state = session.select_model(model)?;
            view::render_state(&state)
        }
        ReplCommand::Tokens(budget) => {
            let state = session.dispatch(Command::SetTokenBudget(budget))?;
            view::render_state(&state)
        }
        ReplCommand::Estimate(prompt) => view::render_plan(&session.plan(&prompt)?),
        ReplCommand::Run(prompt) => {
            let (_run, token) = interrupts.begin_run();
            view::render_record(&session.run_prompt(&prompt, token).await?)
        }
        ReplCommand::History => view::render_history(&session.state().history),
        ReplCommand::Summary => view::render_summary(&session.state().history.summary()),
        ReplCommand::Export(dir) => {
            let path = session.export_settings(dir.as_deref())?;
            format!("Wrote {}", path.display())
        }
        ReplCommand::Import(path) => {
            let state = session.import_settings_file(&path)?;
            view::render_state(&state)
        }
        ReplCommand::Csv => session.state().history.export_csv(),
        ReplCommand::Clear => {
            session.dispatch(Command::ClearHistory)?;
            "History cleared.".into()
        }
        ReplCommand::Notifications => {
            let unread = session.drain_notifications();
            if unread.is_empty() {
                "No new notifications.".into()
            } else {
                unread
                    .iter()
                    .map(view::render_notification)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        ReplCommand::State => view::render_state(&session.state()),
        ReplCommand::Quit => String::new(),
    };
    Ok(output)
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_path, origin) = load_config(&args)?;

    let log_dir = match &args.log_dir {
        Some(dir) => dir.clone(),
        None => RelayConfig::logs_dir()?,
    };
    let _log_guard = logging::init_logging(&log_dir, &config.log_level, args.verbose)
        .context("Failed to initialize logging")?;
    info!("Starting relay v{VERSION}");
    match origin {
        ConfigOrigin::File => info!("Loaded config from {}", config_path.display()),
        ConfigOrigin::CreatedDefault => {
            info!("Created default config at {}", config_path.display())
        }
    }

    let interrupts = Arc::new(Interrupts::new());
    interrupts.listen();

    let session = Session::simulated(config, args.seed);
    println!("relay v{VERSION}. Type 'help' for commands.");
    println!("{}", view::render_state(&session.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupts.quit_requested() => {
                println!();
                break;
            }
        };
        let Some(line) = line else { break };

        match repl::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ReplCommand::Quit)) => break,
            Ok(Some(command)) => match execute(&session, &interrupts, command).await {
                Ok(output) => println!("{output}"),
                Err(e) => {
                    log_failure(&e);
                    eprintln!("{}", e.user_message());
                }
            },
            Err(e) => eprintln!("{}", e.user_message()),
        }
    }

    info!("Session ended");
    Ok(())
}
