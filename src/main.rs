use clap::Parser;
use colored::*;
use std::io::{self, Write};
use std::process;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use toolchat::cli::Args;
use toolchat::config::{Config, FileConfig};
use toolchat::orchestrator::Orchestrator;
use toolchat::ui::{display_assistant, display_banner, display_error, display_notice, ConsoleObserver};

const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "bye"];
const RESET_COMMAND: &str = "/reset";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if args.config_init {
        process::exit(init_config());
    }

    // Startup errors are fatal: no turn runs without a usable config
    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            display_error(&e);
            process::exit(1);
        }
    };

    init_tracing(config.verbose);

    let mut orchestrator = match Orchestrator::from_config(&config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            display_error(&e);
            process::exit(1);
        }
    };
    let mut observer = ConsoleObserver::new(config.verbose);

    if !args.prompt.is_empty() {
        let prompt = args.prompt.join(" ");
        let code = match orchestrator.run_turn(&prompt, &mut observer).await {
            Ok(outcome) => {
                display_assistant(&outcome.reply);
                0
            }
            Err(e) => {
                display_error(&e);
                1
            }
        };
        process::exit(code);
    }

    if let Err(e) = chat_loop(&mut orchestrator, &mut observer).await {
        display_error(&e);
        process::exit(1);
    }
}

async fn chat_loop(orchestrator: &mut Orchestrator, observer: &mut ConsoleObserver) -> io::Result<()> {
    display_banner(&orchestrator.registry().names());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", "You: ".bold());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();

        if EXIT_KEYWORDS.contains(&input.to_lowercase().as_str()) {
            display_notice("Goodbye! Have a great day!");
            break;
        }

        if input.is_empty() {
            display_notice("Please enter a message.");
            continue;
        }

        if input.eq_ignore_ascii_case(RESET_COMMAND) {
            orchestrator.reset();
            display_notice("Conversation cleared.");
            continue;
        }

        // One turn at a time: input is not read again until this completes
        match orchestrator.run_turn(input, observer).await {
            Ok(outcome) => display_assistant(&outcome.reply),
            Err(e) => {
                display_error(&e);
                eprintln!("{}", "Please try again.".dimmed());
            }
        }
    }

    Ok(())
}

fn init_config() -> i32 {
    let Some(path) = FileConfig::global_config_path() else {
        display_error(&"could not determine the home directory");
        return 1;
    };

    match FileConfig::write_sample(&path) {
        Ok(()) => {
            println!("{}", format!("Config written to {}", path.display()).green());
            0
        }
        Err(e) => {
            display_error(&e);
            1
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "toolchat=debug" } else { "toolchat=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
