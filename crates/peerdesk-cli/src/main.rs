mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use peerdesk_shared::config;
use peerdesk_shared::routes::RouteBuilder;

use commands::{emit_result, inspect, journal, simulate, CommandResult};

#[derive(Parser)]
#[command(name = "peerdesk", about = "Peerdesk - notification routing toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw notification payload and print the canonical form
    Normalize {
        /// Raw payload JSON ({"screen": ..., "data": ...})
        json: String,
    },

    /// Print the in-app destination a notification payload routes to
    Route {
        /// Raw payload JSON
        json: String,
    },

    /// Decide whether a notification arriving now would alert the user
    Present {
        /// Raw payload JSON
        json: String,

        /// Receiver ID of the conversation currently on screen
        #[arg(short = 'a', long)]
        active: Option<String>,
    },

    /// Run a JSON-lines event script through the notification pipeline
    Simulate {
        /// Script file (reads stdin if omitted)
        #[arg(short = 's', long)]
        script: Option<PathBuf>,
    },

    /// List recent journal entries (debug)
    List {
        /// Max number of entries to show
        #[arg(long, default_value_t = 20)]
        limit: i64,

        /// Delete all entries instead of listing them
        #[arg(long)]
        clear: bool,
    },

    /// Open config file in editor
    Config,
}

fn main() {
    let cli = Cli::parse();
    let app_config = config::load_config();

    if let Err(e) = logging::init(&config::log_path(), app_config.log.level_filter()) {
        eprintln!("{}", e);
    }
    log::debug!("Config: {:?}", app_config);

    let routes = RouteBuilder::new(&app_config.routes.fallback);

    match cli.command {
        Commands::Normalize { json } => inspect::handle_normalize(&json),
        Commands::Route { json } => inspect::handle_route(&json, &routes),
        Commands::Present { json, active } => inspect::handle_present(&json, active.as_deref()),
        Commands::Simulate { script } => {
            simulate::handle(script.as_deref(), routes, app_config.journal.enabled)
        }
        Commands::List { limit, clear } => {
            let result = if clear {
                journal::run_clear()
            } else {
                journal::run_list(limit)
            };
            if let Err(e) = result {
                emit_result(CommandResult::from_run(Err(e)));
                std::process::exit(1);
            }
        }
        Commands::Config => {
            let config_path = config::ensure_config_file().unwrap_or_else(|e| {
                eprintln!("Failed to create config file: {}", e);
                std::process::exit(1);
            });

            let editor = config::resolve_editor();

            let status = std::process::Command::new("sh")
                .arg("-c")
                .arg(format!("{} \"{}\"", editor, config_path.display()))
                .status()
                .unwrap_or_else(|e| {
                    eprintln!("Failed to launch editor '{}': {}", editor, e);
                    std::process::exit(1);
                });

            if !status.success() {
                std::process::exit(status.code().unwrap_or(1));
            }
        }
    }
}
