// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plaint - complaint intake queue processor.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;
mod shutdown;
mod status;
mod wiring;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Plaint - complaint intake queue processor.
#[derive(Parser, Debug)]
#[command(name = "plaint", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scheduler and HTTP gateway until interrupted.
    Serve,
    /// Run a single processing cycle and print the outcome.
    Process,
    /// Show scheduler state and queue depths.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Push a submission from a JSON file onto the intake queue.
    Enqueue {
        /// Path to the submission JSON.
        file: PathBuf,
    },
    /// Manage the category catalog.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryAction {
    /// Add a category and print its id.
    Add {
        name: String,
        /// Department complaints in this category are routed to.
        #[arg(long)]
        department: Option<String>,
    },
    /// List all categories.
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => plaint_config::load_and_validate_path(path),
        None => plaint_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            plaint_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Process) => commands::run_process(&config).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::Enqueue { file }) => commands::run_enqueue(&config, &file).await,
        Some(Commands::Category { action }) => match action {
            CategoryAction::Add { name, department } => {
                commands::run_category_add(&config, &name, department.as_deref()).await
            }
            CategoryAction::List => commands::run_category_list(&config).await,
        },
        None => {
            println!("plaint: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
