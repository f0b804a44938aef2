//! partsbin CLI - inventory of physical parts
//!
//! Provides `partsbin list`, `partsbin add`, `partsbin backup` and friends.

mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use partsbin_core::{Area, DataLayout, Inventory};
use std::path::PathBuf;

use commands::detail::{DetailChanges, NewDetail};

#[derive(Parser)]
#[command(name = "partsbin")]
#[command(about = "partsbin - inventory of parts with area and photo")]
#[command(version)]
struct Cli {
    /// Directory holding details.db and images/
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Log info messages and echo them on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List details, optionally filtered by name
    List {
        /// Show only names containing this text (case-insensitive)
        #[arg(value_name = "FILTER", default_value = "")]
        filter: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one detail
    Show {
        /// Detail ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a detail
    Add {
        /// Detail name
        #[arg(short, long)]
        name: String,
        /// Surface area in dm² (e.g. 12.50 or 12,5)
        #[arg(short, long)]
        area: Area,
        /// Photo to copy into the images folder (png, jpg, jpeg)
        #[arg(short, long)]
        image: PathBuf,
        /// Optional notes
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Edit a detail; omitted fields keep their value
    Edit {
        /// Detail ID
        id: i64,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New surface area in dm²
        #[arg(short, long)]
        area: Option<Area>,
        /// New photo
        #[arg(short, long)]
        image: Option<PathBuf>,
        /// New notes (empty to clear)
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a detail and its photo
    Delete {
        /// Detail ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Back up the database and photos into a zip archive
    Backup {
        /// Directory to write backup_<timestamp>.zip into
        destination: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let layout = DataLayout::new(cli.data_dir);
    logging::init(layout.logs_dir(), cli.verbose);

    if let Err(e) = run(cli.command, layout) {
        log::error!("{e:#}");
        log::logger().flush();
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands, layout: DataLayout) -> Result<()> {
    let root = layout.root().display().to_string();
    let inventory =
        Inventory::open(layout).with_context(|| format!("Could not open data directory {root}"))?;

    match command {
        Commands::List { filter, json } => commands::detail::list(&inventory, &filter, json),
        Commands::Show { id, json } => commands::detail::show(&inventory, id, json),
        Commands::Add {
            name,
            area,
            image,
            description,
        } => commands::detail::add(
            &inventory,
            NewDetail {
                name,
                description,
                area,
                image,
            },
        ),
        Commands::Edit {
            id,
            name,
            area,
            image,
            description,
        } => commands::detail::edit(
            &inventory,
            id,
            DetailChanges {
                name,
                description,
                area,
                image,
            },
        ),
        Commands::Delete { id, force } => commands::detail::delete(&inventory, id, force),
        Commands::Backup { destination } => commands::backup::run(&inventory, &destination),
    }
}
