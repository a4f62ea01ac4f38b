//! topolens CLI
//!
//! Parses a stream topology description and prints it in various forms.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod commands;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "topolens")]
#[command(about = "topolens - inspect stream topology descriptions", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print node, edge and sub-topology counts
    Summary {
        /// Description file, or - for stdin
        input: PathBuf,
    },
    /// Print the parsed graph as JSON
    Json {
        /// Description file, or - for stdin
        input: PathBuf,
    },
    /// Print a PlantUML diagram
    Plantuml {
        /// Description file, or - for stdin
        input: PathBuf,
        /// Lay out left to right
        #[arg(long)]
        horizontal: bool,
        /// Disable orthogonal edges
        #[arg(long)]
        no_ortho: bool,
        /// Do not group topics in a package
        #[arg(long)]
        no_group_topics: bool,
        /// Do not group stores in a package
        #[arg(long)]
        no_group_stores: bool,
        /// Diagram title
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Show one node and its neighbours
    Lookup {
        /// Description file, or - for stdin
        input: PathBuf,
        /// Node identifier
        id: String,
    },
    /// Validate a description
    Check {
        /// Description file, or - for stdin
        input: PathBuf,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let output = match cli.command {
        Commands::Summary { input } => commands::summary(&commands::load(&input)?),
        Commands::Json { input } => commands::json(&commands::load(&input)?)?,
        Commands::Plantuml {
            input,
            horizontal,
            no_ortho,
            no_group_topics,
            no_group_stores,
            title,
        } => {
            let graph = commands::load(&input)?;
            let overrides = commands::RenderOverrides {
                horizontal,
                no_ortho,
                no_group_topics,
                no_group_stores,
                title: title.or_else(|| commands::default_title(&input)),
            };
            commands::plantuml(&graph, &overrides)
        }
        Commands::Lookup { input, id } => commands::lookup(&commands::load(&input)?, &id)?,
        Commands::Check { input } => commands::check(&commands::load(&input)?),
    };

    print!("{}", output);
    Ok(())
}
