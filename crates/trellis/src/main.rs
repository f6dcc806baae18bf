//! Trellis CLI - CMS page tree tooling.
//!
//! Provides commands for:
//! - `tree`: Print the page tree of a site
//! - `fix`: Re-derive slugs and urls of every page
//! - `add`: Create a page from configured defaults
//! - `render`: Preview the blocks of a page

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, FixArgs, RenderArgs, TreeArgs};
use output::Output;

/// Trellis - CMS page tree tooling.
#[derive(Parser)]
#[command(name = "trellis", version, about)]
struct Cli {
    /// Enable verbose output (show store and url derivation logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the page tree of a site.
    Tree(TreeArgs),
    /// Re-derive slugs and urls of every page of a site.
    Fix(FixArgs),
    /// Create a page and save it below its parent.
    Add(AddArgs),
    /// Render the blocks of the page served at a url.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Tree(args) => args.execute(&output),
        Commands::Fix(args) => args.execute(&output),
        Commands::Add(args) => args.execute(&output),
        Commands::Render(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
