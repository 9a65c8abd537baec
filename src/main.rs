//! # qa-finder CLI (`qaf`)
//!
//! ## Usage
//!
//! ```bash
//! qaf --config ./config/qaf.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `qaf load` | Scan the corpus directory and report files and pairs |
//! | `qaf pairs` | Print the extracted question/answer pairs |
//! | `qaf ask "<question>"` | Answer one question |
//! | `qaf serve` | Start the HTTP form server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use qa_finder::{config, corpus, matcher, server};

/// qa-finder — fuzzy question lookup over `.docx` question banks.
///
/// Without a config file the built-in defaults are used: documents named
/// `OSP1.docx` … `OSP12.docx` in `./docs`, threshold 0.5.
#[derive(Parser)]
#[command(name = "qaf", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/qaf.toml")]
    config: PathBuf,

    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the corpus and print how many files and pairs were found.
    Load,

    /// Print extracted question/answer pairs.
    Pairs {
        /// Maximum number of pairs to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Answer a question.
    ///
    /// Prints the stored answer of the closest question, or the
    /// not-found message when nothing is similar enough.
    Ask {
        /// The question text.
        question: String,

        /// Also print the matched question and its score.
        #[arg(long)]
        explain: bool,
    },

    /// Start the HTTP server.
    ///
    /// Loads the corpus once, then binds to `[server].bind`.
    Serve,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("qa_finder={0},qaf={0}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Load => corpus::run_load(&cfg)?,
        Commands::Pairs { limit } => corpus::run_pairs(&cfg, limit)?,
        Commands::Ask { question, explain } => matcher::run_ask(&cfg, &question, explain)?,
        Commands::Serve => server::run_serve(&cfg).await?,
    }

    Ok(())
}
