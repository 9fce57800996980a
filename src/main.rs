//! # mdx-timeline CLI (`tml`)
//!
//! The `tml` binary is the command-line face of mdx-timeline. It fetches
//! the content repository configured in `timeline.toml`, merges the four
//! content categories into one timeline, and prints, searches, or inspects
//! the result.
//!
//! ## Usage
//!
//! ```bash
//! tml --config ./timeline.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tml fetch` | Fetch all categories and print the merged timeline |
//! | `tml search "<text>"` | Search fetched items by text, category, and tags |
//! | `tml show <slug>` | Print one item in full, with its neighbors |
//! | `tml sources` | Show the configured source and per-category health |
//!
//! ## Examples
//!
//! ```bash
//! # The three newest items, as JSON
//! tml fetch --json --limit 3
//!
//! # Case-insensitive search, narrowed to one category
//! tml search "clipboard" --category project
//!
//! # Search by tag only
//! tml search "" --tag ai --tag tools
//!
//! # Item detail for a deep link
//! tml show ditto --category project
//! ```

use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

use mdx_timeline::{config, fetch, query, show, sources};

/// mdx-timeline CLI — aggregate `.mdx` content into one queryable timeline.
#[derive(Parser)]
#[command(
    name = "tml",
    about = "Aggregate .mdx content from a repository into one queryable timeline",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Names the content source (GitHub repository or local directory),
    /// the category directories, and fetch limits.
    #[arg(long, global = true, default_value = "./timeline.toml")]
    config: PathBuf,

    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch all categories and print the merged timeline.
    ///
    /// Categories that fail to fetch degrade to a warning; the command
    /// fails only when every category is unavailable.
    Fetch {
        /// Print items as a JSON array instead of the text listing.
        #[arg(long)]
        json: bool,

        /// Keep only the newest N items (the front-page featured slice).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search the timeline.
    ///
    /// Matches the text case-insensitively against each item's title,
    /// description, and tags. An empty text matches everything, which
    /// makes pure category or tag filtering possible.
    Search {
        /// The search text.
        text: String,

        /// Keep items from these categories: project, writing, book, or
        /// link. Repeatable; no flag means every category.
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Keep items carrying at least one of these tags. Repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Print one item in full, with its prev/next neighbors.
    Show {
        /// The item's slug (file name without the `.mdx` extension).
        slug: String,

        /// Resolve the slug within one category instead of the whole
        /// timeline: project, writing, book, or link.
        #[arg(long)]
        category: Option<String>,
    },

    /// Show the configured source and per-category health.
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Fetch { json, limit } => {
            fetch::run_fetch(&cfg, json, limit).await?;
        }
        Commands::Search {
            text,
            categories,
            tags,
        } => {
            query::run_search(&cfg, &text, categories, tags).await?;
        }
        Commands::Show { slug, category } => {
            show::run_show(&cfg, &slug, category).await?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg).await?;
        }
    }

    Ok(())
}
