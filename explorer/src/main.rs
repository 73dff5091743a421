use anyhow::Result;
use clap::{Parser, Subcommand};
use newsscope_core::search::ALL_CATEGORIES;
use newsscope_core::{CategoryFilter, Explorer, ExplorerConfig, SearchOutcome, TopicOutcome};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

const SNIPPET_CHARS: usize = 200;

#[derive(Parser)]
#[command(name = "explorer")]
#[command(about = "Search a news dataset and list the topics found in the matches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter articles by query and category, then model topics over the matches
    Search {
        /// Dataset CSV path
        #[arg(long)]
        dataset: PathBuf,
        /// Case-insensitive substring to look for in headlines and content
        #[arg(long, default_value = "")]
        query: String,
        /// Exact category, or "All"
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
        /// JSON settings file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        topics: Option<usize>,
        #[arg(long)]
        passes: Option<usize>,
        #[arg(long)]
        top_terms: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Print at most this many articles
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the category values available for filtering
    Categories {
        #[arg(long)]
        dataset: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { dataset, query, category, config, topics, passes, top_terms, seed, limit } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(n) = topics { config.num_topics = n; }
            if let Some(n) = passes { config.passes = n; }
            if let Some(n) = top_terms { config.top_terms = n; }
            if seed.is_some() { config.seed = seed; }
            let explorer = Explorer::open(&dataset, config)?;
            let outcome = explorer.search(&query, &CategoryFilter::parse(&category))?;
            print_outcome(&outcome, limit);
            Ok(())
        }
        Commands::Categories { dataset } => {
            let explorer = Explorer::open(&dataset, ExplorerConfig::default())?;
            println!("{ALL_CATEGORIES}");
            for c in explorer.categories()? {
                println!("{c}");
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ExplorerConfig> {
    match path {
        Some(p) => ExplorerConfig::from_json_file(p),
        None => Ok(ExplorerConfig::default()),
    }
}

fn print_outcome(outcome: &SearchOutcome, limit: Option<usize>) {
    println!("Search Results ({})", outcome.len());
    if outcome.is_empty() {
        println!("No articles found matching your search and category filter. Try different keywords or choose another category.");
    }
    for a in outcome.articles().take(limit.unwrap_or(usize::MAX)) {
        println!();
        println!("{}", a.headline);
        println!("  {}", a.url);
        let snippet: String = a.content.chars().take(SNIPPET_CHARS).collect();
        println!("  {snippet}");
    }

    println!();
    println!("Topics discovered in the filtered articles");
    match &outcome.topics {
        TopicOutcome::Topics(topics) => {
            for t in topics {
                println!("{t}");
            }
        }
        TopicOutcome::NoResults | TopicOutcome::NoContent => println!("No content available for topic modeling."),
    }
}
