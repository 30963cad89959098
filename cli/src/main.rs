#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use std::{fmt::Display, process};
use tracing::debug;
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use argus::{
    facet_options, search_archives, summarize_table, Config, DocRow, Elastic, Facet, ResultTable,
    SearchParams, DEFAULT_K, DEFAULT_MAX_HITS, DEFAULT_NUM_CANDIDATES, INDEX_OPTIONS,
};

const SNIPPET_CHARS: usize = 160;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the archive indices this deployment knows about.
    Indices,
    /// Show the filter options available on an index.
    Facets { index: String },
    /// Run a filtered similarity search and print the matching documents.
    Query(SearchArgs),
    /// Run a search, then summarize the matches with the chat model.
    Ask(SearchArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// The question to embed and search with.
    question: String,

    /// Index to search; repeat to search several at once.
    #[arg(long = "index", required = true)]
    indices: Vec<String>,

    /// Category filter; repeat for several. Omit, or pass "Any", to match
    /// all categories.
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Language filter; same rules as --category.
    #[arg(long = "language")]
    languages: Vec<String>,

    /// Country filter; same rules as --category.
    #[arg(long = "country")]
    countries: Vec<String>,

    /// Start of the date range, inclusive (YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// End of the date range, inclusive (YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,

    /// How many nearest neighbours to rank.
    #[arg(long, default_value_t = DEFAULT_K)]
    k: u32,

    /// Candidate pool considered per shard; must be at least k.
    #[arg(long, default_value_t = DEFAULT_NUM_CANDIDATES)]
    num_candidates: u32,

    /// Cap on how many ranked documents come back.
    #[arg(long, default_value_t = DEFAULT_MAX_HITS)]
    max_hits: u32,
}

impl SearchArgs {
    fn into_params(self) -> SearchParams {
        SearchParams {
            indices: self.indices,
            question: self.question,
            categories: self.categories,
            languages: self.languages,
            countries: self.countries,
            start: self.from,
            end: self.to,
            k: self.k,
            num_candidates: self.num_candidates,
            max_hits: self.max_hits,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "cli=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Indices => {
            for index in INDEX_OPTIONS {
                println!("{index}");
            }
        }
        Commands::Facets { index } => {
            let config = load_config();
            let elastic = Elastic::new(&config.elastic).unwrap_or_else(|error| fail(error));
            let options = facet_options(&elastic, &index).await;

            println!("category: {}", options.categories.join(", "));
            println!("language: {}", options.languages.join(", "));
            println!("country: {}", options.countries.join(", "));
        }
        Commands::Query(args) => {
            let config = load_config();
            let params = args.into_params();
            let table = run_search(&config, &params).await;

            print_table(&table);
        }
        Commands::Ask(args) => {
            let config = load_config();
            let params = args.into_params();
            let table = run_search(&config, &params).await;

            print_table(&table);

            if table.is_empty() {
                println!("Nothing to summarize.");
                return;
            }

            match summarize_table(&config, &params.question, &table).await {
                Ok(answer) => println!("\n{answer}"),
                Err(error) => fail(format!("Summarization failed: {error}")),
            }
        }
    }
}

async fn run_search(config: &Config, params: &SearchParams) -> ResultTable {
    debug!(
        "Searching {} across {}",
        params.question,
        params.indices.join(",")
    );

    match search_archives(config, params).await {
        Ok(table) => table,
        Err(error) => fail(error),
    }
}

fn print_table(table: &ResultTable) {
    if table.is_empty() {
        println!("No documents matched.");
        return;
    }

    println!("{} documents:", table.len());
    for row in &table.rows {
        let date = row.date.map_or_else(|| "----------".to_string(), |d| d.to_string());
        println!(
            "{date}  {:>6.3}  [{} / {} / {}]  {}",
            row.score, row.category, row.language, row.country, row.url
        );
        println!("    {}", snippet(row));
    }

    for facet in Facet::ALL {
        print_distribution(facet, &table.distribution(facet));
    }
}

fn print_distribution(facet: Facet, counts: &[(String, u64)]) {
    println!("\nBy {}:", facet.as_str());

    if counts.is_empty() {
        println!("    no data");
        return;
    }

    for (value, count) in counts {
        println!("    {value}: {count}");
    }
}

fn snippet(row: &DocRow) -> String {
    let text = if row.translated_text.is_empty() {
        &row.text
    } else {
        &row.translated_text
    };

    let mut snippet: String = text.chars().take(SNIPPET_CHARS).collect();
    if text.chars().nth(SNIPPET_CHARS).is_some() {
        snippet.push_str("...");
    }

    snippet
}

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(error) => fail(error),
    }
}

fn fail<T: Display>(message: T) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}
