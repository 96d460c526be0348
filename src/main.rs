use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use learning_hub_search::content::{ContentLoader, ContentStore, Difficulty};
use learning_hub_search::search::outputs::{
    ErrorOutput, FiltersOutput, SearchOutput, SuggestionsOutput,
};
use learning_hub_search::search::{
    ContentType, FilterUpdate, SearchConfig, SearchFilters, SearchService,
};

#[derive(Parser, Debug)]
#[command(name = "learning-hub-search")]
#[command(about = "Keyword search over learning hub content", long_about = None)]
struct Cli {
    /// Directory containing modules.json and sections/
    #[arg(long, env = "LEARNING_HUB_CONTENT_DIR", default_value = "content")]
    content_dir: PathBuf,

    /// Optional TOML file with search settings
    #[arg(long, env = "LEARNING_HUB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single search and print the results
    Search {
        query: String,

        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,

        /// Restrict results to one module
        #[arg(long = "module")]
        module_id: Option<String>,

        /// Tag filter, may be repeated
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long = "type", value_parser = parse_content_type)]
        content_type: Option<ContentType>,
    },
    /// Suggest titles and tags for a partial query
    Suggest { partial: String },
    /// List the available filter values
    Filters,
    /// Read queries from stdin and print results as they change
    Interactive,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::parse(value).ok_or_else(|| format!("unknown difficulty: {value}"))
}

fn parse_content_type(value: &str) -> Result<ContentType, String> {
    ContentType::parse(value).ok_or_else(|| format!("unknown content type: {value}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{e:?}");
        println!("{}", ErrorOutput::new(format!("{e:#}")).to_json());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };

    let loader = ContentLoader::new(&cli.content_dir);
    let modules = loader
        .load_all()
        .with_context(|| format!("Failed to load content from {}", loader.content_dir().display()))?;
    let store = ContentStore::with_modules(modules);

    match cli.command {
        Command::Search {
            query,
            difficulty,
            module_id,
            tags,
            content_type,
        } => {
            let filters = SearchFilters {
                difficulty,
                module_id,
                tags: (!tags.is_empty()).then_some(tags),
                content_type,
            };
            let results = learning_hub_search::search::execute(
                &query,
                &filters,
                &store.snapshot(),
                &config,
            );
            println!("{}", SearchOutput::new(query, filters, results).to_json());
        }
        Command::Suggest { partial } => {
            let suggestions = learning_hub_search::search::get_suggestions(
                &partial,
                &store.snapshot(),
                config.max_suggestions,
            );
            let output = SuggestionsOutput {
                partial_query: partial,
                suggestions,
            };
            println!("{}", output.to_json());
        }
        Command::Filters => {
            let options = learning_hub_search::search::filter::available_filters(&store.snapshot());
            println!("{}", FiltersOutput { options }.to_json());
        }
        Command::Interactive => interactive(store, config).await?,
    }

    Ok(())
}

/// Drive the reactive service from stdin until end of input
async fn interactive(store: ContentStore, config: SearchConfig) -> Result<()> {
    let service = SearchService::new(store, config);
    let mut results = service.results_stream();
    // The first item is the empty initial list
    results.next().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tracing::info!("Reading queries from stdin, prefix commands with ':'");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                if let Err(e) = apply_line(&service, line.trim()) {
                    println!("{}", ErrorOutput::new(e.to_string()).to_json());
                }
            }
            Some(current) = results.next() => {
                let output = SearchOutput::new(
                    service.query(),
                    service.filters(),
                    current.as_ref().clone(),
                );
                println!("{}", output.to_json());
            }
        }
    }

    Ok(())
}

fn apply_line(service: &SearchService, line: &str) -> Result<()> {
    let Some(command) = line.strip_prefix(':') else {
        service.set_search_query(line);
        return Ok(());
    };

    let (name, value) = command
        .split_once(char::is_whitespace)
        .map(|(name, value)| (name, value.trim()))
        .unwrap_or((command, ""));

    // A filter command without a value clears that filter
    let update = FilterUpdate::default();
    let update = match (name, value.is_empty()) {
        ("clear", _) => {
            service.clear_search_filters();
            return Ok(());
        }
        ("difficulty", true) => update.clear_difficulty(),
        ("difficulty", false) => update.with_difficulty(
            Difficulty::parse(value).with_context(|| format!("Unknown difficulty: {value}"))?,
        ),
        ("module", true) => update.clear_module(),
        ("module", false) => update.with_module(value),
        ("tag", true) => update.clear_tags(),
        ("tag", false) => update.with_tags(value.split(',').map(str::trim)),
        ("type", true) => update.clear_content_type(),
        ("type", false) => update.with_content_type(
            ContentType::parse(value).with_context(|| format!("Unknown content type: {value}"))?,
        ),
        (other, _) => anyhow::bail!("Unknown command: :{other}"),
    };
    service.set_search_filters(update);
    Ok(())
}
