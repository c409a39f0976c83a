//! petfood-filter: search and rank pet food catalogs.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use petfood_cli::exit_codes;
use petfood_cli::output::{self, format_count, Status};
use petfood_search::{
    evaluate_protein_purity, parse_query, rank_catalog, Lexicon, ProductRecord, RankOptions,
};
use petfood_telemetry::{timed_span, TelemetryConfig, Timer};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "petfood-filter")]
#[command(about = "Synonym-aware search over pet food catalogs")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LexiconArg {
    /// TOML lexicon overriding the built-in vocabulary
    #[arg(long, env = "PETFOOD_LEXICON")]
    lexicon: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a catalog against a query
    Search {
        /// Query terms, `-term` to exclude
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        query: Vec<String>,
        /// Catalog JSON file
        #[arg(long, env = "PETFOOD_CATALOG")]
        catalog: PathBuf,
        #[command(flatten)]
        lexicon: LexiconArg,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Also list hidden products
        #[arg(long)]
        all: bool,
    },
    /// Show how a query is parsed
    Parse {
        /// Query terms, `-term` to exclude
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        query: Vec<String>,
        #[command(flatten)]
        lexicon: LexiconArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify protein purity of sources or of every catalog product
    Purity {
        /// Protein source names
        #[arg(required_unless_present = "catalog")]
        sources: Vec<String>,
        /// Catalog JSON file
        #[arg(long, conflicts_with = "sources")]
        catalog: Option<PathBuf>,
        #[command(flatten)]
        lexicon: LexiconArg,
    },
    /// Print the effective lexicon as TOML
    Lexicon {
        #[command(flatten)]
        lexicon: LexiconArg,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = petfood_telemetry::init_with_config(config) {
        Status::warning(&format!("Logging disabled: {}", e));
    }

    let result = run(cli.command);
    if let Err(e) = &result {
        tracing::debug!(error = ?e, "Command failed");
    }

    std::process::exit(exit_codes::from_result(result));
}

fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Search {
            query,
            catalog,
            lexicon,
            limit,
            json,
            all,
        } => run_search(&query.join(" "), &catalog, &lexicon, limit, json, all),
        Commands::Parse {
            query,
            lexicon,
            json,
        } => run_parse(&query.join(" "), &lexicon, json),
        Commands::Purity {
            sources,
            catalog,
            lexicon,
        } => run_purity(&sources, catalog.as_deref(), &lexicon),
        Commands::Lexicon { lexicon } => {
            print!("{}", lexicon.resolve()?.to_toml_string()?);
            Ok(exit_codes::SUCCESS)
        }
    }
}

impl LexiconArg {
    fn resolve(&self) -> Result<Lexicon> {
        match &self.lexicon {
            Some(path) => Lexicon::load(path)
                .with_context(|| format!("Failed to load lexicon {}", path.display())),
            None => Ok(Lexicon::builtin().clone()),
        }
    }
}

fn load_catalog(path: &Path) -> Result<Vec<ProductRecord>> {
    let timer = Timer::start("load_catalog");
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let products = ProductRecord::from_json_catalog(&source)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        products = products.len(),
        "Catalog loaded"
    );
    timer.stop();
    Ok(products)
}

fn run_search(
    query: &str,
    catalog: &Path,
    lexicon: &LexiconArg,
    limit: Option<usize>,
    json: bool,
    all: bool,
) -> Result<i32> {
    let lexicon = lexicon.resolve()?;
    let products = load_catalog(catalog)?;

    timed_span!("rank_catalog");
    let options = RankOptions {
        max_results: limit,
        include_hidden: all,
    };
    let outcome = rank_catalog(&products, query, &lexicon, &options);
    let shown = outcome.results.iter().filter(|r| r.result.show).count();
    tracing::info!(
        query,
        total = outcome.total,
        shown,
        active = outcome.active,
        "Ranking complete"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        if outcome.active {
            Status::header(&format!("Results for {}", output::format_labels(&outcome.labels)));
        } else {
            Status::header("All products");
        }
        for ranked in &outcome.results {
            println!("{}", output::match_row(ranked));
            if outcome.active {
                println!(
                    "      {}",
                    format!(
                        "score {}  groups {}/{}",
                        ranked.result.sort_score,
                        ranked.result.matched_groups,
                        ranked.result.needed_groups
                    )
                    .dimmed()
                );
            }
        }
        println!();
        Status::info(&format!(
            "{} of {}",
            format_count(shown, "match", "matches"),
            format_count(outcome.total, "product", "products")
        ));
    }

    Ok(if shown == 0 {
        exit_codes::NO_MATCHES
    } else {
        exit_codes::SUCCESS
    })
}

fn run_parse(query: &str, lexicon: &LexiconArg, json: bool) -> Result<i32> {
    let lexicon = lexicon.resolve()?;
    let parsed = parse_query(query, &lexicon);

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(exit_codes::SUCCESS);
    }

    Status::header("Include groups");
    if parsed.include_groups.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (i, group) in parsed.include_groups.iter().enumerate() {
        let tokens: Vec<&str> = group.iter().map(String::as_str).collect();
        println!("  {} {}", format!("{}.", i + 1).dimmed(), tokens.join(" | "));
    }

    Status::header("Excludes");
    if parsed.excludes.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for token in &parsed.excludes {
        println!("  {}", token.red());
    }

    println!();
    Status::info(&format!("Labels: {}", output::format_labels(&parsed.labels())));
    Ok(exit_codes::SUCCESS)
}

fn run_purity(sources: &[String], catalog: Option<&Path>, lexicon: &LexiconArg) -> Result<i32> {
    let lexicon = lexicon.resolve()?;

    match catalog {
        Some(path) => {
            let products = load_catalog(path)?;
            for product in &products {
                let purity = evaluate_protein_purity(&product.protein_sources, &lexicon);
                println!("{}  {}", output::tier_badge_padded(&purity, 12), product.name);
            }
            Status::success(&format_count(products.len(), "product", "products"));
        }
        None => {
            let purity = evaluate_protein_purity(sources, &lexicon);
            println!("{}", output::tier_badge(&purity));
        }
    }

    Ok(exit_codes::SUCCESS)
}
