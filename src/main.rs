// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Dispatch to the appropriate subcommand handler
// 3. Print a human-readable summary
// 4. Exit with proper code (0 = success, 1 = failing links found, 2 = error)
//
// Diagnostics go to stderr through `tracing`; results go to stdout.
// =============================================================================

mod checker; // src/checker/ - sampling link verifier
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated, immutable settings
mod crawl; // src/crawl/ - paginated content API crawler
mod report; // src/report/ - classification and CSV report
mod spaces; // src/spaces.rs - archived space discovery

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use checker::VerificationSummary;
use cli::{Cli, Commands, ScanArgs, VerifyArgs};
use config::{CrawlConfig, ScanConfig, VerifyConfig};
use crawl::{CrawlError, ErrorKind, PageCrawler};
use report::{Classifier, PageCountIndex};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins over --verbose when set
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = success (or nothing to do)
//   Ok(1) = verification found failing links
//   Err = fatal error, mapped to exit code 2
async fn run(cli: Cli) -> Result<i32> {
    debug!(?cli, "CLI arguments parsed");

    match cli.command {
        Commands::Scan(args) => handle_scan(args).await,
        Commands::Verify(args) => handle_verify(args).await,
        Commands::ArchivedSpaces { file } => handle_archived_spaces(&file),
    }
}

// Crawl -> classify -> write
async fn handle_scan(args: ScanArgs) -> Result<i32> {
    let config = ScanConfig::from_args(args)?;
    println!("--- Public Page Finder ---");
    println!("🔍 Scanning: {}", config.crawl.start_url());

    let crawler = PageCrawler::new(config.crawl.clone())?;
    let raw_records = match crawler.fetch_all().await {
        Ok(records) => records,
        Err(e) => {
            log_crawl_failure(&e, crawler.config());
            return Err(e.into());
        }
    };

    let counts = PageCountIndex::from_path(&config.page_counts_path)?;
    if counts.is_empty() {
        warn!(
            file = %config.page_counts_path.display(),
            "no view counts loaded; every page will show 0 views"
        );
    } else {
        println!("📊 Loaded view counts for {} page title(s)", counts.len());
    }
    println!("\n📄 Processing {} item(s)...", raw_records.len());

    let pages = Classifier::new(&config.rules, &counts).classify(&raw_records);
    if pages.is_empty() {
        println!("\nScan complete! No public pages were found.");
        return Ok(0);
    }

    let total = pages.len();
    let candidates = pages.iter().filter(|p| p.archivable).count();
    println!(
        "   {} page(s) are archive candidates (modified in or before {})",
        candidates, config.rules.archive_threshold_year
    );

    report::write_report(pages, &config.output_path)
        .with_context(|| format!("could not write {}", config.output_path.display()))?;

    println!("\n---");
    println!("✅ Scan complete! Found {} public page(s).", total);
    println!("   ({} are potential archive candidates)", candidates);
    println!("   Your report is ready: {}", config.output_path.display());
    println!("---");
    Ok(0)
}

// The error itself is printed once by main; this only adds the advice
fn log_crawl_failure(e: &CrawlError, crawl: &CrawlConfig) {
    error!("{}", crawl_failure_advice(e, crawl));
}

// One headline per error bucket, then the advice
fn crawl_failure_advice(e: &CrawlError, crawl: &CrawlConfig) -> String {
    let headline = match e.kind() {
        ErrorKind::NotFound => "the API endpoint returned 404 (Not Found)",
        ErrorKind::Server => "the wiki server returned an error",
        ErrorKind::Other => "the scan failed",
    };
    format!("{}; {}", headline, e.guidance(&crawl.start_endpoint, &crawl.base_url))
}

// Load -> sample -> probe -> report
async fn handle_verify(args: VerifyArgs) -> Result<i32> {
    let config = VerifyConfig::from_args(&args)?;
    println!("--- Public Page Verifier ---");

    let rows = checker::load_report(&config.input_path)?;

    if rows.is_empty() {
        println!("No pages found in the CSV. Nothing to verify.");
        return Ok(0);
    }

    let size = checker::sample_size(rows.len(), config.sample_fraction);
    let sample = match config.seed {
        Some(seed) => checker::draw_sample(&rows, size, &mut StdRng::seed_from_u64(seed)),
        None => checker::draw_sample(&rows, size, &mut rand::thread_rng()),
    };
    println!(
        "Loaded {} page(s). Sampling {} ({:.1}%)...",
        rows.len(),
        size,
        config.sample_fraction * 100.0
    );
    println!(
        "\n🌐 Starting verification with {} concurrent worker(s)...\n",
        config.max_concurrent
    );

    let summary = checker::verify_links(sample, &config)
        .await
        .context("failed to create HTTP client")?;

    print_results(&summary, args.json)?;

    if summary.failed.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn handle_archived_spaces(file: &Path) -> Result<i32> {
    let keys = spaces::archived_space_keys_from_file(file)?;
    if keys.is_empty() {
        println!("No archived spaces found in {}", file.display());
    } else {
        for key in &keys {
            println!("{}", key);
        }
    }
    Ok(0)
}

// Prints the summary either as a report or JSON
fn print_results(summary: &VerificationSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print_report(summary);
    }
    Ok(())
}

fn print_report(summary: &VerificationSummary) {
    println!("\n--- Verification Complete: Final Report ---");
    println!("{}", "=".repeat(40));
    println!("  Total Links Checked: {}", summary.total());
    println!("  Passed: {}", summary.passed.len());
    println!("  Failed: {}", summary.failed.len());
    println!("{}", "=".repeat(40));

    if summary.failed.is_empty() {
        println!("\n✅ All sampled pages verified successfully!");
        return;
    }

    println!("\n🚨 FAILED LINKS (Details):\n");
    for result in &summary.failed {
        println!("  Page:   {}", result.title);
        println!("  URL:    {}", result.url);
        println!("  Reason: {}", result.reason.as_deref().unwrap_or(""));
        println!("{}", "-".repeat(20));
    }
}
