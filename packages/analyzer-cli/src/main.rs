//! Batch driver: analyze every professor in a roster CSV.
//!
//! Reads `professor_name,course_code,url` rows, runs the review
//! pipeline per row with a politeness delay between profiles, and
//! writes the results as both JSON and CSV. One bad row never aborts
//! the batch; its failure is logged and the run moves on.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use openai_client::OpenAIClient;
use review_analyzer::{is_unavailable, Config, OpenAiGenerator, ReviewAnalyzer, RmpClient};

/// Placeholder written instead of a sentinel summary so exports carry
/// one uniform "not available" marker.
const ANALYSIS_UNAVAILABLE: &str = "Analysis unavailable";

#[derive(Parser)]
#[command(name = "analyze-reviews", about = "Summarize professor reviews for a roster")]
struct Args {
    /// Roster CSV with professor_name, course_code, url columns
    #[arg(long, default_value = "data/output/professors.csv")]
    input: PathBuf,

    /// Directory for professor_analyses.json / .csv
    #[arg(long, default_value = "data/output")]
    out_dir: PathBuf,

    /// Restrict reviews to one course code
    #[arg(long)]
    course_filter: Option<String>,

    /// Cap on reviews fetched per professor (overrides MAX_REVIEWS)
    #[arg(long)]
    max_reviews: Option<usize>,

    /// Skip the startup OpenAI access probe
    #[arg(long)]
    skip_verify: bool,
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    professor_name: String,
    course_code: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct AnalysisRow {
    professor_name: String,
    course_code: String,
    number_of_reviews: usize,
    average_quality: Option<f64>,
    average_difficulty: Option<f64>,
    analysis: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,review_analyzer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let openai = OpenAIClient::new(&config.openai_api_key)
        .context("Failed to create OpenAI client")?;
    if !args.skip_verify {
        openai
            .verify_access(&config.openai_model)
            .await
            .context("OpenAI API access check failed")?;
        info!("OpenAI API access verified");
    }

    let source = RmpClient::new().context("Failed to create review source client")?;
    let max_reviews = args.max_reviews.or(config.max_reviews);
    let analyzer = ReviewAnalyzer::new(
        Arc::new(source),
        Arc::new(OpenAiGenerator::new(openai, &config.openai_model)),
        config.fetch_config(),
        max_reviews,
    );

    let roster = read_roster(&args.input)
        .with_context(|| format!("Failed to read roster from {}", args.input.display()))?;
    info!(professors = roster.len(), input = %args.input.display(), "Roster loaded");

    let mut results: Vec<AnalysisRow> = Vec::new();
    for (index, row) in roster.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(config.profile_delay).await;
        }
        info!(professor = %row.professor_name, "Processing reviews");

        match analyzer
            .analyze(&row.url, args.course_filter.as_deref())
            .await
        {
            Ok(result) => {
                let analysis = if is_unavailable(&result.summary) {
                    warn!(professor = %row.professor_name, "Analysis unavailable");
                    ANALYSIS_UNAVAILABLE.to_string()
                } else {
                    result.summary
                };
                results.push(AnalysisRow {
                    professor_name: row.professor_name.clone(),
                    course_code: row.course_code.clone(),
                    number_of_reviews: result.review_count,
                    average_quality: result.average_quality,
                    average_difficulty: result.average_difficulty,
                    analysis,
                });
            }
            Err(error) => {
                warn!(
                    professor = %row.professor_name,
                    error = %error,
                    "Skipping professor"
                );
            }
        }
    }

    write_outputs(&args.out_dir, &results)
        .with_context(|| format!("Failed to write results to {}", args.out_dir.display()))?;
    info!(
        analyzed = results.len(),
        skipped = roster.len() - results.len(),
        out_dir = %args.out_dir.display(),
        "Batch complete"
    );

    Ok(())
}

fn read_roster(path: &PathBuf) -> Result<Vec<RosterRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: RosterRow = record?;
        rows.push(row);
    }
    Ok(rows)
}

fn write_outputs(out_dir: &PathBuf, results: &[AnalysisRow]) -> Result<()> {
    std::fs::create_dir_all(out_dir)?;

    let json_path = out_dir.join("professor_analyses.json");
    let json_file = std::fs::File::create(&json_path)?;
    serde_json::to_writer_pretty(json_file, results)?;

    let csv_path = out_dir.join("professor_analyses.csv");
    let mut writer = csv::Writer::from_path(&csv_path)?;
    for row in results {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
