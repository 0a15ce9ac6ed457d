//! Command line front end for the plant screen.
//!
//! - `check`: screen files or whole directories in parallel
//! - `diagnose`: full scan report for one photo
//! - `config`: print the effective configuration

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use plant_core::{AppConfig, PlantVerdict, ScanReport};
use plant_diagnosis::Scanner;
use plant_screen::{collect_image_paths, open_image, DecodeLimits, PlantScreen};
use rayon::prelude::*;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "plant-scan")]
#[command(version)]
#[command(about = "Screen leaf photos for plant material", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen images (files or directories) for plant material
    Check {
        /// Images or directories to screen
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print one JSON object per image
        #[arg(long)]
        json: bool,
    },

    /// Screen one image and, if it passes, diagnose it
    Diagnose {
        /// Image to scan
        image: PathBuf,

        /// Fixed seed for the placeholder diagnoser
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    plant_core::setup_cli_logging(cli.verbose)?;

    let config = plant_core::load_app_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { paths, json } => check_images(&config, &paths, json)?,
        Commands::Diagnose { image, seed, json } => diagnose_image(config, &image, seed, json)?,
        Commands::Config => {
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to render configuration")?
            );
        }
    }

    Ok(())
}

/// Outcome of screening one file
struct CheckOutcome {
    path: PathBuf,
    result: plant_core::Result<PlantVerdict>,
}

fn check_images(config: &AppConfig, inputs: &[PathBuf], json: bool) -> Result<()> {
    let mut images = Vec::new();
    for input in inputs {
        let found = collect_image_paths(input)
            .with_context(|| format!("Failed to collect images from {}", input.display()))?;
        if found.is_empty() {
            warn!("No images found in {}", input.display());
        }
        images.extend(found);
    }
    info!("Screening {} images", images.len());

    let screen = PlantScreen::new(config.screen.clone());
    let limits = DecodeLimits::from(&config.server);

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.green/blue} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    let outcomes: Vec<CheckOutcome> = images
        .par_iter()
        .map(|path| {
            let result =
                open_image(path, &limits).and_then(|decoded| screen.screen_decoded(&decoded));
            pb.inc(1);
            CheckOutcome {
                path: path.clone(),
                result,
            }
        })
        .collect();
    pb.finish_and_clear();

    for outcome in &outcomes {
        if json {
            println!("{}", check_json(outcome));
        } else {
            println!("{}", check_line(outcome));
        }
    }

    let summary = CheckSummary::tally(&outcomes);
    info!(
        "Screened {} images: {} plant, {} non-plant, {} failed",
        outcomes.len(),
        summary.plants,
        summary.rejected,
        summary.failed
    );
    summary.ensure_complete()
}

/// Counts of a `check` run
#[derive(Debug, Default, PartialEq, Eq)]
struct CheckSummary {
    plants: usize,
    rejected: usize,
    failed: usize,
}

impl CheckSummary {
    fn tally(outcomes: &[CheckOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match &outcome.result {
                Ok(verdict) if verdict.is_plant => summary.plants += 1,
                Ok(_) => summary.rejected += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Fails the run when any image could not be screened
    fn ensure_complete(&self) -> Result<()> {
        if self.failed > 0 {
            bail!(
                "{} of {} images could not be screened",
                self.failed,
                self.plants + self.rejected + self.failed
            );
        }
        Ok(())
    }
}

fn check_line(outcome: &CheckOutcome) -> String {
    let path = outcome.path.display();
    match &outcome.result {
        Ok(verdict) => format!(
            "{:<9} {}  (green {:.1}%, brown {:.1}%, {})",
            if verdict.is_plant { "PLANT" } else { "NON-PLANT" },
            path,
            verdict.green_ratio * 100.0,
            verdict.brown_ratio * 100.0,
            verdict.basis
        ),
        Err(e) => format!("{:<9} {}  ({})", "ERROR", path, e),
    }
}

fn check_json(outcome: &CheckOutcome) -> serde_json::Value {
    match &outcome.result {
        Ok(verdict) => serde_json::json!({
            "path": outcome.path,
            "verdict": verdict,
        }),
        Err(e) => serde_json::json!({
            "path": outcome.path,
            "error": e.to_string(),
        }),
    }
}

fn diagnose_image(mut config: AppConfig, path: &Path, seed: Option<u64>, json: bool) -> Result<()> {
    if seed.is_some() {
        config.diagnosis.seed = seed;
    }

    let scanner = Scanner::from_config(&config)?;
    let decoded = open_image(path, &DecodeLimits::from(&config.server))?;
    let report = scanner.scan_decoded(&decoded)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(path, &report));
    }

    Ok(())
}

fn render_report(path: &Path, report: &ScanReport) -> String {
    let mut out = String::new();
    let verdict = &report.verdict;

    out.push_str(&format!("Image:    {}\n", path.display()));
    out.push_str(&format!(
        "Screen:   {} (green {:.1}%, brown {:.1}%, {})\n",
        if verdict.is_plant { "plant" } else { "non-plant" },
        verdict.green_ratio * 100.0,
        verdict.brown_ratio * 100.0,
        verdict.basis
    ));
    out.push_str(&format!("Result:   {}\n", report.message));

    if let Some(diagnosis) = &report.diagnosis {
        if diagnosis.placeholder {
            out.push_str("Note:     randomly drawn placeholder, not derived from the image\n");
        }
        out.push_str("Ranking:\n");
        for (rank, prediction) in diagnosis.ranked.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {:<22} {:>5.1}%\n",
                rank + 1,
                prediction.label,
                prediction.confidence * 100.0
            ));
        }
    }

    if let Some(advice) = &report.advice {
        out.push_str(&format!("Advice:   {}\n", advice.summary));
        for action in &advice.actions {
            out.push_str(&format!("  - {}\n", action));
        }
    }

    out
}
