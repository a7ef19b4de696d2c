use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use racepace::data::{
    belgian_gp_2025_roster, driver_codes_2025, load_mapping_csv, load_roster_csv, CsvLapSource,
};
use racepace::{Pipeline, PredictionReport, TrainerConfig};

fn main() -> Result<()> {
    // Initialize logging
    let level = match std::env::var("RACEPACE_LOG").as_deref() {
        Ok("debug") => Level::DEBUG,
        Ok("warn") => Level::WARN,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let history_path = std::env::var("RACEPACE_HISTORY")
        .map(PathBuf::from)
        .context("RACEPACE_HISTORY must point to a historical laps CSV")?;

    let roster = match std::env::var("RACEPACE_ROSTER") {
        Ok(path) => load_roster_csv(&path)
            .with_context(|| format!("Failed to load roster from {}", path))?,
        Err(_) => belgian_gp_2025_roster(),
    };
    let identity = match std::env::var("RACEPACE_MAPPING") {
        Ok(path) => load_mapping_csv(&path)
            .with_context(|| format!("Failed to load driver codes from {}", path))?,
        Err(_) => driver_codes_2025(),
    };
    let config = match std::env::var("RACEPACE_CONFIG") {
        Ok(path) => TrainerConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load trainer config from {}", path))?,
        Err(_) => TrainerConfig::default(),
    };

    info!(
        "Predicting {} entrant(s) from history in {:?}",
        roster.len(),
        history_path
    );

    let pipeline = Pipeline::new(config)?;
    let report = pipeline
        .run(&CsvLapSource::new(&history_path), roster, &identity)
        .context("Prediction pipeline failed")?;

    if std::env::var("RACEPACE_JSON").is_ok_and(|v| v == "1") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &PredictionReport) {
    println!(
        "Training on {} common drivers: {:?}",
        report.common_entrant_count(),
        report.alignment.common_entrants
    );
    if !report.alignment.imputed.is_empty() {
        println!(
            "{} {}",
            "Imputed sector times:".yellow(),
            report.alignment.imputed.join(", ")
        );
    }
    println!();

    println!("{}", "Predicted Race Lap Times".cyan().bold());
    println!("{:>4} {:<22} {:>12}", "Pos", "Driver", "Time (s)");
    println!("{}", "-".repeat(40));
    for entry in &report.rankings {
        let marker = if entry.imputed { " *" } else { "" };
        let line = format!(
            "{:>4} {:<22} {:>12.3}{}",
            entry.position, entry.driver, entry.predicted_time, marker
        );
        if entry.position == 1 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line);
        }
    }
    println!();

    println!(
        "{} {:.2} seconds ({} train / {} validation)",
        "Model Error (MAE):".yellow().bold(),
        report.validation_mae,
        report.train_size,
        report.validation_size
    );
}
