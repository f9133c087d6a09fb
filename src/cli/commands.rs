use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::processors::{DailyAggregator, Pipeline};
use crate::utils::constants::DAILY_FILE_PREFIX;
use crate::utils::progress::ProgressReporter;
use crate::utils::workspace::DataDirs;
use crate::writers::{CsvWriter, SqliteWriter};

pub async fn run(cli: Cli) -> Result<()> {
    let default_filter = if cli.verbose {
        "kma_processor=debug"
    } else {
        "kma_processor=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { data_dir } => {
            let dirs = DataDirs::new(&data_dir);
            dirs.ensure()?;

            println!("Data directories ready:");
            println!("  raw:       {}", dirs.raw.display());
            println!("  processed: {}", dirs.processed.display());
            println!("  db:        {}", dirs.db.display());
        }

        Commands::Process {
            data_dir,
            embedded_headers,
            use_mmap,
            site_code,
        } => {
            println!("Processing weather exports...");
            println!("Data root: {}", data_dir.display());

            let dirs = DataDirs::new(&data_dir);
            dirs.ensure()?;

            let progress = ProgressReporter::new_spinner("Processing data...", false);

            let pipeline = Pipeline::new()
                .with_embedded_headers(embedded_headers)
                .with_mmap(use_mmap)
                .with_site_code(&site_code);

            let summary = pipeline.run(&dirs, Some(&progress)).await?;

            println!("\nMerged series:");
            for (kind, count) in &summary.series_counts {
                println!("  {:<24} {} records", kind.display_name(), count);
            }

            println!(
                "\nUnified table: {} rows covering {} to {}",
                summary.unified_rows,
                summary.period.0.format("%Y-%m"),
                summary.period.1.format("%Y-%m"),
            );
            println!("Daily summary: {} days", summary.daily_days);

            println!("\nGenerated files:");
            for path in &summary.legacy_exports {
                println!("  {}", path.display());
            }
            println!("  {}", summary.unified_csv.display());
            println!("  {}", summary.unified_db.display());
            println!("  {}", summary.daily_csv.display());
            println!("  {}", summary.daily_db.display());

            println!("\nProcessing complete!");
        }

        Commands::Aggregate { input_db, data_dir } => {
            println!("Aggregating daily statistics from {}", input_db.display());

            let label = input_db
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    ProcessingError::Config(format!("Invalid database path: {}", input_db.display()))
                })?;

            let dirs = DataDirs::new(&data_dir);
            dirs.ensure()?;

            let sqlite_writer = SqliteWriter::new();
            let rows = sqlite_writer.read_unified(&input_db)?;
            let daily = DailyAggregator::new().aggregate(&rows);

            let daily_csv = dirs
                .processed
                .join(format!("{}_{}.csv", DAILY_FILE_PREFIX, label));
            CsvWriter::new().write_daily(&daily, &daily_csv)?;

            let daily_db = dirs.db.join(format!("{}_{}.db", DAILY_FILE_PREFIX, label));
            sqlite_writer.write_daily(&daily, &daily_db)?;

            println!("{} days aggregated from {} hourly rows", daily.len(), rows.len());
            println!("  {}", daily_csv.display());
            println!("  {}", daily_db.display());
        }

        Commands::Info { file, sample } => {
            println!("Unified database: {}", file.display());

            let writer = SqliteWriter::new();
            let info = writer.unified_info(&file)?;

            println!("Total rows: {}", info.total_rows);
            if let (Some(first), Some(last)) = (&info.first_date, &info.last_date) {
                println!("Date range: {} to {}", first, last);
            }

            if sample > 0 {
                println!("\nSample rows (showing up to {}):", sample);
                for (i, row) in writer.read_unified_sample(&file, sample)?.iter().enumerate() {
                    println!(
                        "{}. {} {:02}:00 temperature={} rain_prob={} rain_type={}",
                        i + 1,
                        row.date_key(),
                        row.hour,
                        format_reading(row.temperature),
                        format_reading(row.rain_prob),
                        format_reading(row.rain_type),
                    );
                }
            }
        }
    }

    Ok(())
}

fn format_reading(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.1}", value),
        None => "null".to_string(),
    }
}
