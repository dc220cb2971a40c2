//! Statrefresh CLI - refresh the processed statistics dataset
//!
//! # Main Commands
//!
//! ```bash
//! statrefresh run                       # Download, then process everything
//! statrefresh run --skip-download       # Process files already in the raw dir
//! statrefresh fetch                     # Download and unpack the dataset only
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! statrefresh reshape wide.csv          # Melt one wide indicator file
//! statrefresh municipalities list.docx  # Extract the municipality table
//! ```

use clap::{Parser, Subcommand};
use statrefresh::config::{
    DEFAULT_API_BASE, DEFAULT_DATASET_ID, DEFAULT_PROCESSED_DIR, DEFAULT_RAW_DIR,
    INDICATOR_PREAMBLE_LINES,
};
use statrefresh::logs::{init_logging, log_error, log_info, log_success};
use statrefresh::{
    melt_indicators, municipality_table, parse_municipality_lines, read_indicator_csv,
    read_docx_lines, refresh, run_pipeline, write_csv, write_table, DatasetClient,
    PipelineConfig, Table, YearRange,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "statrefresh")]
#[command(about = "Refresh tidy country and municipal statistics tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full refresh: download -> reshape -> normalize -> merge -> write
    Run {
        /// Directory with the raw input files
        #[arg(long, env = "STATREFRESH_RAW_DIR", default_value = DEFAULT_RAW_DIR)]
        raw_dir: PathBuf,

        /// Directory receiving the processed CSV files
        #[arg(long, env = "STATREFRESH_PROCESSED_DIR", default_value = DEFAULT_PROCESSED_DIR)]
        processed_dir: PathBuf,

        /// Dataset identifier on the host (owner/slug)
        #[arg(long, env = "STATREFRESH_DATASET", default_value = DEFAULT_DATASET_ID)]
        dataset: String,

        /// Dataset host API base URL
        #[arg(long, env = "STATREFRESH_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,

        /// Use the files already present in the raw directory
        #[arg(long)]
        skip_download: bool,

        /// First year kept in the long indicator table
        #[arg(long, default_value = "2020")]
        from_year: i32,

        /// Last year kept in the long indicator table
        #[arg(long, default_value = "2023")]
        to_year: i32,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Download and unpack the dataset into the raw directory
    Fetch {
        #[arg(long, env = "STATREFRESH_RAW_DIR", default_value = DEFAULT_RAW_DIR)]
        raw_dir: PathBuf,

        #[arg(long, env = "STATREFRESH_DATASET", default_value = DEFAULT_DATASET_ID)]
        dataset: String,

        #[arg(long, env = "STATREFRESH_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,
    },

    /// Melt a single wide indicator CSV into long form
    Reshape {
        /// Wide indicator CSV file
        input: PathBuf,

        /// Lines to skip before the header row
        #[arg(long, default_value_t = INDICATOR_PREAMBLE_LINES)]
        preamble: usize,

        #[arg(long, default_value = "2020")]
        from_year: i32,

        #[arg(long, default_value = "2023")]
        to_year: i32,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract code/name pairs from a municipality listing document
    Municipalities {
        /// Input .docx file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            raw_dir,
            processed_dir,
            dataset,
            api_base,
            skip_download,
            from_year,
            to_year,
            report,
        } => {
            let config = PipelineConfig::new(raw_dir, processed_dir, dataset)
                .with_api_base(api_base)
                .with_years(YearRange::new(from_year, to_year));
            cmd_run(&config, skip_download, report.as_deref())
        }

        Commands::Fetch {
            raw_dir,
            dataset,
            api_base,
        } => cmd_fetch(&raw_dir, &dataset, &api_base),

        Commands::Reshape {
            input,
            preamble,
            from_year,
            to_year,
            output,
        } => cmd_reshape(&input, preamble, YearRange::new(from_year, to_year), output.as_deref()),

        Commands::Municipalities { input, output } => cmd_municipalities(&input, output.as_deref()),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_run(
    config: &PipelineConfig,
    skip_download: bool,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!(
        "Refreshing {} -> {}",
        config.raw_dir.display(),
        config.processed_dir.display()
    ));

    let report = if skip_download {
        run_pipeline(config)?
    } else {
        let client = DatasetClient::from_env()
            .map_err(statrefresh::PipelineError::from)?
            .with_api_base(config.api_base.clone());
        refresh(config, &client)?
    };

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)?;
        log_success(format!("Run report written to {}", path.display()));
    }

    Ok(())
}

fn cmd_fetch(raw_dir: &Path, dataset: &str, api_base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = DatasetClient::from_env()?.with_api_base(api_base);
    let files = client.fetch_into(dataset, raw_dir)?;
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}

fn cmd_reshape(
    input: &Path,
    preamble: usize,
    years: YearRange,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let wide = read_indicator_csv(input, preamble)?;
    log_info(format!("{} wide rows, {} columns", wide.len(), wide.width()));

    let long = melt_indicators(&wide, years)?;
    log_success(format!("{} long rows", long.len()));

    write_output(&long, output)
}

fn cmd_municipalities(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let lines = read_docx_lines(input)?;
    let municipalities = parse_municipality_lines(&lines);
    log_success(format!(
        "{} municipalities from {} paragraphs",
        municipalities.len(),
        lines.len()
    ));

    write_output(&municipality_table(&municipalities), output)
}

fn write_output(table: &Table, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            write_table(table, p)?;
            log_success(format!("Output written to: {}", p.display()));
        }
        None => {
            write_csv(table, std::io::stdout().lock())?;
        }
    }
    Ok(())
}
