use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use timetable_solver::parser::{load_input_from_dir, load_input_from_reader, validate_input};
use timetable_solver::reporter::{generate_json_summary, print_summary, render_report, OutputFormat};
use timetable_solver::{generate, generate_with_retry, SolverConfig, TimetableResult};

#[derive(Parser)]
#[command(name = "timetable-solver")]
#[command(about = "Hybrid metaheuristic university timetable generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a timetable from input data
    Generate {
        /// Directory containing subjects.json/faculties.json/sections.json/lab_rooms.json.
        /// If omitted, reads one wire-format JSON document from stdin.
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Output format: json, markdown, text, or all
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Suppress progress output, print the JSON summary only
        #[arg(short, long)]
        quiet: bool,

        /// Retry up to this many times, keeping the best attempt
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Fitness threshold for `max_attempts` retries
        #[arg(long, default_value_t = 950.0)]
        fitness_threshold: f64,

        /// Fix the RNG seed for a reproducible solve (falls back to
        /// TIMETABLE_SEED if unset)
        #[arg(long)]
        seed: Option<u64>,

        /// Generations to run
        #[arg(long, default_value_t = 500)]
        generations: u32,

        /// Population size
        #[arg(long, default_value_t = 120)]
        population_size: usize,

        /// Bound the solve to this many wall-clock seconds, checked at each
        /// generation boundary (falls back to TIMETABLE_MAX_WALL_CLOCK_SECONDS)
        #[arg(long)]
        max_wall_clock_seconds: Option<u64>,
    },

    /// Validate an input directory without solving
    Validate {
        /// Directory containing input JSON files
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Re-render an existing result document in another format
    Report {
        /// Path to a previously generated result JSON file
        #[arg(short, long)]
        result: PathBuf,

        /// Output format: json, markdown, text, or all
        #[arg(short, long, default_value = "markdown")]
        format: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            data,
            format,
            quiet,
            max_attempts,
            fitness_threshold,
            seed,
            generations,
            population_size,
            max_wall_clock_seconds,
        } => run_generate(
            data,
            &format,
            quiet,
            max_attempts,
            fitness_threshold,
            seed,
            generations,
            population_size,
            max_wall_clock_seconds,
        ),
        Commands::Validate { data } => run_validate(&data),
        Commands::Report { result, format } => run_report(&result, &format),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    data: Option<PathBuf>,
    format: &str,
    quiet: bool,
    max_attempts: Option<u32>,
    fitness_threshold: f64,
    seed: Option<u64>,
    generations: u32,
    population_size: usize,
    max_wall_clock_seconds: Option<u64>,
) -> Result<()> {
    let seed = seed.or_else(|| {
        std::env::var("TIMETABLE_SEED")
            .ok()
            .and_then(|v| v.parse().ok())
    });
    let max_wall_clock_seconds = max_wall_clock_seconds.or_else(|| {
        std::env::var("TIMETABLE_MAX_WALL_CLOCK_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
    });
    let input = match data {
        Some(dir) => load_input_from_dir(&dir).context("failed to load input data")?,
        None => load_input_from_reader(io::stdin()).context("failed to read input JSON from stdin")?,
    };

    let validation = validate_input(&input)?;
    if !quiet {
        for warning in &validation.warnings {
            println!("{} {}", "Warning:".yellow(), warning);
        }
        println!(
            "Loaded {} subjects, {} faculties, {} sections, {} lab rooms",
            input.subjects.len(),
            input.faculties.len(),
            input.sections.len(),
            input.lab_rooms.len()
        );
    }

    let config = SolverConfig {
        generations,
        population_size,
        seed,
        max_wall_clock_seconds,
        ..SolverConfig::default()
    };

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}").unwrap());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message("Solving...");
        pb
    };

    let result = match max_attempts {
        Some(attempts) => generate_with_retry(input, &config, attempts, fitness_threshold),
        None => generate(input, &config),
    };

    spinner.finish_and_clear();

    if quiet {
        println!("{}", generate_json_summary(&result)?);
    } else {
        print_summary(&result);
        let format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        render_report(&result, format)?;
    }

    Ok(())
}

fn run_validate(data: &PathBuf) -> Result<()> {
    let input = load_input_from_dir(data)?;
    let validation = validate_input(&input)?;

    if validation.warnings.is_empty() {
        println!("{}", "✓ Input is valid, no warnings".green().bold());
    } else {
        println!("{}", "✓ Input is structurally valid".green().bold());
        for warning in &validation.warnings {
            println!("  {} {}", "-".yellow(), warning);
        }
    }

    Ok(())
}

fn run_report(result_path: &PathBuf, format: &str) -> Result<()> {
    let content = std::fs::read_to_string(result_path)
        .with_context(|| format!("failed to read {}", result_path.display()))?;
    let wire: timetable_solver::reporter::JsonResult = serde_json::from_str(&content)?;
    let result = TimetableResult::from(wire);
    let format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    render_report(&result, format)
}
