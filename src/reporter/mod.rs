mod json;
mod markdown;
mod text;

pub use json::*;
pub use markdown::*;
pub use text::*;

use crate::solver::TimetableResult;
use colored::Colorize;
use std::str::FromStr;

/// Output format for reports. `All` renders every format in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Text,
    All,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "text" | "txt" => Ok(OutputFormat::Text),
            "all" => Ok(OutputFormat::All),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Renders `result` in `format`, printing to stdout. `All` prints json,
/// markdown, and text in sequence, separated by a blank line.
pub fn render_report(result: &TimetableResult, format: OutputFormat) -> crate::error::Result<()> {
    match format {
        OutputFormat::Markdown => println!("{}", generate_markdown_report(result)),
        OutputFormat::Text => println!("{}", generate_text_report(result)),
        OutputFormat::Json => println!("{}", generate_json_report(result)?),
        OutputFormat::All => {
            println!("{}", generate_json_report(result)?);
            println!();
            println!("{}", generate_markdown_report(result));
            println!();
            println!("{}", generate_text_report(result));
        }
    }
    Ok(())
}

/// Prints a short colored summary to stdout, the same shape across the
/// `generate` and `report` subcommands.
pub fn print_summary(result: &TimetableResult) {
    let report = crate::solver::fitness::evaluate(&crate::types::Candidate::new(result.timetable.clone()));

    println!("{}", "Timetable Summary".bold().cyan());
    println!("{}", "─".repeat(40));
    println!("Assignments: {}", result.timetable.len());
    println!("Fitness: {:.1}/1000", result.fitness);
    println!("Quality: {}", report.quality_tier());

    if result.success {
        println!("{}", "✓ success".green().bold());
    } else {
        println!("{}", "✗ did not reach the success threshold".yellow().bold());
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".bold());
        for warning in &result.warnings {
            println!("  {} {}", "-".yellow(), warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_format_names() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("all".parse::<OutputFormat>().unwrap(), OutputFormat::All);
    }

    #[test]
    fn rejects_unknown_format_name() {
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
