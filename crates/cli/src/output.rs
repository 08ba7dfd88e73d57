//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use thermal_lib::{AnalyzeResponse, RiskLevel};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Alert shown for a leak probability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Alarm,
    Warning,
    Normal,
}

impl AlertLevel {
    /// Above 0.8 raises the alarm, above 0.6 warns
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.8 {
            AlertLevel::Alarm
        } else if probability > 0.6 {
            AlertLevel::Warning
        } else {
            AlertLevel::Normal
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a probability as a percentage with one decimal
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

pub fn format_temp(celsius: f64) -> String {
    format!("{:.1}°C", celsius)
}

pub fn color_risk(risk: RiskLevel) -> String {
    match risk {
        RiskLevel::Low => risk.as_str().green().to_string(),
        RiskLevel::Medium => risk.as_str().yellow().to_string(),
        RiskLevel::High => risk.as_str().red().bold().to_string(),
    }
}

/// Print the one-line alert for a leak probability
pub fn print_alert(probability: f64) {
    let pct = format_probability(probability);
    match AlertLevel::from_probability(probability) {
        AlertLevel::Alarm => println!(
            "{} {}",
            "🚨".red(),
            format!("HIGH ALARM! Water leak: {}", pct).red().bold()
        ),
        AlertLevel::Warning => println!(
            "{} {}",
            "⚠".yellow().bold(),
            format!("Warning! Suspected leak: {}", pct).yellow()
        ),
        AlertLevel::Normal => print_success(&format!("Normal: {}", pct)),
    }
}

#[derive(Tabled)]
struct AnalysisRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Print a full analysis response
pub fn print_analysis(response: &AnalyzeResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(response),
        OutputFormat::Table => {
            let analysis = &response.analysis;
            let mut rows = vec![
                AnalysisRow {
                    metric: "Leak probability",
                    value: format_probability(response.leak_probability),
                },
                AnalysisRow {
                    metric: "Risk level",
                    value: color_risk(analysis.risk_level),
                },
                AnalysisRow {
                    metric: "Min temperature",
                    value: format_temp(analysis.min_temperature),
                },
                AnalysisRow {
                    metric: "Max temperature",
                    value: format_temp(analysis.max_temperature),
                },
                AnalysisRow {
                    metric: "Average temperature",
                    value: format_temp(analysis.average_temperature),
                },
                AnalysisRow {
                    metric: "Cold spots",
                    value: analysis.cold_spots.to_string(),
                },
                AnalysisRow {
                    metric: "Max gradient",
                    value: format!("{:.2}", analysis.max_gradient),
                },
            ];
            if let Some(rule) = &analysis.matched_rule {
                rows.push(AnalysisRow {
                    metric: "Matched rule",
                    value: rule.clone(),
                });
            }

            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_levels() {
        assert_eq!(AlertLevel::from_probability(0.95), AlertLevel::Alarm);
        assert_eq!(AlertLevel::from_probability(0.8), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_probability(0.7), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_probability(0.4), AlertLevel::Normal);
        assert_eq!(AlertLevel::from_probability(0.0), AlertLevel::Normal);
    }

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(0.95), "95.0%");
        assert_eq!(format_probability(0.0), "0.0%");
    }

    #[test]
    fn test_format_temp() {
        assert_eq!(format_temp(17.04), "17.0°C");
    }
}
