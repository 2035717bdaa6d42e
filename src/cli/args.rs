//! Command-line argument parsing for DropoutShield
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DropoutShield - dropout-risk scoring with remote/offline fallback
#[derive(Parser, Debug)]
#[command(name = "dropoutshield")]
#[command(version)]
#[command(about = "Score students for dropout risk and suggest interventions", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Remote predictor base URL (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Check whether the remote predictor is reachable
    Status {
        /// Probe even if a fresh result is cached
        #[arg(long)]
        force: bool,
    },

    /// Score a CSV file of students
    Predict {
        /// CSV file to ingest
        file: PathBuf,

        /// Also save the ingested students under this identity
        #[arg(long, value_name = "IDENTITY")]
        save_as: Option<String>,
    },

    /// Load and score one identity's students from the best available source
    Load {
        identity: String,
    },

    /// Load every known identity merged, with a per-class risk summary
    Aggregate,

    /// Export one identity's students as CSV
    Export {
        identity: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add one student to an identity's set, re-score it, and save it
    Add {
        identity: String,

        /// Student name (required)
        #[arg(long)]
        name: Option<String>,

        /// Student id (defaults to the next number in the set)
        #[arg(long)]
        id: Option<String>,

        /// Class or section (defaults to N/A)
        #[arg(long = "class")]
        class_name: Option<String>,

        /// Any other column as COLUMN=VALUE; aliases such as Attendance are accepted
        #[arg(long = "set", value_name = "COLUMN=VALUE", value_parser = parse_column_value)]
        fields: Vec<(String, String)>,
    },

    /// Delete one student from the remote store and the local cache
    Delete {
        identity: String,
        student_id: String,
    },

    /// Display current configuration
    Config,
}

fn parse_column_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected COLUMN=VALUE, got '{}'", raw)),
    }
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Whether to print suggestions under each prediction
    pub fn show_suggestions(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["dropoutshield", "aggregate"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["dropoutshield", "-v", "aggregate"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["dropoutshield", "-vv", "aggregate"]).verbosity(), Verbosity::VeryVerbose);
        assert_eq!(parse(&["dropoutshield", "aggregate", "-q"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_predict_command() {
        let args = parse(&["dropoutshield", "predict", "class.csv", "--save-as", "teacher1", "--json"]);
        assert!(args.json);
        assert_eq!(
            args.command,
            Commands::Predict {
                file: PathBuf::from("class.csv"),
                save_as: Some("teacher1".to_string()),
            }
        );
    }

    #[test]
    fn test_global_overrides() {
        let args = parse(&["dropoutshield", "--base-url", "http://10.0.0.2:9999", "status", "--force"]);
        assert_eq!(args.base_url.as_deref(), Some("http://10.0.0.2:9999"));
        assert_eq!(args.command, Commands::Status { force: true });
    }

    #[test]
    fn test_delete_requires_both_ids() {
        assert!(Args::try_parse_from(["dropoutshield", "delete", "teacher1"]).is_err());
        let args = parse(&["dropoutshield", "delete", "teacher1", "42"]);
        assert_eq!(
            args.command,
            Commands::Delete {
                identity: "teacher1".to_string(),
                student_id: "42".to_string(),
            }
        );
    }

    #[test]
    fn test_add_command() {
        let args = parse(&[
            "dropoutshield", "add", "teacher1", "--name", "Asha", "--class", "7A",
            "--set", "Attendance=91", "--set", "intervention_history=a=b",
        ]);
        assert_eq!(
            args.command,
            Commands::Add {
                identity: "teacher1".to_string(),
                name: Some("Asha".to_string()),
                id: None,
                class_name: Some("7A".to_string()),
                fields: vec![
                    ("Attendance".to_string(), "91".to_string()),
                    ("intervention_history".to_string(), "a=b".to_string()),
                ],
            }
        );
        assert!(Args::try_parse_from(["dropoutshield", "add", "teacher1", "--set", "91"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["dropoutshield"]).is_err());
    }

    #[test]
    fn test_show_suggestions() {
        assert!(!Verbosity::Normal.show_suggestions());
        assert!(Verbosity::Verbose.show_suggestions());
    }
}
