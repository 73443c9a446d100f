use clap::{Parser, Subcommand};
use prooftext_outline::{Outline, RenderedLine, SCHEMA_VERSION, parse_script};
use prooftext_syntax::{Validator, parse, replace_escapes};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

mod config;

#[derive(Parser)]
#[command(name = "prooftext")]
#[command(about = "Check TFL formulas and number proof lines", long_about = None)]
struct Cli {
    /// Log more (repeat for trace output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate formulas, one argument per formula
    Check {
        /// JSON validator config
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Check the formula with its whitespace intact
        #[arg(long)]
        keep_whitespace: bool,
        /// Print one JSON report per formula
        #[arg(long)]
        json: bool,
        #[arg(value_name = "FORMULA", required = true)]
        formulas: Vec<String>,
    },
    /// Print the syntax tree of a formula
    Tree {
        #[arg(value_name = "FORMULA")]
        formula: String,
    },
    /// Replace \and, \or, \implies, ... with their symbols
    Replace {
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Replay a JSON edit script and print the numbered lines
    Outline {
        /// Path to the edit script
        #[arg(value_name = "SCRIPT")]
        path: PathBuf,
    },
}

#[derive(Serialize)]
struct Snapshot {
    schema_version: &'static str,
    lines: Vec<RenderedLine>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Check {
            config: config_path,
            keep_whitespace,
            json,
            formulas,
        } => {
            let config = config::resolve(config_path.as_deref(), *keep_whitespace)?;
            let validator = Validator::new(config);

            let mut invalid = 0;
            for formula in formulas {
                let formula = replace_escapes(formula);
                let report = validator.report(&formula);
                if !report.valid {
                    invalid += 1;
                }
                if *json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!("{formula}: {}", report.message);
                }
            }
            if invalid > 0 {
                anyhow::bail!("{invalid} of {} formula(s) are not valid", formulas.len());
            }
        }
        Commands::Tree { formula } => {
            let formula = replace_escapes(formula);
            let result = parse(&formula);
            print!("{:#?}", result.syntax());
            for error in &result.errors {
                println!("error {:?}: {}", error.range, error.message);
            }
        }
        Commands::Replace { text } => {
            println!("{}", replace_escapes(text));
        }
        Commands::Outline { path } => {
            let content = fs::read_to_string(path)?;
            let edits = parse_script(&content)?;
            let mut outline = Outline::default();
            for (step, edit) in edits.iter().enumerate() {
                outline
                    .apply(edit)
                    .map_err(|e| anyhow::anyhow!("edit {} ({edit:?}) failed: {e}", step + 1))?;
            }
            let snapshot = Snapshot {
                schema_version: SCHEMA_VERSION,
                lines: outline.render_labels(),
            };
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_arguments() {
        let cli = Cli::parse_from(["prooftext", "-v", "check", "--json", "A∧B", "C"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Check {
                json,
                keep_whitespace,
                formulas,
                ..
            } => {
                assert!(json);
                assert!(!keep_whitespace);
                assert_eq!(formulas, ["A∧B", "C"]);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_check_requires_a_formula() {
        assert!(Cli::try_parse_from(["prooftext", "check"]).is_err());
    }
}
