//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Generate Mandarin Anki flashcards from a CSV word/sentence list.
#[derive(Debug, Parser)]
#[command(name = "mandarin-cards", version, about)]
pub struct Cli {
    /// Path to the settings file (defaults to the per-user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build an .apkg flashcard package from the input CSV
    Cards {
        /// Input CSV: one row per card, `text[,gloss]`
        #[arg(default_value = "input.csv")]
        input: PathBuf,

        /// Output package path
        #[arg(short, long, default_value = "output.apkg")]
        output: PathBuf,
    },

    /// Generate example sentences for the single-word rows of the input CSV
    Sentences {
        /// Input CSV: one row per card, `text[,gloss]`
        #[arg(default_value = "input.csv")]
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "generated_sentences.csv")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_defaults() {
        let cli = Cli::parse_from(["mandarin-cards", "cards"]);
        match cli.command {
            Command::Cards { input, output } => {
                assert_eq!(input, PathBuf::from("input.csv"));
                assert_eq!(output, PathBuf::from("output.apkg"));
            }
            _ => panic!("expected cards subcommand"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn sentences_with_explicit_paths() {
        let cli = Cli::parse_from([
            "mandarin-cards",
            "sentences",
            "words.csv",
            "--output",
            "out.csv",
            "--config",
            "alt.toml",
        ]);
        match cli.command {
            Command::Sentences { input, output } => {
                assert_eq!(input, PathBuf::from("words.csv"));
                assert_eq!(output, PathBuf::from("out.csv"));
            }
            _ => panic!("expected sentences subcommand"),
        }
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }
}
