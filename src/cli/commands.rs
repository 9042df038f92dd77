//! CLI command definitions

use crate::domain::JournalEvent;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "journal-convert")]
#[command(about = "Convert legacy journal backups to the current backup format", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert the journals of a legacy moodle.xml
    Convert {
        /// Legacy backup document (moodle.xml)
        input: PathBuf,

        /// Output directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Config file (default: journal-convert.toml in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Indent output by this many spaces per level (overrides config)
        #[arg(long)]
        indent: Option<usize>,
    },

    /// List the journals found in a legacy moodle.xml
    Inspect {
        /// Legacy backup document (moodle.xml)
        input: PathBuf,
    },

    /// List the journal events and their metadata
    Events {
        /// Only show this event (e.g. entry_created)
        event: Option<JournalEvent>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inspect() {
        let cli = Cli::try_parse_from(["journal-convert", "inspect", "moodle.xml"]).unwrap();
        match cli.command {
            Commands::Inspect { input } => assert_eq!(input, PathBuf::from("moodle.xml")),
            other => panic!("Expected Inspect, got {:?}", other),
        }
        assert!(
            Cli::try_parse_from(["journal-convert", "inspect", "moodle.xml", "--indent", "2"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_event_name() {
        let cli = Cli::try_parse_from(["journal-convert", "events", "entry_created"]).unwrap();
        match cli.command {
            Commands::Events { event, json } => {
                assert_eq!(event, Some(JournalEvent::EntryCreated));
                assert!(!json);
            }
            other => panic!("Expected Events, got {:?}", other),
        }
        assert!(Cli::try_parse_from(["journal-convert", "events", "entry_deleted"]).is_err());
    }
}
