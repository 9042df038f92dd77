//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands};
pub use output::{format_conversion_report, format_event_catalogue, format_journal_summaries};
