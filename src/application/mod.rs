//! Application layer - Use cases and orchestration

pub mod convert;
pub mod inspect;
pub mod journal_handler;

pub use convert::{load_outline, ConversionReport, ConvertService};
pub use inspect::InspectService;
pub use journal_handler::{journal_paths, ConvertedJournal, JournalHandler};
