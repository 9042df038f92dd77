//! journal-convert - Legacy journal backup converter
//!
//! Reads the journal activities out of a legacy course backup (`moodle.xml`)
//! and writes them in the current backup layout, one
//! `activities/journal_<cmid>/journal.xml` per journal.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::ConvertError;
