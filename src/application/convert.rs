//! Convert use case: legacy backup -> new-format activity files

use crate::application::journal_handler::{ConvertedJournal, JournalHandler};
use crate::domain::{CourseOutline, OutlineCollector};
use crate::error::Result;
use crate::infrastructure::{parse_legacy_file, Config, DirectoryTarget, OutlineResolver};
use std::path::{Path, PathBuf};
use tracing::info;

/// Read the course outline from a legacy backup.
pub fn load_outline(input: &Path) -> Result<CourseOutline> {
    let mut collector = OutlineCollector::new();
    parse_legacy_file(input, &mut collector)?;
    let outline = collector.into_outline();
    info!(
        sections = outline.sections.len(),
        modules = outline.module_count(),
        "course outline loaded"
    );
    Ok(outline)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub output_dir: PathBuf,
    pub journals: Vec<ConvertedJournal>,
}

impl ConversionReport {
    pub fn total_entries(&self) -> usize {
        self.journals.iter().map(|j| j.entries).sum()
    }
}

/// Service converting the journals of one legacy backup
pub struct ConvertService {
    config: Config,
}

impl ConvertService {
    pub fn new(config: Config) -> Self {
        ConvertService { config }
    }

    /// Convert every journal in `input` into `output_dir`.
    ///
    /// The first journal that can't be converted aborts the run; files
    /// already written stay in place.
    pub fn execute(&self, input: &Path, output_dir: &Path) -> Result<ConversionReport> {
        // 1. Course modules live apart from module data, so collect them first
        let outline = load_outline(input)?;

        // 2. Stream the module data through the journal handler
        let resolver = OutlineResolver::new(outline, self.config.first_context_id);
        let target = DirectoryTarget::new(output_dir.to_path_buf());
        let mut handler = JournalHandler::new(resolver, target, self.config.writer_options());
        parse_legacy_file(input, &mut handler)?;

        let report = ConversionReport {
            output_dir: output_dir.to_path_buf(),
            journals: handler.into_converted(),
        };
        info!(
            journals = report.journals.len(),
            entries = report.total_entries(),
            "conversion finished"
        );
        Ok(report)
    }
}
