//! Output formatting utilities

use crate::application::ConversionReport;
use crate::domain::{JournalEvent, JournalSummary};

/// Format the result of a conversion for display
pub fn format_conversion_report(report: &ConversionReport) -> String {
    if report.journals.is_empty() {
        return "No journals found".to_string();
    }

    let mut output = String::new();
    for journal in &report.journals {
        output.push_str(&format!(
            "journal {} -> {} ({} entries)\n",
            journal.instance_id, journal.output, journal.entries
        ));
    }
    output.push_str(&format!(
        "Converted {} journal(s), {} entries into {}\n",
        report.journals.len(),
        report.total_entries(),
        report.output_dir.display()
    ));
    output
}

/// Format journal summaries for display, with editing windows judged at `now` (Unix seconds)
pub fn format_journal_summaries(journals: &[JournalSummary], now: i64) -> String {
    if journals.is_empty() {
        return "No journals found".to_string();
    }

    let mut output = String::new();
    for journal in journals {
        let cm = journal
            .course_module_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "missing".to_string());
        output.push_str(&format!(
            "{:>6}  cm {:<8} {} entries, {} to regrade  {}  [{}]\n",
            journal.instance_id,
            cm,
            journal.entries,
            journal.regrade_pending,
            journal.name,
            journal.window.describe_at(now)
        ));
    }
    output
}

/// Format event descriptors for display
pub fn format_event_catalogue(events: &[JournalEvent]) -> String {
    let mut output = String::new();
    for event in events {
        let d = event.descriptor();
        output.push_str(&format!(
            "{:<22} crud={} edulevel={} objecttable={}  {}\n",
            d.name,
            d.crud.as_char(),
            d.edu_level.code(),
            d.object_table,
            d.title
        ));
    }
    output
}
