//! Inspect use case: summarise the journals in a legacy backup

use crate::application::convert::load_outline;
use crate::application::journal_handler::journal_paths;
use crate::domain::{
    needs_regrade, ConvertPath, EditingWindow, FieldMap, JournalSummary, ModuleHandler, MODULE_NAME,
};
use crate::error::Result;
use crate::infrastructure::parse_legacy_file;
use std::path::Path;

/// A journal as read from the module data, before the outline is applied.
struct InspectedJournal {
    summary: JournalSummary,
    /// Editing limit in days, 0 for none
    days: i64,
}

/// Collects a [`JournalSummary`] per journal without writing anything.
struct JournalInspector {
    paths: Vec<ConvertPath>,
    journals: Vec<InspectedJournal>,
}

impl ModuleHandler for JournalInspector {
    fn paths(&self) -> &[ConvertPath] {
        &self.paths
    }

    fn process(&mut self, name: &str, data: FieldMap) -> Result<FieldMap> {
        match name {
            "journal" => {
                let instance_id = data.require_u64("journal", "id")?;
                let title = data.get("name").unwrap_or_default().to_string();
                self.journals.push(InspectedJournal {
                    summary: JournalSummary::new(instance_id, title),
                    days: data.get_i64("days").unwrap_or(0),
                });
            }
            "entry" => {
                if let Some(journal) = self.journals.last_mut().map(|j| &mut j.summary) {
                    journal.entries += 1;
                    if needs_regrade(data.get_i64("modified"), data.get_i64("timemarked")) {
                        journal.regrade_pending += 1;
                    }
                }
            }
            _ => {}
        }
        Ok(data)
    }
}

pub struct InspectService;

impl InspectService {
    /// Summaries of every journal in `input`, in document order.
    pub fn execute(input: &Path) -> Result<Vec<JournalSummary>> {
        let outline = load_outline(input)?;

        let mut inspector = JournalInspector {
            paths: journal_paths(),
            journals: Vec::new(),
        };
        parse_legacy_file(input, &mut inspector)?;

        let journals = inspector
            .journals
            .into_iter()
            .map(|InspectedJournal { mut summary, days }| {
                if let Some((cm, section)) = outline.find_module(MODULE_NAME, summary.instance_id) {
                    summary.course_module_id = Some(cm.id);
                    summary.window =
                        EditingWindow::compute(&outline.format, outline.start_date, section, days);
                }
                summary
            })
            .collect();
        Ok(journals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BACKUP: &str = "<MOODLE_BACKUP><COURSE>\
        <HEADER><FORMAT>weeks</FORMAT><STARTDATE>1000000</STARTDATE></HEADER>\
        <SECTIONS><SECTION><ID>31</ID><NUMBER>2</NUMBER><MODS>\
        <MOD><ID>12</ID><TYPE>journal</TYPE><INSTANCE>5</INSTANCE></MOD>\
        </MODS></SECTION></SECTIONS>\
        <MODULES>\
        <MOD><ID>5</ID><MODTYPE>journal</MODTYPE><NAME>Reflections</NAME><DAYS>7</DAYS>\
        <ENTRIES>\
        <ENTRY><ID>1</ID><USERID>3</USERID><MODIFIED>300</MODIFIED><TIMEMARKED>200</TIMEMARKED></ENTRY>\
        <ENTRY><ID>2</ID><USERID>4</USERID><MODIFIED>100</MODIFIED><TIMEMARKED>200</TIMEMARKED></ENTRY>\
        </ENTRIES></MOD>\
        <MOD><ID>8</ID><MODTYPE>journal</MODTYPE><NAME>Orphan</NAME></MOD>\
        </MODULES></COURSE></MOODLE_BACKUP>";

    #[test]
    fn test_inspect_summaries() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("moodle.xml");
        fs::write(&input, BACKUP).unwrap();

        let journals = InspectService::execute(&input).unwrap();
        assert_eq!(journals.len(), 2);

        let first = &journals[0];
        assert_eq!(first.instance_id, 5);
        assert_eq!(first.course_module_id, Some(12));
        assert_eq!(first.name, "Reflections");
        assert_eq!(first.entries, 2);
        assert_eq!(first.regrade_pending, 1);
        assert_eq!(
            first.window,
            EditingWindow::Limited {
                opens: 1_000_000 + 604_800,
                closes: 1_000_000 + 604_800 + 7 * 86_400,
            }
        );

        let orphan = &journals[1];
        assert_eq!(orphan.course_module_id, None);
        assert_eq!(orphan.entries, 0);
        assert_eq!(orphan.window, EditingWindow::Unlimited);
    }

    #[test]
    fn test_inspect_oversized_days() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("moodle.xml");
        fs::write(
            &input,
            BACKUP.replace("<DAYS>7</DAYS>", "<DAYS>999999999999999999</DAYS>"),
        )
        .unwrap();

        let journals = InspectService::execute(&input).unwrap();
        assert_eq!(journals[0].course_module_id, Some(12));
        assert_eq!(journals[0].window, EditingWindow::Unlimited);
    }

    #[test]
    fn test_inspect_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("moodle.xml");
        fs::write(&input, BACKUP).unwrap();

        InspectService::execute(&input).unwrap();
        let files: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }
}
