//! Legacy journal conversion handler
//!
//! Rewrites a legacy `MOD/JOURNAL` subtree as
//! `activities/journal_<cmid>/journal.xml`:
//!
//! ```text
//! <activity id=.. moduleid=.. modulename="journal" contextid=..>
//!   <journal id=..> fields.. <entries> <entry>..</entry>* </entries> </journal>
//! </activity>
//! ```
//!
//! Callbacks are trusted to arrive in document order; the handler does not
//! check transitions itself.

use crate::domain::{ConvertPath, EventRecord, FieldMap, JournalEvent, ModuleHandler, MODULE_NAME};
use crate::error::{ConvertError, Result};
use crate::infrastructure::{write_record, ContextResolver, OutputTarget, WriterOptions, XmlWriter};
use tracing::{debug, info, warn};

pub const JOURNAL_PATH: &str = "/MOODLE_BACKUP/COURSE/MODULES/MOD/JOURNAL";
pub const ENTRIES_PATH: &str = "/MOODLE_BACKUP/COURSE/MODULES/MOD/JOURNAL/ENTRIES";
pub const ENTRY_PATH: &str = "/MOODLE_BACKUP/COURSE/MODULES/MOD/JOURNAL/ENTRIES/ENTRY";

/// Entry ids are reassigned on import, so they are not carried over.
const ENTRY_EXCLUDED: [&str; 1] = ["/entry/id"];

/// The legacy paths of a journal module, with the `assessed` -> `grade` rename.
pub fn journal_paths() -> Vec<ConvertPath> {
    vec![
        ConvertPath::new("journal", JOURNAL_PATH).with_rename("assessed", "grade"),
        ConvertPath::new("entries", ENTRIES_PATH),
        ConvertPath::new("entry", ENTRY_PATH),
    ]
}

/// Outcome for one converted journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedJournal {
    pub instance_id: u64,
    pub course_module_id: u64,
    pub context_id: u64,
    pub entries: usize,
    /// Relative to the output root
    pub output: String,
    /// One `entry_created` per converted entry carrying a user and an id
    pub events: Vec<EventRecord>,
}

struct OpenJournal<W: std::io::Write> {
    writer: XmlWriter<W>,
    record: ConvertedJournal,
}

pub struct JournalHandler<R: ContextResolver, T: OutputTarget> {
    paths: Vec<ConvertPath>,
    resolver: R,
    target: T,
    options: WriterOptions,
    current: Option<OpenJournal<T::Sink>>,
    converted: Vec<ConvertedJournal>,
}

impl<R: ContextResolver, T: OutputTarget> JournalHandler<R, T> {
    pub fn new(resolver: R, target: T, options: WriterOptions) -> Self {
        JournalHandler {
            paths: journal_paths(),
            resolver,
            target,
            options,
            current: None,
            converted: Vec::new(),
        }
    }

    /// Journals whose files were completed, in document order
    pub fn converted(&self) -> &[ConvertedJournal] {
        &self.converted
    }

    pub fn into_converted(self) -> Vec<ConvertedJournal> {
        self.converted
    }

    fn open_journal(&mut self) -> Result<&mut OpenJournal<T::Sink>> {
        self.current
            .as_mut()
            .ok_or_else(|| ConvertError::XmlWrite("no journal file is open".to_string()))
    }

    fn process_journal(&mut self, mut data: FieldMap) -> Result<FieldMap> {
        let instance_id = data.require_u64("journal", "id")?;

        // Resolve first: an unknown instance must not leave a file behind.
        let ctx = self.resolver.resolve(MODULE_NAME, instance_id)?;

        let output = format!("activities/journal_{}/journal.xml", ctx.course_module_id);
        let sink = self.target.create(&output)?;
        let mut writer = XmlWriter::new(sink, self.options)?;

        let id = instance_id.to_string();
        let module_id = ctx.course_module_id.to_string();
        let context_id = ctx.context_id.to_string();
        writer.begin_tag(
            "activity",
            &[
                ("id", id.as_str()),
                ("moduleid", module_id.as_str()),
                ("modulename", MODULE_NAME),
                ("contextid", context_id.as_str()),
            ],
        )?;
        writer.begin_tag("journal", &[("id", id.as_str())])?;

        data.remove("id");
        for (field, value) in data.iter() {
            writer.full_tag(field, value)?;
        }

        debug!(instance = instance_id, output = %output, "journal opened");
        let previous = self.current.replace(OpenJournal {
            writer,
            record: ConvertedJournal {
                instance_id,
                course_module_id: ctx.course_module_id,
                context_id: ctx.context_id,
                entries: 0,
                output,
                events: Vec::new(),
            },
        });
        if let Some(previous) = previous {
            warn!(
                instance = previous.record.instance_id,
                "journal started before the previous one ended; its file is left incomplete"
            );
        }

        Ok(data)
    }

    fn close_journal(&mut self) -> Result<()> {
        let mut open = self
            .current
            .take()
            .ok_or_else(|| ConvertError::XmlWrite("no journal file is open".to_string()))?;
        open.writer.end_tag("journal")?;
        open.writer.end_tag("activity")?;
        open.writer.close()?;

        info!(
            instance = open.record.instance_id,
            cmid = open.record.course_module_id,
            entries = open.record.entries,
            "journal converted"
        );
        self.converted.push(open.record);
        Ok(())
    }
}

impl<R: ContextResolver, T: OutputTarget> ModuleHandler for JournalHandler<R, T> {
    fn paths(&self) -> &[ConvertPath] {
        &self.paths
    }

    fn on_start(&mut self, name: &str) -> Result<()> {
        if name == "entries" {
            self.open_journal()?.writer.begin_tag("entries", &[])?;
        }
        Ok(())
    }

    fn process(&mut self, name: &str, data: FieldMap) -> Result<FieldMap> {
        match name {
            "journal" => self.process_journal(data),
            "entry" => {
                let open = self.open_journal()?;
                write_record(&mut open.writer, "entry", &data, &ENTRY_EXCLUDED)?;
                open.record.entries += 1;

                if let (Some(user_id), Some(entry_id)) = (data.get_u64("userid"), data.get_u64("id")) {
                    let event = EventRecord::new(
                        JournalEvent::EntryCreated,
                        user_id,
                        open.record.course_module_id,
                        entry_id,
                    );
                    debug!(event = %event.event, url = %event.url(), "{}", event.description());
                    open.record.events.push(event);
                }
                Ok(data)
            }
            _ => Ok(data),
        }
    }

    fn on_end(&mut self, name: &str) -> Result<()> {
        match name {
            "entries" => self.open_journal()?.writer.end_tag("entries"),
            "journal" => self.close_journal(),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{parse_legacy, DirectoryTarget, ModuleContext};
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Resolver with a fixed instance -> context table
    struct StaticResolver(HashMap<u64, ModuleContext>);

    impl StaticResolver {
        fn single(instance: u64, course_module_id: u64, context_id: u64) -> Self {
            let mut map = HashMap::new();
            map.insert(
                instance,
                ModuleContext {
                    course_module_id,
                    context_id,
                },
            );
            StaticResolver(map)
        }
    }

    impl ContextResolver for StaticResolver {
        fn resolve(&mut self, module_name: &str, instance_id: u64) -> Result<ModuleContext> {
            self.0
                .get(&instance_id)
                .copied()
                .ok_or_else(|| ConvertError::NoCourseModule {
                    module: module_name.to_string(),
                    instance: instance_id,
                })
        }
    }

    fn handler(
        resolver: StaticResolver,
        root: &Path,
    ) -> JournalHandler<StaticResolver, DirectoryTarget> {
        JournalHandler::new(
            resolver,
            DirectoryTarget::new(root.to_path_buf()),
            WriterOptions::default(),
        )
    }

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs.iter().copied().collect()
    }

    fn read(root: &Path, relative: &str) -> String {
        fs::read_to_string(root.join(relative)).unwrap()
    }

    /// Drive the callbacks the way the parser does for a journal with entries.
    fn run_journal(
        h: &mut JournalHandler<StaticResolver, DirectoryTarget>,
        journal: FieldMap,
        entries: &[FieldMap],
    ) -> Result<()> {
        let paths = journal_paths();
        h.on_start("journal")?;
        let mut journal = journal;
        paths[0].apply_renames(&mut journal);
        h.process("journal", journal)?;
        h.on_start("entries")?;
        h.process("entries", FieldMap::new())?;
        for entry in entries {
            h.on_start("entry")?;
            h.process("entry", entry.clone())?;
            h.on_end("entry")?;
        }
        h.on_end("entries")?;
        h.on_end("journal")
    }

    #[test]
    fn test_declared_paths() {
        let paths = journal_paths();
        let names: Vec<_> = paths.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["journal", "entries", "entry"]);
        assert_eq!(paths[0].renames, vec![("assessed", "grade")]);
        assert!(paths[1].renames.is_empty());
        assert!(paths[2].renames.is_empty());
    }

    #[test]
    fn test_journal_header_scenario() {
        let temp = TempDir::new().unwrap();
        let mut h = handler(StaticResolver::single(5, 12, 99), temp.path());

        run_journal(
            &mut h,
            fields(&[("id", "5"), ("assessed", "2"), ("intro", "hello")]),
            &[],
        )
        .unwrap();

        let out = read(temp.path(), "activities/journal_12/journal.xml");
        assert!(out.starts_with(
            "<activity id=\"5\" moduleid=\"12\" modulename=\"journal\" contextid=\"99\">\
             <journal id=\"5\"><grade>2</grade><intro>hello</intro>"
        ));
        assert!(!out.contains("assessed"));
        assert!(out.ends_with("<entries></entries></journal></activity>"));
    }

    #[test]
    fn test_entry_scenario() {
        let temp = TempDir::new().unwrap();
        let mut h = handler(StaticResolver::single(5, 12, 99), temp.path());

        run_journal(
            &mut h,
            fields(&[("id", "5")]),
            &[fields(&[("id", "77"), ("userid", "3"), ("text", "note")])],
        )
        .unwrap();

        let out = read(temp.path(), "activities/journal_12/journal.xml");
        assert!(out.contains("<entries><entry><userid>3</userid><text>note</text></entry></entries>"));
        assert!(!out.contains("<id>"));
    }

    #[test]
    fn test_entries_keep_input_order() {
        let temp = TempDir::new().unwrap();
        let mut h = handler(StaticResolver::single(5, 12, 99), temp.path());

        let entries: Vec<FieldMap> = ["30", "10", "20"]
            .iter()
            .map(|user| fields(&[("id", "1"), ("userid", user)]))
            .collect();
        run_journal(&mut h, fields(&[("id", "5")]), &entries).unwrap();

        let out = read(temp.path(), "activities/journal_12/journal.xml");
        let p30 = out.find("<userid>30</userid>").unwrap();
        let p10 = out.find("<userid>10</userid>").unwrap();
        let p20 = out.find("<userid>20</userid>").unwrap();
        assert!(p30 < p10 && p10 < p20);
        assert_eq!(out.matches("<entry>").count(), 3);

        assert_eq!(
            h.converted(),
            &[ConvertedJournal {
                instance_id: 5,
                course_module_id: 12,
                context_id: 99,
                entries: 3,
                output: "activities/journal_12/journal.xml".to_string(),
                events: ["30", "10", "20"]
                    .iter()
                    .map(|user| EventRecord::new(
                        JournalEvent::EntryCreated,
                        user.parse().unwrap(),
                        12,
                        1
                    ))
                    .collect(),
            }]
        );
    }

    #[test]
    fn test_entry_events() {
        let temp = TempDir::new().unwrap();
        let mut h = handler(StaticResolver::single(5, 12, 99), temp.path());

        run_journal(
            &mut h,
            fields(&[("id", "5")]),
            &[
                fields(&[("id", "77"), ("userid", "3"), ("text", "note")]),
                fields(&[("id", "78"), ("text", "no author")]),
            ],
        )
        .unwrap();

        let converted = &h.converted()[0];
        assert_eq!(converted.entries, 2);
        assert_eq!(
            converted.events,
            vec![EventRecord::new(JournalEvent::EntryCreated, 3, 12, 77)]
        );
        assert_eq!(converted.events[0].url(), "/mod/journal/edit.php?id=12");
    }

    #[test]
    fn test_process_returns_data_without_id() {
        let temp = TempDir::new().unwrap();
        let mut h = handler(StaticResolver::single(5, 12, 99), temp.path());

        let returned = h
            .process("journal", fields(&[("id", "5"), ("name", "Diary")]))
            .unwrap();
        assert_eq!(returned, fields(&[("name", "Diary")]));
    }

    #[test]
    fn test_unresolvable_instance_creates_no_file() {
        let temp = TempDir::new().unwrap();
        let mut h = handler(StaticResolver::single(5, 12, 99), temp.path());

        let result = h.process("journal", fields(&[("id", "42"), ("name", "x")]));
        match result {
            Err(ConvertError::NoCourseModule { instance, .. }) => assert_eq!(instance, 42),
            other => panic!("Expected NoCourseModule, got {:?}", other),
        }
        assert!(!temp.path().join("activities").exists());
        assert!(h.converted().is_empty());
    }

    #[test]
    fn test_missing_id_is_error() {
        let temp = TempDir::new().unwrap();
        let mut h = handler(StaticResolver::single(5, 12, 99), temp.path());

        assert!(matches!(
            h.process("journal", fields(&[("name", "x")])),
            Err(ConvertError::MissingField { .. })
        ));
    }

    #[test]
    fn test_entry_without_open_journal_is_error() {
        let temp = TempDir::new().unwrap();
        let mut h = handler(StaticResolver::single(5, 12, 99), temp.path());

        assert!(h.process("entry", fields(&[("userid", "3")])).is_err());
        assert!(h.on_end("journal").is_err());
    }

    #[test]
    fn test_converting_twice_is_byte_identical() {
        let doc = "<MOODLE_BACKUP><COURSE><MODULES><MOD><ID>5</ID><MODTYPE>journal</MODTYPE>\
                   <NAME>Diary</NAME><INTRO>&lt;p&gt;hi&lt;/p&gt;</INTRO><ASSESSED>2</ASSESSED>\
                   <ENTRIES><ENTRY><ID>77</ID><USERID>3</USERID><TEXT>a &amp; b</TEXT></ENTRY>\
                   </ENTRIES></MOD></MODULES></COURSE></MOODLE_BACKUP>";

        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        for dir in [&first, &second] {
            let mut h = handler(StaticResolver::single(5, 12, 99), dir.path());
            parse_legacy(doc.as_bytes(), &mut h).unwrap();
        }

        let a = fs::read(first.path().join("activities/journal_12/journal.xml")).unwrap();
        let b = fs::read(second.path().join("activities/journal_12/journal.xml")).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            String::from_utf8(a).unwrap(),
            "<activity id=\"5\" moduleid=\"12\" modulename=\"journal\" contextid=\"99\">\
             <journal id=\"5\"><name>Diary</name><intro>&lt;p&gt;hi&lt;/p&gt;</intro><grade>2</grade>\
             <entries><entry><userid>3</userid><text>a &amp; b</text></entry></entries>\
             </journal></activity>"
        );
    }
}
