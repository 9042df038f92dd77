//! Course structure collected from a legacy backup
//!
//! The legacy format lists course modules under the course sections, apart
//! from the module data itself. Converters need that listing to map an
//! activity instance back to its course module.

use super::{ConvertPath, FieldMap, ModuleHandler};
use crate::error::Result;
use tracing::debug;

pub const HEADER_PATH: &str = "/MOODLE_BACKUP/COURSE/HEADER";
pub const SECTION_PATH: &str = "/MOODLE_BACKUP/COURSE/SECTIONS/SECTION";
pub const SECTION_MOD_PATH: &str = "/MOODLE_BACKUP/COURSE/SECTIONS/SECTION/MODS/MOD";

/// A course module: the platform's link between an activity instance and
/// its place in the course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseModule {
    pub id: u64,
    pub module_type: String,
    pub instance: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: u64,
    pub number: i64,
    pub modules: Vec<CourseModule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseOutline {
    /// Course format, e.g. `weeks` or `topics`
    pub format: String,
    /// Course start as unix seconds
    pub start_date: i64,
    pub sections: Vec<Section>,
}

impl CourseOutline {
    /// Find the course module for an activity instance, with the number of
    /// the section holding it.
    pub fn find_module(&self, module_type: &str, instance: u64) -> Option<(&CourseModule, i64)> {
        self.sections.iter().find_map(|section| {
            section
                .modules
                .iter()
                .find(|m| m.module_type == module_type && m.instance == instance)
                .map(|m| (m, section.number))
        })
    }

    pub fn module_count(&self) -> usize {
        self.sections.iter().map(|s| s.modules.len()).sum()
    }
}

/// Builds a [`CourseOutline`] from the header and section paths.
pub struct OutlineCollector {
    paths: Vec<ConvertPath>,
    outline: CourseOutline,
}

impl OutlineCollector {
    pub fn new() -> Self {
        OutlineCollector {
            paths: vec![
                ConvertPath::new("header", HEADER_PATH),
                ConvertPath::new("section", SECTION_PATH),
                ConvertPath::new("section_mod", SECTION_MOD_PATH),
            ],
            outline: CourseOutline::default(),
        }
    }

    pub fn into_outline(self) -> CourseOutline {
        self.outline
    }
}

impl Default for OutlineCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleHandler for OutlineCollector {
    fn paths(&self) -> &[ConvertPath] {
        &self.paths
    }

    fn process(&mut self, name: &str, data: FieldMap) -> Result<FieldMap> {
        match name {
            "header" => {
                self.outline.format = data.get("format").unwrap_or_default().to_string();
                self.outline.start_date = data.get_i64("startdate").unwrap_or(0);
            }
            "section" => {
                self.outline.sections.push(Section {
                    id: data.require_u64("section", "id")?,
                    number: data.get_i64("number").unwrap_or(0),
                    modules: Vec::new(),
                });
            }
            "section_mod" => {
                let module = CourseModule {
                    id: data.require_u64("mod", "id")?,
                    module_type: data.get("type").unwrap_or_default().to_string(),
                    instance: data.require_u64("mod", "instance")?,
                };
                debug!(
                    cmid = module.id,
                    module = %module.module_type,
                    instance = module.instance,
                    "course module"
                );
                // MODS only appear inside a SECTION, whose data is dispatched first.
                if let Some(section) = self.outline.sections.last_mut() {
                    section.modules.push(module);
                }
            }
            _ => {}
        }
        Ok(data)
    }
}
