//! Course module and security context resolution

use crate::domain::CourseOutline;
use crate::error::{ConvertError, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Where an activity instance lives in the converted course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleContext {
    pub course_module_id: u64,
    pub context_id: u64,
}

/// Maps an activity instance to its course module and context.
pub trait ContextResolver {
    /// Fails with [`ConvertError::NoCourseModule`] when the instance has no course module.
    fn resolve(&mut self, module_name: &str, instance_id: u64) -> Result<ModuleContext>;
}

/// Allocates module context ids for the converted backup.
///
/// Ids are handed out in request order starting at `first_id`, and the same
/// course module always gets the same id.
#[derive(Debug, Clone)]
pub struct ContextRegistry {
    next_id: u64,
    assigned: BTreeMap<u64, u64>,
}

impl ContextRegistry {
    pub fn new(first_id: u64) -> Self {
        ContextRegistry {
            next_id: first_id,
            assigned: BTreeMap::new(),
        }
    }

    pub fn context_id(&mut self, course_module_id: u64) -> u64 {
        if let Some(id) = self.assigned.get(&course_module_id) {
            return *id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.assigned.insert(course_module_id, id);
        id
    }
}

/// Resolves instances through the course outline of the backup being converted.
#[derive(Debug, Clone)]
pub struct OutlineResolver {
    outline: CourseOutline,
    registry: ContextRegistry,
}

impl OutlineResolver {
    pub fn new(outline: CourseOutline, first_context_id: u64) -> Self {
        OutlineResolver {
            outline,
            registry: ContextRegistry::new(first_context_id),
        }
    }
}

impl ContextResolver for OutlineResolver {
    fn resolve(&mut self, module_name: &str, instance_id: u64) -> Result<ModuleContext> {
        let (cm, _section) = self
            .outline
            .find_module(module_name, instance_id)
            .ok_or_else(|| ConvertError::NoCourseModule {
                module: module_name.to_string(),
                instance: instance_id,
            })?;
        let course_module_id = cm.id;
        let context_id = self.registry.context_id(course_module_id);
        debug!(
            module = module_name,
            instance = instance_id,
            cmid = course_module_id,
            contextid = context_id,
            "resolved context"
        );
        Ok(ModuleContext {
            course_module_id,
            context_id,
        })
    }
}
