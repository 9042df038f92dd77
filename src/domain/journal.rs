//! Journal activity model

use super::EditingWindow;

/// Module type label of the journal activity
pub const MODULE_NAME: &str = "journal";

/// What a legacy backup holds for one journal instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalSummary {
    pub instance_id: u64,
    pub course_module_id: Option<u64>,
    pub name: String,
    pub entries: usize,
    /// Entries edited since they were last marked
    pub regrade_pending: usize,
    pub window: EditingWindow,
}

impl JournalSummary {
    pub fn new(instance_id: u64, name: String) -> Self {
        JournalSummary {
            instance_id,
            course_module_id: None,
            name,
            entries: 0,
            regrade_pending: 0,
            window: EditingWindow::Unlimited,
        }
    }
}
