//! Journal event catalogue
//!
//! Each event carries fixed metadata that logging and analytics consumers
//! use to classify it. Dispatching the events is up to the host.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Create/read/update/delete classification of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Crud {
    #[serde(rename = "c")]
    Create,
    #[serde(rename = "r")]
    Read,
    #[serde(rename = "u")]
    Update,
    #[serde(rename = "d")]
    Delete,
}

impl Crud {
    pub fn as_char(&self) -> char {
        match self {
            Crud::Create => 'c',
            Crud::Read => 'r',
            Crud::Update => 'u',
            Crud::Delete => 'd',
        }
    }
}

/// Educational level of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EduLevel {
    Other,
    Teaching,
    Participating,
}

impl EduLevel {
    /// Numeric level as stored by the host's log store
    pub fn code(&self) -> u8 {
        match self {
            EduLevel::Other => 0,
            EduLevel::Teaching => 1,
            EduLevel::Participating => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventDescriptor {
    pub name: &'static str,
    pub title: &'static str,
    pub crud: Crud,
    pub edu_level: EduLevel,
    pub object_table: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalEvent {
    EntryCreated,
    CourseModuleViewed,
}

impl JournalEvent {
    pub const ALL: [JournalEvent; 2] = [JournalEvent::EntryCreated, JournalEvent::CourseModuleViewed];

    pub fn descriptor(&self) -> EventDescriptor {
        match self {
            JournalEvent::EntryCreated => EventDescriptor {
                name: "entry_created",
                title: "Journal entry created",
                crud: Crud::Create,
                edu_level: EduLevel::Participating,
                object_table: "journal",
            },
            JournalEvent::CourseModuleViewed => EventDescriptor {
                name: "course_module_viewed",
                title: "Course module viewed",
                crud: Crud::Read,
                edu_level: EduLevel::Participating,
                object_table: "journal",
            },
        }
    }
}

impl fmt::Display for JournalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().name)
    }
}

impl FromStr for JournalEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JournalEvent::ALL
            .into_iter()
            .find(|e| e.descriptor().name == s)
            .ok_or_else(|| format!("Unknown event: '{}'", s))
    }
}

/// One occurrence of an event, ready to hand to a logging collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub event: JournalEvent,
    pub user_id: u64,
    /// Course module id of the journal
    pub context_instance_id: u64,
    pub object_id: u64,
}

impl EventRecord {
    pub fn new(event: JournalEvent, user_id: u64, context_instance_id: u64, object_id: u64) -> Self {
        EventRecord {
            event,
            user_id,
            context_instance_id,
            object_id,
        }
    }

    pub fn description(&self) -> String {
        match self.event {
            JournalEvent::EntryCreated => format!(
                "The user with id '{}' has created an entry for the journal activity with the course module id '{}'",
                self.user_id, self.context_instance_id
            ),
            JournalEvent::CourseModuleViewed => format!(
                "The user with id '{}' viewed the journal activity with the course module id '{}'",
                self.user_id, self.context_instance_id
            ),
        }
    }

    /// Relative URL of the page the event relates to
    pub fn url(&self) -> String {
        let page = match self.event {
            JournalEvent::EntryCreated => "edit.php",
            JournalEvent::CourseModuleViewed => "view.php",
        };
        format!("/mod/journal/{}?id={}", page, self.context_instance_id)
    }
}
