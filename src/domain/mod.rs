//! Domain layer - Backup model and conversion rules

pub mod availability;
pub mod events;
pub mod fields;
pub mod handler;
pub mod journal;
pub mod outline;
pub mod paths;

pub use availability::{needs_regrade, EditingWindow, WindowStatus};
pub use events::{Crud, EduLevel, EventDescriptor, EventRecord, JournalEvent};
pub use fields::FieldMap;
pub use handler::ModuleHandler;
pub use journal::{JournalSummary, MODULE_NAME};
pub use outline::{CourseModule, CourseOutline, OutlineCollector, Section};
pub use paths::ConvertPath;
