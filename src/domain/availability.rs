//! Editing window rules for journal entries

use chrono::{DateTime, Utc};

const SECONDS_PER_WEEK: i64 = 604_800;
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStatus {
    NotOpen,
    Open,
    Closed,
}

/// When students may edit their entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingWindow {
    Unlimited,
    /// Unix seconds
    Limited { opens: i64, closes: i64 },
}

impl EditingWindow {
    /// Only weekly courses with a day limit restrict editing. The window
    /// starts with the section's week and lasts `days` days.
    ///
    /// Values too large to express as a timestamp give no limit.
    pub fn compute(course_format: &str, course_start: i64, section: i64, days: i64) -> Self {
        if course_format != "weeks" || days <= 0 {
            return EditingWindow::Unlimited;
        }
        let opens = section
            .checked_sub(1)
            .and_then(|weeks| weeks.checked_mul(SECONDS_PER_WEEK))
            .and_then(|offset| course_start.checked_add(offset));
        let closes = opens.and_then(|opens| {
            days.checked_mul(SECONDS_PER_DAY)
                .and_then(|length| opens.checked_add(length))
        });
        match (opens, closes) {
            (Some(opens), Some(closes)) => EditingWindow::Limited { opens, closes },
            _ => EditingWindow::Unlimited,
        }
    }

    pub fn status(&self, now: i64) -> WindowStatus {
        match *self {
            EditingWindow::Unlimited => WindowStatus::Open,
            EditingWindow::Limited { opens, closes } => {
                if now <= opens {
                    WindowStatus::NotOpen
                } else if now < closes {
                    WindowStatus::Open
                } else {
                    WindowStatus::Closed
                }
            }
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            EditingWindow::Unlimited => "no time limit".to_string(),
            EditingWindow::Limited { opens, closes } => {
                format!("{} - {}", format_timestamp(opens), format_timestamp(closes))
            }
        }
    }

    /// Like [`describe`](Self::describe), noting when editing is not possible at `now`.
    pub fn describe_at(&self, now: i64) -> String {
        match self.status(now) {
            WindowStatus::Open => self.describe(),
            WindowStatus::NotOpen => format!("{}, not open yet", self.describe()),
            WindowStatus::Closed => format!("{}, editing ended", self.describe()),
        }
    }
}

fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%d-%m-%Y %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// An entry edited after it was last marked needs marking again.
pub fn needs_regrade(modified: Option<i64>, timemarked: Option<i64>) -> bool {
    match (modified, timemarked) {
        (Some(m), Some(t)) if m != 0 && t != 0 => m > t,
        _ => false,
    }
}
