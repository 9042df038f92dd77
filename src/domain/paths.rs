//! Declarations of the legacy element paths a handler converts

use super::FieldMap;

/// One legacy element path a handler wants delivered, plus the field
/// renames to apply before the handler sees the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertPath {
    pub name: &'static str,
    pub path: &'static str,
    pub renames: Vec<(&'static str, &'static str)>,
}

impl ConvertPath {
    pub fn new(name: &'static str, path: &'static str) -> Self {
        ConvertPath {
            name,
            path,
            renames: Vec::new(),
        }
    }

    pub fn with_rename(mut self, from: &'static str, to: &'static str) -> Self {
        self.renames.push((from, to));
        self
    }

    /// Apply this path's renames to a flattened element.
    pub fn apply_renames(&self, data: &mut FieldMap) {
        for (from, to) in &self.renames {
            data.rename(from, to);
        }
    }
}

/// True when `path` is a registered path or lies on the way to one.
pub fn leads_to_registered(paths: &[ConvertPath], path: &str) -> bool {
    paths.iter().any(|p| {
        p.path == path
            || (p.path.starts_with(path) && p.path.as_bytes().get(path.len()) == Some(&b'/'))
    })
}

pub fn find_path<'a>(paths: &'a [ConvertPath], path: &str) -> Option<&'a ConvertPath> {
    paths.iter().find(|p| p.path == path)
}
