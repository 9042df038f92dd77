//! Callback interface between the legacy path parser and converters

use super::{ConvertPath, FieldMap};
use crate::error::Result;

/// A converter for one slice of the legacy backup tree.
///
/// The parser calls these by the `name` of the matched [`ConvertPath`], in
/// document order: `on_start`, then `process` once with the flattened data
/// (renames already applied), then `on_end` at the closing tag.
pub trait ModuleHandler {
    /// Paths this handler wants delivered.
    fn paths(&self) -> &[ConvertPath];

    fn on_start(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    /// Handle one flattened element. The returned map is handed back to the
    /// parser for any later consumer.
    fn process(&mut self, name: &str, data: FieldMap) -> Result<FieldMap>;

    fn on_end(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}
