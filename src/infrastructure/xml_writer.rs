//! New-format backup XML writer

use crate::domain::FieldMap;
use crate::error::{ConvertError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Output formatting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterOptions {
    /// Spaces per nesting level; 0 writes everything on one line
    pub indent: usize,
    pub xml_declaration: bool,
}

/// Tag-level XML writer that refuses to produce unbalanced output.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    open: Vec<String>,
}

fn write_error(e: impl std::fmt::Display) -> ConvertError {
    ConvertError::XmlWrite(e.to_string())
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W, options: WriterOptions) -> Result<Self> {
        let mut writer = if options.indent > 0 {
            Writer::new_with_indent(inner, b' ', options.indent)
        } else {
            Writer::new(inner)
        };

        if options.xml_declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(write_error)?;
        }

        Ok(XmlWriter {
            writer,
            open: Vec::new(),
        })
    }

    /// Open a structural element.
    pub fn begin_tag(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(write_error)?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// Close the innermost open element, which must be `name`.
    pub fn end_tag(&mut self, name: &str) -> Result<()> {
        match self.open.last() {
            Some(top) if top == name => {}
            Some(top) => {
                return Err(ConvertError::UnbalancedTag {
                    expected: top.clone(),
                    found: name.to_string(),
                })
            }
            None => {
                return Err(ConvertError::UnbalancedTag {
                    expected: String::new(),
                    found: name.to_string(),
                })
            }
        }
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(write_error)?;
        self.open.pop();
        Ok(())
    }

    /// Write a leaf element holding `value`, escaped.
    pub fn full_tag(&mut self, name: &str, value: &str) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(write_error)?;
        // Always emit the text event, even empty, so indentation never lands inside the value.
        self.writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(write_error)?;
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(write_error)?;
        Ok(())
    }

    /// Finish the document and hand back the sink, flushed.
    pub fn close(self) -> Result<W> {
        if !self.open.is_empty() {
            return Err(ConvertError::UnclosedTags(self.open));
        }
        let mut inner = self.writer.into_inner();
        inner.flush()?;
        Ok(inner)
    }
}

/// Write `fields` as children of a `<tag>` element.
///
/// Fields whose path `/<tag>/<field>` is listed in `excluded` are left out.
pub fn write_record<W: Write>(
    writer: &mut XmlWriter<W>,
    tag: &str,
    fields: &FieldMap,
    excluded: &[&str],
) -> Result<()> {
    writer.begin_tag(tag, &[])?;
    for (name, value) in fields.iter() {
        let path = format!("/{}/{}", tag, name);
        if excluded.contains(&path.as_str()) {
            continue;
        }
        writer.full_tag(name, value)?;
    }
    writer.end_tag(tag)
}

/// Where converted files go.
pub trait OutputTarget {
    type Sink: Write;

    /// Create (or truncate) the file at `relative` and return its sink.
    fn create(&self, relative: &str) -> Result<Self::Sink>;
}

/// Writes converted files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    root: PathBuf,
}

impl DirectoryTarget {
    pub fn new(root: PathBuf) -> Self {
        DirectoryTarget { root }
    }
}

impl OutputTarget for DirectoryTarget {
    type Sink = BufWriter<File>;

    fn create(&self, relative: &str) -> Result<Self::Sink> {
        let path = self.root.join(relative);

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(BufWriter::new(File::create(&path)?))
    }
}
