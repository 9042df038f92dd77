//! Streaming path-matching parser for legacy backup documents
//!
//! Walks `moodle.xml` with a pull reader and hands each element registered
//! by a [`ModuleHandler`] to that handler as a flat [`FieldMap`]:
//! - leaf elements (text only) become lowercased fields of their parent
//! - attributes become fields of the element carrying them
//! - a registered element's data is dispatched once, when its first child
//!   leading to another registered path opens, or at its closing tag
//! - `/MOODLE_BACKUP/COURSE/MODULES/MOD` is renamed after its `MODTYPE`, so
//!   a journal module is seen at `.../MODULES/MOD/JOURNAL`

use crate::domain::paths::{find_path, leads_to_registered};
use crate::domain::{ConvertPath, FieldMap, ModuleHandler};
use crate::error::{ConvertError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace, warn};

const MODULES_MOD_PATH: &str = "/MOODLE_BACKUP/COURSE/MODULES/MOD";

#[derive(Debug)]
struct Frame {
    path: String,
    tag: String,
    fields: FieldMap,
    text: String,
    has_children: bool,
    dispatched: bool,
}

impl Frame {
    fn new(path: String, tag: String) -> Self {
        Frame {
            path,
            tag,
            fields: FieldMap::new(),
            text: String::new(),
            has_children: false,
            dispatched: false,
        }
    }
}

/// Open and parse a legacy backup file.
pub fn parse_legacy_file(path: &Path, handler: &mut dyn ModuleHandler) -> Result<()> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConvertError::InputNotFound(path.to_path_buf())
        } else {
            ConvertError::Io(e)
        }
    })?;
    parse_legacy(BufReader::new(file), handler)
}

/// Parse a legacy backup document, delivering registered paths to `handler`.
pub fn parse_legacy<R: BufRead>(source: R, handler: &mut dyn ModuleHandler) -> Result<()> {
    let paths = handler.paths().to_vec();
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| parse_error(reader.buffer_position() as u64, e))?;

        let position = reader.buffer_position() as u64;
        match event {
            Event::Start(ref e) => {
                let frame = open_frame(&paths, &mut stack, e, position, handler)?;
                stack.push(frame);
            }
            Event::Empty(ref e) => {
                let frame = open_frame(&paths, &mut stack, e, position, handler)?;
                close_frame(&paths, &mut stack, frame, handler)?;
            }
            Event::Text(ref e) => {
                if let Some(top) = stack.last_mut() {
                    let text = e.unescape().map_err(|err| parse_error(position, err))?;
                    top.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                if let Some(frame) = stack.pop() {
                    close_frame(&paths, &mut stack, frame, handler)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::XmlParse {
            position: reader.buffer_position() as u64,
            message: format!("document ended inside <{}>", open.tag),
        });
    }

    Ok(())
}

fn parse_error(position: u64, e: impl std::fmt::Display) -> ConvertError {
    ConvertError::XmlParse {
        position,
        message: e.to_string(),
    }
}

fn open_frame(
    paths: &[ConvertPath],
    stack: &mut [Frame],
    e: &BytesStart,
    position: u64,
    handler: &mut dyn ModuleHandler,
) -> Result<Frame> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let parent_path = stack.last().map(|f| f.path.as_str()).unwrap_or("");
    let path = format!("{}/{}", parent_path, tag);

    if let Some(parent) = stack.last_mut() {
        parent.has_children = true;
        if !parent.dispatched && leads_to_registered(paths, &path) {
            if let Some(cp) = find_path(paths, &parent.path) {
                let data = std::mem::take(&mut parent.fields);
                parent.dispatched = true;
                dispatch(cp, data, handler)?;
            }
        }
    }

    let mut frame = Frame::new(path, tag);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| parse_error(position, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
        let value = attr.unescape_value().map_err(|err| parse_error(position, err))?;
        frame.fields.insert(key, value.to_string());
    }
    Ok(frame)
}

fn close_frame(
    paths: &[ConvertPath],
    stack: &mut [Frame],
    frame: Frame,
    handler: &mut dyn ModuleHandler,
) -> Result<()> {
    if let Some(cp) = find_path(paths, &frame.path) {
        if !frame.dispatched {
            dispatch(cp, frame.fields, handler)?;
        }
        return handler.on_end(cp.name);
    }

    let Some(parent) = stack.last_mut() else {
        return Ok(());
    };

    if frame.has_children {
        if !frame.fields.is_empty() {
            trace!(path = %frame.path, "skipping unregistered container");
        }
        return Ok(());
    }

    let name = frame.tag.to_lowercase();
    if !frame.fields.is_empty() {
        trace!(path = %frame.path, "dropping attributes of leaf element");
    }
    if parent.path == MODULES_MOD_PATH && name == "modtype" {
        parent.path = format!("{}/{}", MODULES_MOD_PATH, frame.text.trim().to_uppercase());
        debug!(path = %parent.path, "module path resolved");
        return Ok(());
    }

    if parent.dispatched {
        warn!(
            path = %parent.path,
            field = %name,
            "field after nested data was already delivered; dropping it"
        );
        return Ok(());
    }

    parent.fields.insert(name, frame.text);
    Ok(())
}

fn dispatch(cp: &ConvertPath, mut data: FieldMap, handler: &mut dyn ModuleHandler) -> Result<()> {
    handler.on_start(cp.name)?;
    cp.apply_renames(&mut data);
    let returned = handler.process(cp.name, data)?;
    trace!(path = cp.name, fields = returned.len(), "element processed");
    Ok(())
}
