//! Infrastructure layer - XML I/O, context resolution and configuration

pub mod config;
pub mod context;
pub mod legacy_parser;
pub mod xml_writer;

pub use config::Config;
pub use context::{ContextRegistry, ContextResolver, ModuleContext, OutlineResolver};
pub use legacy_parser::{parse_legacy, parse_legacy_file};
pub use xml_writer::{write_record, DirectoryTarget, OutputTarget, WriterOptions, XmlWriter};
