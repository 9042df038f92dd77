//! Configuration management

use crate::error::{ConvertError, Result};
use crate::infrastructure::WriterOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the config file picked up from the working directory
pub const CONFIG_FILE_NAME: &str = "journal-convert.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spaces per nesting level in the output; 0 writes compact XML
    pub indent: usize,
    /// Prefix each output file with an XML declaration
    pub xml_declaration: bool,
    /// First context id handed out to converted modules
    pub first_context_id: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            indent: 0,
            xml_declaration: false,
            first_context_id: 1,
        }
    }
}

impl Config {
    /// Load config from an explicit file; the file must exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConvertError::Config(format!("Config file not found: {}", path.display()))
            } else {
                ConvertError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `journal-convert.toml` from `dir` if present, defaults otherwise.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load_from_file(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Explicit file wins; otherwise look in the current directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => Self::load_from_dir(&std::env::current_dir()?),
        }
    }

    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            indent: self.indent,
            xml_declaration: self.xml_declaration,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.first_context_id == 0 {
            return Err(ConvertError::Config(
                "first_context_id must be greater than 0".to_string(),
            ));
        }
        if self.indent > 16 {
            return Err(ConvertError::Config(format!(
                "indent must be between 0 and 16, got {}",
                self.indent
            )));
        }
        Ok(())
    }
}
