//! Error types for journal-convert

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the converter
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("No course module found for {module} instance {instance}")]
    NoCourseModule { module: String, instance: u64 },

    #[error("Missing field '{field}' in <{element}>")]
    MissingField { element: String, field: String },

    #[error("Invalid value '{value}' for field '{field}' in <{element}>")]
    InvalidField {
        element: String,
        field: String,
        value: String,
    },

    #[error("XML parse error at byte {position}: {message}")]
    XmlParse { position: u64, message: String },

    #[error("XML write error: {0}")]
    XmlWrite(String),

    #[error("Unbalanced tag: expected </{expected}>, got </{found}>")]
    UnbalancedTag { expected: String, found: String },

    #[error("Writer closed with open tags: {0:?}")]
    UnclosedTags(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::InputNotFound(_) => 2,
            ConvertError::NoCourseModule { .. } => 3,
            ConvertError::XmlParse { .. } => 4,
            ConvertError::MissingField { .. } | ConvertError::InvalidField { .. } => 5,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            ConvertError::InputNotFound(path) => {
                format!(
                    "Input file not found: {}\n\n\
                    Suggestions:\n\
                    • Pass the moodle.xml extracted from the legacy backup archive\n\
                    • Check the path is relative to the current directory",
                    path.display()
                )
            }
            ConvertError::NoCourseModule { module, instance } => {
                format!(
                    "No course module found for {} instance {}\n\n\
                    Suggestions:\n\
                    • Check that the backup contains the course sections (SECTIONS/SECTION/MODS)\n\
                    • Check that the module was included in the backup\n\
                    • Run 'journal-convert inspect <file>' to list the journals the backup knows about",
                    module, instance
                )
            }
            ConvertError::XmlParse { .. } => {
                format!(
                    "{}\n\n\
                    The legacy backup is not well-formed XML; re-export it or repair the file.",
                    self
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using ConvertError
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = ConvertError::NoCourseModule {
            module: "journal".to_string(),
            instance: 42,
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            ConvertError::InputNotFound(PathBuf::from("x.xml")).exit_code(),
            2
        );
        assert_eq!(ConvertError::Config("bad".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_no_course_module_suggestions() {
        let err = ConvertError::NoCourseModule {
            module: "journal".to_string(),
            instance: 42,
        };
        let msg = err.display_with_suggestions();
        assert!(msg.contains("instance 42"));
        assert!(msg.contains("journal-convert inspect"));
        assert!(msg.contains("Suggestions"));
    }

    #[test]
    fn test_xml_parse_suggestion() {
        let err = ConvertError::XmlParse {
            position: 17,
            message: "unexpected end".to_string(),
        };
        let msg = err.display_with_suggestions();
        assert!(msg.contains("byte 17"));
        assert!(msg.contains("not well-formed"));
    }

    #[test]
    fn test_other_errors_fallback() {
        let err = ConvertError::UnclosedTags(vec!["activity".to_string()]);
        assert_eq!(
            err.display_with_suggestions(),
            "Writer closed with open tags: [\"activity\"]"
        );
    }
}
