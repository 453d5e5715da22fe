use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use super::SensorType;

/// Source text a diagnostic points into
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub file_path: PathBuf,
    pub content: String,
}

/// A diagnostic message that can be either a warning or an error
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    Warning(Warning),
    Error(Error),
}

/// Problems the normalizer repaired. The resulting config is still usable.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A retired option that has no effect any more and was dropped
    DeprecatedKey { key: String },

    /// A legacy key whose value was carried over to its replacement
    LegacyKeyMigrated { from: String, to: String },

    /// A value of the wrong type or out of range, replaced by the default
    InvalidValue { field: String, message: String },

    /// A `sensors` entry naming a sensor the card does not know
    UnknownSensor { name: String },

    /// A `sensors` entry repeating a sensor already listed
    DuplicateSensor { sensor: SensorType },

    /// Every sensor was disabled, so all of them were enabled again
    NoSensorsEnabled,
}

/// Problems that prevent a config from being used
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Parse(ParseError),
    Invalid { message: String },
}

/// A config file that could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Option<Range<usize>>,
    pub source: SourceInfo,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to parse '{}': {}",
            self.source.file_path.display(),
            self.message
        )
    }
}

impl Diagnostic {
    /// Returns true if this diagnostic is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Diagnostic::Error(_))
    }

    /// Returns true if this diagnostic is a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, Diagnostic::Warning(_))
    }

    pub(crate) fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic::Warning(Warning::InvalidValue {
            field: field.into(),
            message: message.into(),
        })
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DeprecatedKey { key } => {
                write!(f, "option '{}' is no longer supported and was ignored", key)
            }
            Warning::LegacyKeyMigrated { from, to } => {
                write!(f, "option '{}' was renamed to '{}'", from, to)
            }
            Warning::InvalidValue { field, message } => {
                write!(f, "invalid value for '{}': {}, using the default", field, message)
            }
            Warning::UnknownSensor { name } => {
                write!(f, "unknown sensor '{}' in 'sensors' was ignored", name)
            }
            Warning::DuplicateSensor { sensor } => {
                write!(f, "sensor '{}' is listed more than once, keeping the first", sensor)
            }
            Warning::NoSensorsEnabled => {
                f.write_str("no sensors were enabled, showing all of them")
            }
        }
    }
}

/// Format all diagnostics for display using Ariadne
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

    let mut output = Vec::new();

    for diagnostic in diagnostics {
        match diagnostic {
            Diagnostic::Warning(warning) => {
                output.extend_from_slice(format!("Warning: {}\n", warning).as_bytes());
            }
            Diagnostic::Error(Error::Invalid { message }) => {
                output.extend_from_slice(format!("Error: {}\n", message).as_bytes());
            }
            Diagnostic::Error(Error::Parse(parse_error)) => {
                let file_id = parse_error.source.file_path.to_string_lossy().to_string();

                let Some(span) = parse_error.span.clone() else {
                    let error_msg = format!(
                        "Error: failed to parse '{}': {}\n",
                        file_id, parse_error.message
                    );
                    output.extend_from_slice(error_msg.as_bytes());
                    continue;
                };

                // Spans from serde_json and toml are byte offsets.
                let report = Report::build(ReportKind::Error, (file_id.clone(), span.clone()))
                    .with_config(Config::default().with_index_type(IndexType::Byte))
                    .with_message(format!("Failed to parse '{}'", file_id))
                    .with_label(
                        Label::new((file_id.clone(), span))
                            .with_message(&parse_error.message)
                            .with_color(Color::Red),
                    )
                    .finish();

                report
                    .write(
                        (file_id, Source::from(&parse_error.source.content)),
                        &mut output,
                    )
                    .ok();
            }
        }
    }

    String::from_utf8_lossy(&output).to_string()
}
