use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;

use super::diagnostics::Diagnostic;
use super::diagnostics::Error;
use super::diagnostics::ParseError;
use super::diagnostics::SourceInfo;

/// Error type for config loading failures (parse errors, IO errors, etc.)
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{}': {error}", path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("{0}")]
    Parse(ParseError),

    #[error("Unsupported config format '{}', expected a .json or .toml file", path.display())]
    UnsupportedFormat { path: PathBuf },
}

impl LoadError {
    /// Parse failures become diagnostics so they can be rendered against their source.
    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            LoadError::Parse(parse_error) => Diagnostic::Error(Error::Parse(parse_error)),
            other => Diagnostic::Error(Error::Invalid {
                message: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Read a raw card config from a `.json` or `.toml` file.
///
/// The result is the untyped config object, ready for [`super::normalize`].
pub fn load_raw_config(path: &Path) -> Result<Value, LoadError> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = std::fs::read_to_string(path).map_err(|error| LoadError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    parse_raw_config(content, format, path)
}

/// Parse config text. `path` is only used for error reporting.
pub fn parse_raw_config(
    content: String,
    format: ConfigFormat,
    path: &Path,
) -> Result<Value, LoadError> {
    let source = |content: String| SourceInfo {
        file_path: path.to_path_buf(),
        content,
    };

    match format {
        ConfigFormat::Json => match serde_json::from_str::<Value>(&content) {
            Ok(value) => Ok(value),
            Err(error) => {
                let span = json_error_span(&content, error.line(), error.column());
                Err(LoadError::Parse(ParseError {
                    message: error.to_string(),
                    span,
                    source: source(content),
                }))
            }
        },
        ConfigFormat::Toml => {
            let table = match toml::from_str::<toml::Table>(&content) {
                Ok(table) => table,
                Err(error) => {
                    return Err(LoadError::Parse(ParseError {
                        message: error.message().to_string(),
                        span: error.span(),
                        source: source(content),
                    }))
                }
            };

            serde_json::to_value(table).map_err(|error| {
                LoadError::Parse(ParseError {
                    message: error.to_string(),
                    span: None,
                    source: source(content),
                })
            })
        }
    }
}

/// Byte span of a serde_json error position (1-based line and column).
fn json_error_span(content: &str, line: usize, column: usize) -> Option<std::ops::Range<usize>> {
    if line == 0 || content.is_empty() {
        return None;
    }

    let line_start: usize = content
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let offset = (line_start + column.saturating_sub(1)).min(content.len() - 1);
    Some(offset..offset + 1)
}
