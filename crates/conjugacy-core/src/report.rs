//! Writing results.
//!
//! The plain format is three numbers with two decimals separated by single
//! spaces and no trailing newline: `"-18.00 6.72 -1.00"`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::engine::Conjugacy;
use crate::error::{InputFormatError, OutputWriteError};

/// `delta sigma conjugacy`, two decimals each.
pub fn format_plain(result: &Conjugacy) -> String {
    let (delta, sigma, conjugacy) = result.triple();
    format!("{delta:.2} {sigma:.2} {conjugacy:.2}")
}

/// Read a plain-format line back into `[delta, sigma, conjugacy]`.
pub fn parse_plain(text: &str) -> Result<[f64; 3], InputFormatError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(InputFormatError::ColumnCount {
            line: 1,
            found: fields.len(),
        });
    }
    let mut out = [0.0; 3];
    for (i, token) in fields.iter().enumerate() {
        out[i] = token
            .parse::<f64>()
            .map_err(|_| InputFormatError::InvalidNumber {
                line: 1,
                column: i + 1,
                token: token.to_string(),
            })?;
    }
    Ok(out)
}

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" | "text" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a Conjugacy,
    formatted: String,
}

/// Encode a result in the given format.
pub fn render(result: &Conjugacy, format: OutputFormat) -> Result<String, OutputWriteError> {
    match format {
        OutputFormat::Plain => Ok(format_plain(result)),
        OutputFormat::Json => {
            let report = JsonReport {
                result,
                formatted: format_plain(result),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Where finished results go.
pub trait ResultSink {
    fn write(&mut self, result: &Conjugacy) -> Result<(), OutputWriteError>;
}

/// Writes one result to a file, replacing any previous content.
///
/// The file is only created inside [`ResultSink::write`], so callers that
/// bail out on a failed computation leave nothing on disk.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    format: OutputFormat,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>, format: OutputFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileSink {
    fn write(&mut self, result: &Conjugacy) -> Result<(), OutputWriteError> {
        let body = render(result, self.format)?;
        fs::write(&self.path, body).map_err(|source| OutputWriteError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("wrote result to {}", self.path.display());
        Ok(())
    }
}

/// Writes results to any `Write` (stdout, buffers).
pub struct WriterSink<W: Write> {
    writer: W,
    format: OutputFormat,
    label: String,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            label: "<writer>".to_string(),
        }
    }

    /// Name reported in I/O errors instead of `<writer>`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for WriterSink<W> {
    fn write(&mut self, result: &Conjugacy) -> Result<(), OutputWriteError> {
        let body = render(result, self.format)?;
        self.writer
            .write_all(body.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| OutputWriteError::Io {
                path: PathBuf::from(&self.label),
                source,
            })
    }
}
