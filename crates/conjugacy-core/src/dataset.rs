//! Reading paired observations from two-column text.
//!
//! One observation per line, x then y, no header row. Blank lines are skipped.
//! Columns are split on runs of whitespace by default, or on a single
//! delimiter character (fields are trimmed either way).

use std::path::{Path, PathBuf};

use crate::engine::Observation;
use crate::error::InputFormatError;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Column separator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// Any run of spaces or tabs.
    #[default]
    Whitespace,
    /// Exactly this character, e.g. `,` or `;`.
    Char(char),
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ws" | "whitespace" | "space" | "" => Ok(Delimiter::Whitespace),
            "tab" | "\\t" => Ok(Delimiter::Char('\t')),
            "comma" => Ok(Delimiter::Char(',')),
            "semicolon" => Ok(Delimiter::Char(';')),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Delimiter::Char(c)),
                    _ => Err(format!("delimiter must be a single character, got '{other}'")),
                }
            }
        }
    }
}

/// Options for [`parse_pairs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiter: Delimiter,
}

/// Parse two-column text into observations, in file order.
pub fn parse_pairs(
    text: &str,
    options: &ParseOptions,
) -> Result<Vec<Observation>, InputFormatError> {
    let mut pairs = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = match options.delimiter {
            Delimiter::Whitespace => raw.split_whitespace().collect(),
            Delimiter::Char(c) => raw.split(c).map(str::trim).collect(),
        };
        if fields.len() != 2 {
            return Err(InputFormatError::ColumnCount {
                line,
                found: fields.len(),
            });
        }
        let x = parse_number(fields[0], line, 1)?;
        let y = parse_number(fields[1], line, 2)?;
        pairs.push(Observation::new(x, y));
    }
    log::debug!("parsed {} observations", pairs.len());
    Ok(pairs)
}

fn parse_number(token: &str, line: usize, column: usize) -> Result<f64, InputFormatError> {
    token
        .parse::<f64>()
        .map_err(|_| InputFormatError::InvalidNumber {
            line,
            column,
            token: token.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// A named, in-memory sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub pairs: Vec<Observation>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, pairs: Vec<Observation>) -> Self {
        Self {
            name: name.into(),
            pairs,
        }
    }

    /// Zip separate x and y columns. They must have equal length.
    pub fn from_columns(
        name: impl Into<String>,
        x: &[f64],
        y: &[f64],
    ) -> Result<Self, InputFormatError> {
        if x.len() != y.len() {
            return Err(InputFormatError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        let pairs = x
            .iter()
            .zip(y)
            .map(|(&x, &y)| Observation::new(x, y))
            .collect();
        Ok(Self::new(name, pairs))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Split back into `(x, y)` columns.
    pub fn columns(&self) -> (Vec<f64>, Vec<f64>) {
        self.pairs.iter().map(|o| (o.x, o.y)).unzip()
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can hand the engine a sequence of pairs.
pub trait PairSource {
    /// Label used in logs and batch reports.
    fn name(&self) -> &str;

    /// Produce the observations.
    fn load(&self) -> Result<Vec<Observation>, InputFormatError>;
}

/// Two-column text file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
    options: ParseOptions,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, options: ParseOptions) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self {
            path,
            name,
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PairSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<Observation>, InputFormatError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| InputFormatError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_pairs(&text, &self.options)
    }
}

/// Two-column text already in memory (HTTP bodies, tests, stdin).
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
    options: ParseOptions,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            options,
        }
    }
}

impl PairSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<Observation>, InputFormatError> {
        parse_pairs(&self.text, &self.options)
    }
}

impl PairSource for Dataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<Observation>, InputFormatError> {
        Ok(self.pairs.clone())
    }
}
