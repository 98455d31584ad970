mod html;
mod json;
mod text;
mod xml;

use crate::dirstat::DirStatResult;
use crate::dupfind::DuplicateResult;
use crate::rename::RenameResult;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

pub const TOOL_NAME: &str = "filetools";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub value: String,
}

impl Flag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Run context attached to every report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub tool_name: String,
    pub sub_command: String,
    pub flags: Vec<Flag>,
    pub version: String,
    pub generated_at: String,
}

impl Metadata {
    /// Stamped with the crate version and the current local time.
    pub fn new(sub_command: impl Into<String>, flags: Vec<Flag>) -> Self {
        Self {
            tool_name: TOOL_NAME.to_string(),
            sub_command: sub_command.into(),
            flags,
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Local::now().to_rfc3339(),
        }
    }

    pub fn flags_line(&self) -> String {
        self.flags
            .iter()
            .map(|flag| format!("{}={}", flag.name, flag.value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown output format: {0}")]
pub struct UnknownFormat(String);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Xml,
    Html,
}

impl OutputFormat {
    /// Like `parse`, but anything unrecognised falls back to text.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Html => "html",
        }
    }

    pub fn write_dirstat(self, result: &DirStatResult, out: &mut dyn Write) -> io::Result<()> {
        match self {
            OutputFormat::Text => text::dirstat(result, out),
            OutputFormat::Json => json::write(result, out),
            OutputFormat::Xml => xml::dirstat(result, out),
            OutputFormat::Html => html::dirstat(result, out),
        }
    }

    pub fn write_duplicates(self, result: &DuplicateResult, out: &mut dyn Write) -> io::Result<()> {
        match self {
            OutputFormat::Text => text::duplicates(result, out),
            OutputFormat::Json => json::write(result, out),
            OutputFormat::Xml => xml::duplicates(result, out),
            OutputFormat::Html => html::duplicates(result, out),
        }
    }

    pub fn write_rename(self, result: &RenameResult, out: &mut dyn Write) -> io::Result<()> {
        match self {
            OutputFormat::Text => text::rename(result, out),
            OutputFormat::Json => json::write(result, out),
            OutputFormat::Xml => xml::rename(result, out),
            OutputFormat::Html => html::rename(result, out),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            "html" => Ok(OutputFormat::Html),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

/// Human-readable size in powers of 1024, e.g. `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn shorten_hash(hash: &str, keep: usize) -> String {
    match hash.get(..keep) {
        Some(prefix) if hash.len() > keep => format!("{prefix}..."),
        _ => hash.to_string(),
    }
}
