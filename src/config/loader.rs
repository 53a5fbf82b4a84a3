// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigModel, RawConfig};
use crate::errors::{ConfwatchError, ParseError, Result};

/// Parse a YAML document into an unvalidated [`RawConfig`].
///
/// All-or-nothing: on a syntax error or a value of the wrong type no partial
/// model is returned. A document holding only comments or whitespace is an
/// empty configuration.
pub fn parse(text: &str) -> std::result::Result<RawConfig, ParseError> {
    if is_blank(text) {
        return Ok(RawConfig::default());
    }
    serde_yaml::from_str::<RawConfig>(text).map_err(|err| parse_error(text, &err))
}

/// Read a file and parse it. Does **not** validate values; use
/// [`load_and_validate`] for the full pipeline.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfig> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ConfwatchError::io(path, e))?;
    let contents = String::from_utf8(bytes).map_err(|e| utf8_error(e.as_bytes(), e.utf8_error()))?;
    let raw = parse(&contents)?;
    Ok(raw)
}

/// Read, parse and validate a configuration file.
///
/// This is the pipeline used both for explicit loads and for reloads
/// triggered by the watcher.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigModel> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    let model = ConfigModel::try_from(raw)?;
    debug!(?path, "configuration parsed and validated");
    Ok(model)
}

/// Default location of the config file, relative to the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.yaml")
}

/// Document written by `confwatch --init` when no config file exists yet.
pub fn default_config_template() -> &'static str {
    r#"# confwatch configuration
#
# Edit and save this file while `confwatch` is running to see live updates.

settings:
  # en | ru
  language: en
  # auto | light | dark
  theme: auto
  # integer offsets in -100..=100
  interface-shift-x: 0
  interface-shift-y: 0

vehicle:
  # intellectual | electric | fuel | save
  fuel-mode: intellectual
  # eco | comfort | sport | snow | outing | individual
  drive-mode: comfort
"#
}

fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn parse_error(text: &str, err: &serde_yaml::Error) -> ParseError {
    let rendered = err.to_string();
    // serde_yaml appends the location to its message; it is kept separately.
    let message = match rendered.find(" at line ") {
        Some(end) => rendered[..end].trim().to_string(),
        None => rendered.trim().to_string(),
    };

    let Some(location) = err.location() else {
        return ParseError {
            message,
            line: None,
            column: None,
            key: None,
        };
    };

    let line_text = text.lines().nth(location.line().saturating_sub(1)).unwrap_or("");
    ParseError {
        message,
        line: Some(location.line()),
        column: Some(location.column()),
        key: key_on_line(line_text),
    }
}

/// Position of the first invalid byte, reported like any other parse error.
fn utf8_error(bytes: &[u8], err: std::str::Utf8Error) -> ParseError {
    let valid = &bytes[..err.valid_up_to()];
    let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
    let line_start = valid
        .iter()
        .rposition(|b| *b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    // Everything before `valid_up_to` is valid UTF-8.
    let prefix = String::from_utf8_lossy(&valid[line_start..]);

    ParseError {
        message: "file is not valid UTF-8".to_string(),
        line: Some(line),
        column: Some(prefix.chars().count() + 1),
        key: key_on_line(&prefix),
    }
}

/// Best-effort recovery of the key in a `key: value` line.
fn key_on_line(line: &str) -> Option<String> {
    let (key, _) = line.split_once(':')?;
    let key = key.trim().trim_start_matches("- ").trim_matches(['"', '\'']);
    if key.is_empty() || key.starts_with('#') {
        return None;
    }
    Some(key.to_string())
}
