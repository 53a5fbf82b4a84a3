#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for YAML config documents, so tests read as the fields they set.
///
/// Setting a key that is already present replaces its value, so
/// `DocumentBuilder::full().theme("dark")` holds exactly one `theme`. Values
/// are written verbatim, which makes it easy to produce invalid documents
/// (`.fuel_mode("bogus")`, `.raw("settings", "theme: [dark]")`).
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    settings: Option<Vec<Line>>,
    vehicle: Option<Vec<Line>>,
}

#[derive(Debug, Clone)]
enum Line {
    Entry { key: String, value: String },
    Raw(String),
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every field set to a valid value.
    pub fn full() -> Self {
        Self::new()
            .language("en")
            .theme("auto")
            .shift_x(0)
            .shift_y(0)
            .fuel_mode("intellectual")
            .drive_mode("comfort")
    }

    pub fn language(self, value: &str) -> Self {
        self.set("settings", "language", format!("{value:?}"))
    }

    pub fn theme(self, value: &str) -> Self {
        self.set("settings", "theme", format!("{value:?}"))
    }

    pub fn shift_x(self, value: i64) -> Self {
        self.set("settings", "interface-shift-x", value.to_string())
    }

    pub fn shift_y(self, value: i64) -> Self {
        self.set("settings", "interface-shift-y", value.to_string())
    }

    pub fn fuel_mode(self, value: &str) -> Self {
        self.set("vehicle", "fuel-mode", format!("{value:?}"))
    }

    pub fn drive_mode(self, value: &str) -> Self {
        self.set("vehicle", "drive-mode", format!("{value:?}"))
    }

    /// Declare a section without any keys.
    pub fn empty_section(mut self, section: &str) -> Self {
        self.section_mut(section);
        self
    }

    /// Set `key` in `section`, replacing an earlier value for the same key.
    pub fn set(mut self, section: &str, key: &str, value: String) -> Self {
        let lines = self.section_mut(section);
        let position = lines
            .iter()
            .position(|line| matches!(line, Line::Entry { key: k, .. } if k == key));
        let entry = Line::Entry {
            key: key.to_string(),
            value,
        };
        match position {
            Some(i) => lines[i] = entry,
            None => lines.push(entry),
        }
        self
    }

    /// Append a verbatim line to a section.
    pub fn raw(mut self, section: &str, line: &str) -> Self {
        self.section_mut(section).push(Line::Raw(line.to_string()));
        self
    }

    fn section_mut(&mut self, section: &str) -> &mut Vec<Line> {
        match section {
            "settings" => self.settings.get_or_insert_with(Vec::new),
            "vehicle" => self.vehicle.get_or_insert_with(Vec::new),
            other => panic!("unknown section in test builder: {other}"),
        }
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        for (name, lines) in [("settings", &self.settings), ("vehicle", &self.vehicle)] {
            match lines {
                None => {}
                Some(lines) if lines.is_empty() => {
                    let _ = writeln!(out, "{name}: {{}}");
                }
                Some(lines) => {
                    let _ = writeln!(out, "{name}:");
                    for line in lines {
                        let _ = match line {
                            Line::Entry { key, value } => writeln!(out, "  {key}: {value}"),
                            Line::Raw(raw) => writeln!(out, "  {raw}"),
                        };
                    }
                }
            }
        }
        out
    }
}

/// A config file inside its own temporary directory.
#[derive(Debug)]
pub struct TempConfig {
    dir: TempDir,
    path: PathBuf,
}

impl TempConfig {
    pub fn new(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.yaml");
        fs::write(&path, contents).expect("write initial config");
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Overwrite the file in place.
    pub fn write(&self, contents: &str) {
        fs::write(&self.path, contents).expect("write config");
    }

    /// Save the way many editors do: write a sibling file, then rename it
    /// over the original.
    pub fn replace(&self, contents: &str) {
        let tmp = self.dir.path().join(".config.yaml.swp");
        fs::write(&tmp, contents).expect("write temp config");
        fs::rename(&tmp, &self.path).expect("rename temp config");
    }

    /// Write an unrelated file next to the config.
    pub fn write_sibling(&self, name: &str, contents: &str) {
        fs::write(self.dir.path().join(name), contents).expect("write sibling");
    }
}
