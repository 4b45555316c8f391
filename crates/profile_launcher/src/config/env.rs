//! Ordered container environment
//!
//! Entries are kept in declaration order and looked up by exact key, so an
//! override for `FOO` never touches `FOOBAR`. They are serialized back to
//! `KEY=VALUE` strings only when handed to the container runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single line of a container environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvEntry {
    /// `KEY=VALUE` variable
    Var { key: String, value: String },
    /// Line without a key, kept verbatim (blank lines, bare device selector)
    Raw(String),
}

impl EnvEntry {
    /// Parse one env line. The key ends at the first `=`.
    pub fn parse(line: &str) -> Self {
        match line.split_once('=') {
            Some((key, value)) if !key.is_empty() => EnvEntry::Var {
                key: key.to_string(),
                value: value.to_string(),
            },
            _ => EnvEntry::Raw(line.to_string()),
        }
    }

    /// Variable name, `None` for raw lines
    pub fn key(&self) -> Option<&str> {
        match self {
            EnvEntry::Var { key, .. } => Some(key),
            EnvEntry::Raw(_) => None,
        }
    }
}

impl fmt::Display for EnvEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvEntry::Var { key, value } => write!(f, "{}={}", key, value),
            EnvEntry::Raw(line) => f.write_str(line),
        }
    }
}

/// Environment of one container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct EnvList {
    entries: Vec<EnvEntry>,
}

impl EnvList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the contents of an env file, one entry per `\n`-separated
    /// line. A trailing newline yields a trailing empty entry.
    pub fn from_file_contents(contents: &str) -> Self {
        Self {
            entries: contents.split('\n').map(EnvEntry::parse).collect(),
        }
    }

    /// Value of `key`, if set
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            EnvEntry::Var { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Replace every entry for `key` in place, otherwise append.
    ///
    /// Entries keep their positions; nothing is removed.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut found = false;
        for entry in self.entries.iter_mut() {
            if entry.key() == Some(key) {
                *entry = EnvEntry::Var {
                    key: key.to_string(),
                    value: value.to_string(),
                };
                found = true;
            }
        }

        if !found {
            self.entries.push(EnvEntry::Var {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Append a line verbatim
    pub fn push_raw(&mut self, line: impl Into<String>) {
        self.entries.push(EnvEntry::Raw(line.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the `KEY=VALUE` list the runtime expects
    pub fn to_strings(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.to_string()).collect()
    }
}

impl From<Vec<String>> for EnvList {
    fn from(lines: Vec<String>) -> Self {
        Self {
            entries: lines.iter().map(|l| EnvEntry::parse(l)).collect(),
        }
    }
}

impl From<EnvList> for Vec<String> {
    fn from(list: EnvList) -> Self {
        list.to_strings()
    }
}
