//! Dotted key-path lookup into a [`Value`] tree.
//!
//! `parent.child` descends through maps, `list.1.item` uses a zero-based
//! index when the current node is a list.

use crate::error::{ProbeError, Result};
use crate::value::Value;

/// A dotted path split into its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath<'a> {
    raw: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> KeyPath<'a> {
    pub fn parse(raw: &'a str) -> KeyPath<'a> {
        KeyPath {
            raw,
            segments: raw.split('.').collect(),
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Walk `root` one segment at a time, failing on the first segment that
    /// does not resolve.
    pub fn resolve<'v>(&self, root: &'v Value) -> Result<&'v Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match current {
                Value::Map(map) => map.get(*segment),
                Value::List(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            }
            .ok_or_else(|| self.not_found())?;
        }
        Ok(current)
    }

    fn not_found(&self) -> ProbeError {
        ProbeError::NotFound {
            path: self.raw.to_string(),
        }
    }
}

/// Look up `path` in `root`.
pub fn resolve<'v>(root: &'v Value, path: &str) -> Result<&'v Value> {
    KeyPath::parse(path).resolve(root)
}
