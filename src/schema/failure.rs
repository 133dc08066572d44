use serde_json::Value;
use std::fmt;

use crate::error::quote;

/// One step from a parent JSON value to a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member name
    Field(String),
    /// Array position
    Index(usize),
    /// Object member name that was itself rejected, as a dictionary key
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", quote(name)),
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::Key(name) => write!(f, "key {}", quote(name)),
        }
    }
}

/// Why and where a value did not match its schema.
///
/// The path is stored root first. Failures are created at the offending node
/// with an empty path and grow one segment at a time as they propagate out
/// of enclosing records and arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFailure {
    path: Vec<PathSegment>,
    reason: String,
    value: Value,
}

impl DecodeFailure {
    pub fn new(reason: impl Into<String>, value: &Value) -> Self {
        Self {
            path: Vec::new(),
            reason: reason.into(),
            value: value.clone(),
        }
    }

    /// Re-anchor this failure one level further from the offending node.
    pub fn within(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The offending value, as seen by the schema that rejected it.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Render as `"field": [index]: ...: reason: <json>` for operator-facing
    /// messages.
    ///
    /// The JSON snippet is looked up again by walking `path` from `root`, so it
    /// is the value that actually sits at the failure location. A missing
    /// member renders as `null`. A rejected dictionary key renders as the key
    /// itself, never as the entry it names.
    pub fn render(&self, root: &Value) -> String {
        let mut parts: Vec<String> = self.path.iter().map(ToString::to_string).collect();
        parts.push(self.reason.clone());
        let at_path = value_at(root, &self.path).unwrap_or(&self.value);
        parts.push(at_path.to_string());
        parts.join(": ")
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.path() {
            write!(f, "{}: ", segment)?;
        }
        write!(f, "{}: {}", self.reason(), self.value())
    }
}

impl std::error::Error for DecodeFailure {}

fn value_at<'a>(root: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    path.iter().try_fold(root, |value, segment| match segment {
        PathSegment::Field(name) => value.get(name.as_str()),
        PathSegment::Index(index) => value.get(*index),
        PathSegment::Key(_) => None,
    })
}
