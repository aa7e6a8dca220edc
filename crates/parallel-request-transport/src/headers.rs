//! Header block capture
//!
//! Request and response header blocks are captured as text and parsed one
//! line at a time. Each line is split on its first colon into a trimmed
//! name and value. Lines without a colon (the request line, the status line)
//! are kept as unnamed entries in both directions; blank lines are dropped.

use http::HeaderMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One captured header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    /// Header name; `None` for lines without a colon
    pub name: Option<String>,
    /// Header value, or the whole line when unnamed
    pub value: String,
}

impl HeaderLine {
    /// Parse a single line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.split_once(':') {
            Some((name, value)) => Some(Self {
                name: Some(name.trim().to_string()),
                value: value.trim().to_string(),
            }),
            None => {
                let line = line.trim();
                (!line.is_empty()).then(|| Self {
                    name: None,
                    value: line.to_string(),
                })
            }
        }
    }
}

/// Header lines captured from one direction of a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedHeaders {
    lines: Vec<HeaderLine>,
}

impl CapturedHeaders {
    /// Parse a raw header block (`\r\n` or `\n` separated).
    pub fn parse(block: &str) -> Self {
        let mut captured = Self::default();
        for line in block.lines() {
            captured.push_line(line);
        }
        captured
    }

    /// Feed one raw line, as a header callback would.
    pub fn push_line(&mut self, line: &str) {
        if let Some(parsed) = HeaderLine::parse(line) {
            self.lines.push(parsed);
        }
    }

    /// Value of the last header called `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|l| l.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|l| l.value.as_str())
    }

    /// Lines that carried no name, in capture order
    pub fn unnamed(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.name.is_none())
            .map(|l| l.value.as_str())
    }

    /// All captured lines
    pub fn lines(&self) -> &[HeaderLine] {
        &self.lines
    }

    /// Number of captured lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// `true` when nothing was captured
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Serializes as one JSON object: named lines keyed by name (a repeated
/// name keeps its first position and its last value), unnamed lines keyed
/// `"0"`, `"1"`, ... in order.
impl Serialize for CapturedHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(String, &str)> = Vec::with_capacity(self.lines.len());
        let mut unnamed = 0usize;
        for line in &self.lines {
            let key = match &line.name {
                Some(name) => name.clone(),
                None => {
                    unnamed += 1;
                    (unnamed - 1).to_string()
                }
            };
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = &line.value,
                None => entries.push((key, &line.value)),
            }
        }

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(&key, value)?;
        }
        map.end()
    }
}

/// Render a header block as it would appear on the wire.
pub fn format_block(start_line: &str, headers: &HeaderMap) -> String {
    let mut block = String::with_capacity(64 + headers.len() * 32);
    block.push_str(start_line);
    block.push_str("\r\n");
    for (name, value) in headers {
        block.push_str(name.as_str());
        block.push_str(": ");
        block.push_str(&String::from_utf8_lossy(value.as_bytes()));
        block.push_str("\r\n");
    }
    block.push_str("\r\n");
    block
}
