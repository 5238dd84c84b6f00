//! Line numbers and stop references.

use std::fmt;
use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

/// A numeric bus or tram line, e.g. `14` or `523`.
///
/// # Examples
///
/// ```
/// use ztm_departures::domain::Line;
///
/// let line = Line::parse(" 14 ").unwrap();
/// assert_eq!(line.number(), 14);
/// assert!(Line::parse("N14").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line(u32);

impl Line {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Parse a line number, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, ParseIntError> {
        s.trim().parse().map(Self)
    }

    pub fn number(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({})", self.0)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a comma-separated `lines` query value.
///
/// Blank and non-numeric tokens are dropped silently. Repeated lines are
/// kept once, at their first position.
///
/// # Examples
///
/// ```
/// use ztm_departures::domain::{Line, parse_line_list};
///
/// let lines = parse_line_list("16, 14,x,,16");
/// assert_eq!(lines, vec![Line::new(16), Line::new(14)]);
/// assert!(parse_line_list("").is_empty());
/// ```
pub fn parse_line_list(value: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    for token in value.split(',') {
        if let Ok(line) = Line::parse(token) {
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
    }
    lines
}

/// A physical stop: numeric stop id plus the platform/post number.
///
/// The post number is kept as a string because the feed zero-pads it
/// (`"01"`, `"02"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopRef {
    pub id: u32,
    pub number: String,
}

impl StopRef {
    pub fn new(id: u32, number: impl Into<String>) -> Self {
        Self {
            id,
            number: number.into(),
        }
    }
}

impl fmt::Display for StopRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.number)
    }
}
