//! # Template Parser
//!
//! Rewrites `$name$` placeholders into positional markers and collects the
//! values to bind, one per occurrence.
//!
//! ## Invariants
//! - Bound-value count equals placeholder-occurrence count
//! - Marker `i` binds value `i`; markers are numbered left to right from 0
//! - Values never enter the statement text
//! - A name missing from the payload binds the empty string

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::payload::RowPayload;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$([^$]*)\$").expect("placeholder pattern is valid"))
}

/// Positional marker text for occurrence `index`
pub fn marker(index: usize) -> String {
    format!("@p{index}")
}

/// A SQL command template as registered. Not validated as SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Analyse placeholder positions once; bind per row with [`TemplatePlan::bind`].
    pub fn plan(&self) -> TemplatePlan {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for caps in placeholder_pattern().captures_iter(&self.source) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            if whole.start() > cursor {
                segments.push(Segment::Literal(self.source[cursor..whole.start()].to_string()));
            }
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            segments.push(Segment::Placeholder(name.to_string()));
            cursor = whole.end();
        }

        if cursor < self.source.len() {
            segments.push(Segment::Literal(self.source[cursor..].to_string()));
        }

        TemplatePlan { segments }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Placeholder analysis of a template, reusable across the rows of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePlan {
    segments: Vec<Segment>,
}

impl TemplatePlan {
    /// Number of placeholder occurrences
    pub fn occurrences(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder(_)))
            .count()
    }

    /// Placeholder names in order of appearance, repeats included
    pub fn names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Produce the statement for one row.
    pub fn bind(&self, payload: &RowPayload) -> ParsedStatement {
        let mut sql = String::new();
        let mut values = Vec::with_capacity(self.occurrences());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => sql.push_str(text),
                Segment::Placeholder(name) => {
                    let value = payload
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| Value::String(String::new()));
                    sql.push_str(&marker(values.len()));
                    values.push(value);
                }
            }
        }

        ParsedStatement { sql, values }
    }
}

/// Statement text with positional markers, plus one bound value per marker
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    sql: String,
    values: Vec<Value>,
}

impl ParsedStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn parameter_count(&self) -> usize {
        self.values.len()
    }

    /// `(marker, value)` pairs in marker order
    pub fn parameters(&self) -> impl Iterator<Item = (String, &Value)> {
        self.values.iter().enumerate().map(|(i, v)| (marker(i), v))
    }
}

/// Parse `template` against one row payload.
pub fn parse(template: &str, payload: &RowPayload) -> ParsedStatement {
    Template::new(template).plan().bind(payload)
}
