//! Format templates
//!
//! A template is plain text with `{field}` placeholders. `{{` and `}}` stand for literal
//! braces. Templates are parsed once, when a logger or handler is built, so unknown fields
//! and unbalanced braces are configuration errors rather than render failures.

use super::error::{LoggerError, Result};
use std::fmt;
use std::str::FromStr;

/// A placeholder a template may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Timestamp,
    Level,
    LevelPrefix,
    Name,
    Pid,
    RelativePath,
    ProjectName,
    Message,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Timestamp,
        Field::Level,
        Field::LevelPrefix,
        Field::Name,
        Field::Pid,
        Field::RelativePath,
        Field::ProjectName,
        Field::Message,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::Level => "level",
            Field::LevelPrefix => "level_prefix",
            Field::Name => "name",
            Field::Pid => "pid",
            Field::RelativePath => "relative_path",
            Field::ProjectName => "project_name",
            Field::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Field::ALL.iter().map(Field::as_str).collect();
                format!("unknown field {{{}}}, expected one of: {}", s, known.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed format template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|&(_, next)| next) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(LoggerError::config(
                            "Template",
                            format!("unterminated placeholder starting at byte {}", pos),
                        ));
                    }
                    let field = name
                        .trim()
                        .parse::<Field>()
                        .map_err(|e| LoggerError::config("Template", e))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' if chars.peek().map(|&(_, next)| next) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(LoggerError::config(
                        "Template",
                        format!("unmatched '}}' at byte {}", pos),
                    ));
                }
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn uses(&self, field: Field) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Field(f) if *f == field))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fill every placeholder with the value `value_of` returns for it
    pub fn render<F>(&self, mut value_of: F) -> String
    where
        F: FnMut(Field) -> String,
    {
        let mut out = String::with_capacity(self.source.len() + 64);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => out.push_str(&value_of(*field)),
            }
        }
        out
    }
}

impl FromStr for Template {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Template::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
