//! Template-based record formatter.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use thiserror::Error;

use crate::pipeline::record::Record;

/// Default line template.
pub const DEFAULT_PATTERN: &str = "{asctime} - {name} - {levelname} - {message}";

/// Default `strftime` format for `{asctime}` (millisecond precision).
pub const DEFAULT_DATEFMT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Errors detected while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unknown placeholder `{{{0}}}`")]
    UnknownField(String),

    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),

    #[error("unmatched `}}` at byte {0}")]
    StrayBrace(usize),

    #[error("invalid date format `{0}`")]
    InvalidDateFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Asctime,
    Created,
    Name,
    LevelName,
    LevelNo,
    Message,
}

impl Field {
    fn parse(name: &str) -> Result<Self, FormatError> {
        match name {
            "asctime" => Ok(Field::Asctime),
            "created" => Ok(Field::Created),
            "name" => Ok(Field::Name),
            "levelname" => Ok(Field::LevelName),
            "levelno" => Ok(Field::LevelNo),
            "message" => Ok(Field::Message),
            other => Err(FormatError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Renders records to text lines.
///
/// The template is compiled once; rendering cannot fail.
#[derive(Debug, Clone)]
pub struct Formatter {
    segments: Vec<Segment>,
    datefmt: String,
}

impl Formatter {
    /// Compile `pattern` with `{field}` placeholders and a `strftime` date format.
    ///
    /// Supported fields: `asctime`, `created`, `name`, `levelname`, `levelno`,
    /// `message`. `{{` and `}}` produce literal braces.
    pub fn new(pattern: &str, datefmt: &str) -> Result<Self, FormatError> {
        validate_datefmt(datefmt)?;
        Ok(Self {
            segments: compile(pattern)?,
            datefmt: datefmt.to_string(),
        })
    }

    /// Render a record. Multi-entry error info is appended one entry per line.
    pub fn render(&self, record: &Record) -> String {
        let mut out = String::with_capacity(64 + record.message().len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => self.render_field(&mut out, *field, record),
            }
        }

        if let Some(error) = record.error() {
            for (i, entry) in error.chain().iter().enumerate() {
                let label = if i == 0 { "Error" } else { "Caused by" };
                let _ = write!(out, "\n{label}: {entry}");
            }
        }
        out
    }

    fn render_field(&self, out: &mut String, field: Field, record: &Record) {
        // Writing into a String only fails if a Display impl fails; the date
        // format was validated at construction.
        let _ = match field {
            Field::Asctime => write!(out, "{}", record.timestamp().format(&self.datefmt)),
            Field::Created => {
                let ts = record.timestamp();
                write!(out, "{}.{:03}", ts.timestamp(), ts.timestamp_subsec_millis())
            }
            Field::Name => write!(out, "{}", record.logger()),
            Field::LevelName => write!(out, "{}", record.level().as_str()),
            Field::LevelNo => write!(out, "{}", record.level().as_u8()),
            Field::Message => write!(out, "{}", record.message()),
        };
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            segments: vec![
                Segment::Field(Field::Asctime),
                Segment::Literal(" - ".into()),
                Segment::Field(Field::Name),
                Segment::Literal(" - ".into()),
                Segment::Field(Field::LevelName),
                Segment::Literal(" - ".into()),
                Segment::Field(Field::Message),
            ],
            datefmt: DEFAULT_DATEFMT.to_string(),
        }
    }
}

fn validate_datefmt(datefmt: &str) -> Result<(), FormatError> {
    if StrftimeItems::new(datefmt).any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::InvalidDateFormat(datefmt.to_string()));
    }
    Ok(())
}

fn compile(pattern: &str) -> Result<Vec<Segment>, FormatError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let rest = &pattern[pos + 1..];
                let end = rest.find('}').ok_or(FormatError::Unterminated(pos))?;
                let field = Field::parse(&rest[..end])?;
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(field));
                // Skip the field name and the closing brace.
                for _ in 0..rest[..=end].chars().count() {
                    chars.next();
                }
            }
            '}' => return Err(FormatError::StrayBrace(pos)),
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
