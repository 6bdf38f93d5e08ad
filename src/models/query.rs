//! Query result models.
//!
//! Results carry no typed schema: every row is flattened into a tuple literal
//! such as `(1, 'alice', None)` and rows are joined by newlines.

use std::fmt;

/// Prefix of the text returned when a query fails to execute.
pub const QUERY_ERROR_PREFIX: &str = "Error: ";

/// A single stringified column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Null,
    Bool(bool),
    /// Numeric value rendered without quotes.
    Number(String),
    /// Any other value, rendered as a quoted string literal.
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Number(n) => f.write_str(n),
            Self::Text(s) => write_quoted(f, s),
        }
    }
}

/// Write `s` as a quoted string literal.
///
/// Single quotes are used unless the text contains `'` and no `"`. Control,
/// format, separator and private-use code points are written as `\xNN`,
/// `\uNNNN` or `\UNNNNNNNN`.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    write!(f, "{quote}")?;
    for ch in s.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c if !is_printable(c) => match u32::from(c) {
                n @ 0..=0xff => write!(f, "\\x{n:02x}")?,
                n @ 0x100..=0xffff => write!(f, "\\u{n:04x}")?,
                n => write!(f, "\\U{n:08x}")?,
            },
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "{quote}")
}

/// Whether `c` is written as-is inside a quoted literal.
///
/// Unassigned code points are treated as printable.
fn is_printable(c: char) -> bool {
    !matches!(
        u32::from(c),
        // Cc
        0x00..=0x1f | 0x7f..=0x9f
        // Zs other than space, Zl, Zp
        | 0xa0 | 0x1680 | 0x2000..=0x200a | 0x2028 | 0x2029 | 0x202f | 0x205f | 0x3000
        // Cf
        | 0xad | 0x600..=0x605 | 0x61c | 0x6dd | 0x70f | 0x890..=0x891 | 0x8e2 | 0x180e
        | 0x200b..=0x200f | 0x202a..=0x202e | 0x2060..=0x2064 | 0x2066..=0x206f
        | 0xfeff | 0xfff9..=0xfffb | 0x110bd | 0x110cd | 0x13430..=0x1343f
        | 0x1bca0..=0x1bca3 | 0x1d173..=0x1d17a | 0xe0001 | 0xe0020..=0xe007f
        // Cs, Co
        | 0xd800..=0xf8ff | 0xf0000..=0xffffd | 0x100000..=0x10fffd
    )
}

/// Render one row as a tuple literal.
///
/// A single value keeps a trailing comma: `(1,)`.
pub fn format_row(cells: &[CellValue]) -> String {
    match cells {
        [] => "()".to_string(),
        [only] => format!("({only},)"),
        _ => {
            let parts: Vec<String> = cells.iter().map(ToString::to_string).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Outcome of running caller-supplied SQL.
///
/// `Failed` is a successful response on the wire: the tool call succeeds and
/// its text starts with `Error: `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Rows(String),
    Failed(String),
}

impl QueryOutcome {
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<CellValue>>,
    {
        let lines: Vec<String> = rows.into_iter().map(|r| format_row(&r)).collect();
        Self::Rows(lines.join("\n"))
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Text returned to the client.
    pub fn into_text(self) -> String {
        match self {
            Self::Rows(text) => text,
            Self::Failed(message) => format!("{QUERY_ERROR_PREFIX}{message}"),
        }
    }
}
