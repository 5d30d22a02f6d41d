//! Output formatting for JSONC documents

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::Result;

/// How a document is written back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per indentation level; 0 renders compact JSON.
    pub indent: usize,
    /// Keep comments and untouched text, applying only minimal edits.
    /// When false the whole document is re-serialized without comments.
    pub preserve_comments: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            preserve_comments: true,
        }
    }
}

/// Serialize `value` with `indent` spaces per level.
///
/// Matches the layout of `JSON.stringify(value, null, indent)`, which is what
/// hand-written tsconfig files usually look like.
pub fn to_pretty(value: &Value, indent: usize) -> Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }

    let indent_str = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Pretty-print `value` for embedding at a position indented by `base_pad`
/// spaces. Continuation lines are shifted right by `base_pad`.
pub(crate) fn render_nested(value: &Value, indent: usize, base_pad: usize) -> Result<String> {
    let pretty = to_pretty(value, indent)?;
    if base_pad == 0 {
        return Ok(pretty);
    }
    let newline_pad = format!("\n{}", " ".repeat(base_pad));
    Ok(pretty.replace('\n', &newline_pad))
}

/// Line ending used by `text`: CRLF if any line ends with it, LF otherwise.
pub(crate) fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Convert the LF line breaks of generated `text` to `eol`.
pub(crate) fn with_line_ending(text: String, eol: &str) -> String {
    if eol == "\n" {
        text
    } else {
        text.replace('\n', eol)
    }
}
