//! Minimal in-place edits of JSONC source text
//!
//! Edits locate their target through the `jsonc-parser` AST and splice new
//! text into the original string, so comments, key order and formatting
//! outside the edited value survive byte for byte.

use jsonc_parser::ast::{Object, Value as AstValue};
use jsonc_parser::common::Range;
use jsonc_parser::parse_to_ast;
use serde_json::{Map, Value};

use crate::format::{line_ending, render_nested, with_line_ending};
use crate::{Error, Result};

/// Parse `source` and return its root AST node.
pub(crate) fn parse_root(source: &str) -> Result<AstValue<'_>> {
    let parsed = parse_to_ast(source, &Default::default(), &Default::default())
        .map_err(|e| Error::parse("JSONC", e.to_string()))?;
    parsed
        .value
        .ok_or_else(|| Error::parse("JSONC", "document contains no root value"))
}

/// Return `source` with the value at `path` set to `value`.
///
/// - If the path exists, its current value is replaced.
/// - If it does not, a member is appended to the deepest existing object,
///   synthesizing objects for any missing intermediate keys.
///
/// When a key appears more than once in an object, the last occurrence is
/// the one edited (it is also the one a JSON reader keeps).
pub fn set_path(source: &str, path: &[&str], value: &Value, indent: usize) -> Result<String> {
    if path.is_empty() {
        return Err(Error::path_set(path, "empty path"));
    }
    let root = parse_root(source)?;

    let mut node = &root;
    let mut depth = 0;
    for (idx, key) in path.iter().enumerate() {
        let AstValue::Object(object) = node else {
            return Err(Error::path_set(
                path,
                format!("'{}' is not an object", path[..idx].join(".")),
            ));
        };

        match object
            .properties
            .iter()
            .rev()
            .find(|property| property.name.as_str() == *key)
        {
            Some(property) => {
                node = &property.value;
                depth += 1;
            }
            None => {
                let member_value = nest(&path[idx + 1..], value);
                return insert_member(source, object, key, &member_value, depth, indent);
            }
        }
    }

    let range = value_range(node);
    let rendered = render_nested(value, indent, indent * depth)?;
    let rendered = with_line_ending(rendered, line_ending(source));
    let mut output = source.to_owned();
    output.replace_range(range.start..range.end, &rendered);
    Ok(output)
}

/// Append `"key": value` as the last member of `object`.
///
/// `depth` is the nesting level of `object` itself (0 for the root). The
/// inserted text uses the line ending already present in `source`.
fn insert_member(
    source: &str,
    object: &Object<'_>,
    key: &str,
    value: &Value,
    depth: usize,
    indent: usize,
) -> Result<String> {
    let eol = line_ending(source);
    let member_pad = " ".repeat(indent * (depth + 1));
    let member = format!(
        "{}: {}",
        Value::String(key.to_string()),
        render_nested(value, indent, indent * (depth + 1))?
    );
    let member = with_line_ending(member, eol);

    let mut output = source.to_owned();
    match object.properties.last() {
        Some(last) => match trailing_comment_end(source, last.range.end) {
            // the comment stays with the member it annotates
            Some(TrailingComment { has_comma, end }) => {
                output.insert_str(end, &format!("{eol}{member_pad}{member}"));
                if !has_comma {
                    output.insert(last.range.end, ',');
                }
            }
            None => {
                output.insert_str(last.range.end, &format!(",{eol}{member_pad}{member}"));
            }
        },
        None => {
            let open = object.range.start + 1;
            let close = object.range.end - 1;
            if source[open..close].trim().is_empty() {
                let close_pad = " ".repeat(indent * depth);
                output.replace_range(
                    open..close,
                    &format!("{eol}{member_pad}{member}{eol}{close_pad}"),
                );
            } else {
                // only comments inside; keep them below the new member
                output.insert_str(open, &format!("{eol}{member_pad}{member}"));
            }
        }
    }
    Ok(output)
}

/// A comment on the same line as a member, after its value.
struct TrailingComment {
    /// A comma sits between the value and the comment
    has_comma: bool,
    /// Byte offset just past the comment
    end: usize,
}

/// Find a comment that follows the member ending at `member_end` on the same
/// line and closes the line, e.g. `"strict": true, // always`.
fn trailing_comment_end(source: &str, member_end: usize) -> Option<TrailingComment> {
    let bytes = source.as_bytes();
    let skip_blanks = |mut pos: usize| {
        while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
            pos += 1;
        }
        pos
    };

    let mut pos = skip_blanks(member_end);
    let has_comma = bytes.get(pos) == Some(&b',');
    if has_comma {
        pos = skip_blanks(pos + 1);
    }

    let rest = &source[pos..];
    let end = if rest.starts_with("//") {
        pos + rest.find(['\r', '\n']).unwrap_or(rest.len())
    } else if rest.starts_with("/*") {
        let close = rest[2..].find("*/")?;
        if rest[..close + 2].contains('\n') {
            return None;
        }
        pos + 2 + close + 2
    } else {
        return None;
    };

    // anything else on the line (a closing brace, another member) means the
    // object is laid out inline
    let after = skip_blanks(end);
    match bytes.get(after) {
        None | Some(b'\r' | b'\n') => Some(TrailingComment { has_comma, end }),
        _ => None,
    }
}

/// Wrap `value` in one object per remaining path segment.
fn nest(segments: &[&str], value: &Value) -> Value {
    segments.iter().rev().fold(value.clone(), |inner, segment| {
        let mut map = Map::new();
        map.insert((*segment).to_string(), inner);
        Value::Object(map)
    })
}

fn value_range(node: &AstValue<'_>) -> Range {
    match node {
        AstValue::Object(literal) => literal.range,
        AstValue::StringLit(literal) => literal.range,
        AstValue::NumberLit(literal) => literal.range,
        AstValue::BooleanLit(literal) => literal.range,
        AstValue::Array(literal) => literal.range,
        AstValue::NullKeyword(literal) => literal.range,
    }
}
