//! JSONC document with tracked edits

use jsonc_parser::ast::Value as AstValue;
use serde_json::{Map, Number, Value};

use crate::diff::SemanticDiff;
use crate::error::{Error, Result};
use crate::format::{RenderOptions, line_ending, to_pretty, with_line_ending};
use crate::rewrite;

const BOM: char = '\u{feff}';

/// A parsed JSON-with-comments document.
///
/// Reads go through a `serde_json::Value` view. Writes update that view and
/// remember the touched path, so [`JsoncDocument::render`] can replay only
/// those edits against the original text.
///
/// A leading byte order mark is accepted and written back as found.
#[derive(Debug, Clone)]
pub struct JsoncDocument {
    bom: bool,
    source: String,
    original: Value,
    value: Value,
    edited_paths: Vec<Vec<String>>,
}

impl JsoncDocument {
    /// Parse JSONC text. The root must be an object.
    pub fn parse(source: &str) -> Result<Self> {
        let (bom, source) = match source.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, source),
        };
        let root = rewrite::parse_root(source)?;
        let value = to_json(&root)?;
        if !value.is_object() {
            return Err(Error::parse("JSONC", "root value must be an object"));
        }

        Ok(Self {
            bom,
            source: source.to_owned(),
            original: value.clone(),
            value,
            edited_paths: Vec::new(),
        })
    }

    /// Current value, including edits.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        value_at(&self.value, path)
    }

    /// Set `path` to `value`, creating missing intermediate objects.
    ///
    /// Fails if an intermediate key holds something other than an object.
    pub fn set(&mut self, path: &[&str], value: Value) -> Result<()> {
        let Some((last, parents)) = path.split_last() else {
            return Err(Error::path_set(path, "empty path"));
        };

        let mut current = &mut self.value;
        for (idx, key) in parents.iter().enumerate() {
            let Value::Object(map) = current else {
                return Err(Error::path_set(
                    path,
                    format!("'{}' is not an object", path[..idx].join(".")),
                ));
            };
            current = map
                .entry((*key).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        let Value::Object(map) = current else {
            return Err(Error::path_set(
                path,
                format!("'{}' is not an object", parents.join(".")),
            ));
        };
        map.insert((*last).to_string(), value);

        let owned: Vec<String> = path.iter().map(|s| (*s).to_string()).collect();
        if !self.edited_paths.contains(&owned) {
            self.edited_paths.push(owned);
        }
        Ok(())
    }

    /// True if the current value differs from the parsed one.
    pub fn is_modified(&self) -> bool {
        self.value != self.original
    }

    /// Semantic changes from the parsed value to the current value.
    pub fn diff(&self) -> SemanticDiff {
        SemanticDiff::compute(&self.original, &self.value)
    }

    /// Render the document for writing.
    ///
    /// With `preserve_comments`, an unmodified document renders to its exact
    /// source and a modified one gets one minimal text edit per changed
    /// path. Otherwise the current value is pretty-printed from scratch.
    pub fn render(&self, options: &RenderOptions) -> Result<String> {
        let mut output = String::new();
        if self.bom {
            output.push(BOM);
        }

        if !options.preserve_comments {
            let pretty = to_pretty(&self.value, options.indent)?;
            let eol = line_ending(&self.source);
            output.push_str(&with_line_ending(pretty, eol));
            output.push_str(eol);
            return Ok(output);
        }

        let mut text = self.source.clone();
        if self.is_modified() {
            for path in &self.edited_paths {
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                let Some(new_value) = value_at(&self.value, &segments) else {
                    continue;
                };
                if value_at(&self.original, &segments) == Some(new_value) {
                    continue;
                }
                tracing::trace!(path = %path.join("."), "rewriting value");
                text = rewrite::set_path(&text, &segments, new_value, options.indent)?;
            }
        }
        output.push_str(&text);
        Ok(output)
    }
}

fn value_at<'v>(value: &'v Value, path: &[&str]) -> Option<&'v Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

fn to_json(node: &AstValue<'_>) -> Result<Value> {
    let value = match node {
        AstValue::StringLit(literal) => Value::String(literal.value.to_string()),
        AstValue::NumberLit(literal) => {
            let number: Number = literal
                .value
                .parse()
                .map_err(|e| Error::parse("JSONC", format!("invalid number {}: {e}", literal.value)))?;
            Value::Number(number)
        }
        AstValue::BooleanLit(literal) => Value::Bool(literal.value),
        AstValue::NullKeyword(_) => Value::Null,
        AstValue::Array(array) => Value::Array(
            array
                .elements
                .iter()
                .map(to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        AstValue::Object(object) => {
            let mut map = Map::new();
            for property in &object.properties {
                map.insert(property.name.as_str().to_string(), to_json(&property.value)?);
            }
            Value::Object(map)
        }
    };
    Ok(value)
}
