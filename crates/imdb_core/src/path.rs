use std::fmt;

use serde_json::Value;

/// One step of a path into a JSON tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    Key(&'a str),
    Index(usize),
}

impl fmt::Display for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => write!(f, ".{key}"),
            Step::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Why a path could not be followed to the end.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("nothing at {at}")]
    Missing { at: String },
    #[error("expected {expected} at {at}, found {found}")]
    ShapeMismatch {
        at: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Follows `steps` from `root`.
///
/// A `null` anywhere along the way counts as missing, the same as an absent
/// key or an out-of-range index. Stepping into a node of the wrong kind is a
/// [`PathError::ShapeMismatch`].
pub fn lookup<'v>(root: &'v Value, steps: &[Step<'_>]) -> Result<&'v Value, PathError> {
    let mut current = root;
    for (depth, step) in steps.iter().enumerate() {
        let next = match (step, current) {
            (_, Value::Null) => None,
            (Step::Key(key), Value::Object(map)) => map.get(*key),
            (Step::Index(index), Value::Array(items)) => items.get(*index),
            (Step::Key(_), other) => {
                return Err(mismatch(&steps[..depth], "object", other));
            }
            (Step::Index(_), other) => {
                return Err(mismatch(&steps[..depth], "array", other));
            }
        };
        current = match next {
            Some(Value::Null) | None => {
                return Err(PathError::Missing {
                    at: render(&steps[..=depth]),
                })
            }
            Some(value) => value,
        };
    }
    Ok(current)
}

/// Like [`lookup`], but the final node must be an object.
pub fn object_at<'v>(root: &'v Value, steps: &[Step<'_>]) -> Result<&'v Value, PathError> {
    let value = lookup(root, steps)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(mismatch(steps, "object", value))
    }
}

/// The list at `steps`, or an empty slice when it is absent or not a list.
pub fn list_at<'v>(root: &'v Value, steps: &[Step<'_>]) -> &'v [Value] {
    match lookup(root, steps) {
        Ok(Value::Array(items)) => items,
        _ => &[],
    }
}

/// Text at `steps`, or `default`.
///
/// Numbers and booleans are rendered; objects and lists are shape mismatches
/// and fall back to the default.
pub fn text_at(root: &Value, steps: &[Step<'_>], default: &str) -> String {
    lookup(root, steps)
        .ok()
        .and_then(render_scalar)
        .unwrap_or_else(|| default.to_string())
}

/// Scalar at `steps` passed through unchanged, or `default` as a JSON string.
pub fn scalar_at(root: &Value, steps: &[Step<'_>], default: &str) -> Value {
    match lookup(root, steps) {
        Ok(value) if matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)) => {
            value.clone()
        }
        _ => Value::String(default.to_string()),
    }
}

/// Joins the text at `steps` of every item with `", "`, each item falling back to `default`.
pub fn joined_text(items: &[Value], steps: &[Step<'_>], default: &str) -> String {
    items
        .iter()
        .map(|item| text_at(item, steps, default))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Loose truthiness: `false`, `null`, zero, and empty strings, lists or objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn mismatch(steps: &[Step<'_>], expected: &'static str, found: &Value) -> PathError {
    PathError::ShapeMismatch {
        at: render(steps),
        expected,
        found: kind_name(found),
    }
}

fn render(steps: &[Step<'_>]) -> String {
    let mut out = String::from("$");
    for step in steps {
        out.push_str(&step.to_string());
    }
    out
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
