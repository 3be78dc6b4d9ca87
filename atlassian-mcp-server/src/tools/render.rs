//! Turning tool arguments into request paths, query strings and JSON bodies

use super::record::{Body, BodyField, Endpoint, QueryParam, Source};
use crate::error::{AtlassianMcpError, AtlassianMcpResult};
use serde_json::map::Entry;
use serde_json::{json, Map, Value};

pub type Args = Map<String, Value>;

/// Argument value when present, not null, and not an empty string
pub fn provided<'a>(args: &'a Args, name: &str) -> Option<&'a Value> {
    args.get(name)
        .filter(|v| !v.is_null() && v.as_str() != Some(""))
}

/// Single-paragraph Atlassian Document Format wrapper around plain text
pub fn adf_document(text: &str) -> Value {
    json!({
        "type": "doc",
        "version": 1,
        "content": [{
            "type": "paragraph",
            "content": [{ "type": "text", "text": text }]
        }]
    })
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fill `{name}` and `{#name}` placeholders
///
/// `{#name}` is the length of an array argument. With `encode`, substituted
/// values are percent-encoded for use in a URL path.
pub fn render_template(template: &str, args: &Args, encode: bool) -> AtlassianMcpResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            AtlassianMcpError::internal(format!("Unterminated placeholder in '{}'", template))
        })?;
        let placeholder = &after[..close];

        let text = match placeholder.strip_prefix('#') {
            Some(name) => args
                .get(name)
                .and_then(Value::as_array)
                .map(|items| items.len().to_string())
                .ok_or_else(|| AtlassianMcpError::invalid_param(name, "must be an array"))?,
            None => {
                let value = provided(args, placeholder).ok_or_else(|| {
                    AtlassianMcpError::invalid_param(placeholder, "is required")
                })?;
                display(value)
            }
        };

        if encode {
            out.push_str(&urlencoding::encode(&text));
        } else {
            out.push_str(&text);
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Resolve a source against the arguments; `None` leaves the key out
pub fn evaluate(source: &Source, args: &Args) -> AtlassianMcpResult<Option<Value>> {
    let value = match *source {
        Source::Arg(name) => provided(args, name).cloned(),
        Source::NonEmpty(name) => provided(args, name)
            .filter(|v| v.as_array().map_or(true, |items| !items.is_empty()))
            .cloned(),
        Source::ArgOr(name, default) => {
            Some(provided(args, name).cloned().unwrap_or_else(|| default.to_value()))
        }
        Source::Const(value) => Some(value.to_value()),
        Source::Adf(name) => provided(args, name).map(|v| adf_document(&display(v))),
        Source::Keyed(name, key) => provided(args, name).map(|v| json!({ key: v })),
        Source::Incremented(name) => match provided(args, name) {
            None => None,
            Some(v) => Some(increment(name, v)?),
        },
        Source::ArgUnless(name, other) => match provided(args, other) {
            Some(_) => None,
            None => provided(args, name).cloned(),
        },
        Source::Template(template) => Some(Value::String(render_template(template, args, false)?)),
        Source::Flag(name) => (args.get(name) == Some(&Value::Bool(true))).then_some(Value::Bool(true)),
        Source::EachOf { arg, fields } => match provided(args, arg) {
            None => None,
            Some(value) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| AtlassianMcpError::invalid_param(arg, "must be an array"))?;
                let built = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let item = item.as_object().ok_or_else(|| {
                            AtlassianMcpError::invalid_param(
                                format!("{}[{}]", arg, i),
                                "must be an object",
                            )
                        })?;
                        build_object(fields, item)
                    })
                    .collect::<AtlassianMcpResult<Vec<_>>>()?;
                Some(Value::Array(built))
            }
        },
    };
    Ok(value)
}

fn increment(name: &str, value: &Value) -> AtlassianMcpResult<Value> {
    if let Some(n) = value.as_i64() {
        return n
            .checked_add(1)
            .map(|next| json!(next))
            .ok_or_else(|| AtlassianMcpError::invalid_param(name, "is too large"));
    }
    value
        .as_f64()
        .map(|n| json!(n + 1.0))
        .ok_or_else(|| AtlassianMcpError::invalid_param(name, "must be a number"))
}

/// Build a JSON object from dotted-path fields
pub fn build_object(fields: &[BodyField], args: &Args) -> AtlassianMcpResult<Value> {
    let mut root = Value::Object(Map::new());
    for field in fields {
        if let Some(value) = evaluate(&field.source, args)? {
            let segments: Vec<&str> = field.target.split('.').collect();
            merge(&mut root, nest(&segments, value));
        }
    }
    Ok(root)
}

/// Wrap `value` in the containers named by `segments`
fn nest(segments: &[&str], value: Value) -> Value {
    match segments.split_first() {
        None => value,
        Some((head, rest)) => {
            let inner = nest(rest, value);
            match head.parse::<usize>() {
                Ok(index) => {
                    let mut items = vec![Value::Null; index];
                    items.push(inner);
                    Value::Array(items)
                }
                Err(_) => {
                    let mut map = Map::new();
                    map.insert((*head).to_string(), inner);
                    Value::Object(map)
                }
            }
        }
    }
}

/// Deep-merge `from` into `into`; nulls in arrays are padding and never overwrite
fn merge(into: &mut Value, from: Value) {
    match (into, from) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.entry(key) {
                    Entry::Occupied(mut slot) => merge(slot.get_mut(), value),
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source)) => {
            for (index, value) in source.into_iter().enumerate() {
                if value.is_null() {
                    continue;
                }
                if index < target.len() {
                    merge(&mut target[index], value);
                } else {
                    target.resize(index, Value::Null);
                    target.push(value);
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(urlencoding::encode(s).into_owned()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => urlencoding::encode(s).into_owned(),
                    other => urlencoding::encode(&other.to_string()).into_owned(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(urlencoding::encode(&value.to_string()).into_owned()),
        other => Some(other.to_string()),
    }
}

/// `?k=v&…` for the provided query values, or an empty string
pub fn render_query(params: &[QueryParam], args: &Args) -> AtlassianMcpResult<String> {
    let mut pairs = Vec::with_capacity(params.len());
    for param in params {
        if let Some(value) = evaluate(&param.source, args)?.as_ref().and_then(query_value) {
            pairs.push(format!("{}={}", param.key, value));
        }
    }

    if pairs.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("?{}", pairs.join("&")))
    }
}

/// Path with placeholders filled and query string appended
pub fn request_path(endpoint: &Endpoint, args: &Args) -> AtlassianMcpResult<String> {
    let path = render_template(endpoint.path, args, true)?;
    let query = render_query(endpoint.query, args)?;
    Ok(format!("{}{}", path, query))
}

/// JSON body for the endpoint, if it sends one
pub fn request_body(body: &Body, args: &Args) -> AtlassianMcpResult<Option<Value>> {
    match *body {
        Body::None => Ok(None),
        Body::Object(fields) => build_object(fields, args).map(Some),
        Body::Arg(name) => provided(args, name)
            .cloned()
            .map(Some)
            .ok_or_else(|| AtlassianMcpError::invalid_param(name, "is required")),
    }
}
