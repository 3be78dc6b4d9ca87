//! Declarative tool records
//!
//! A tool is pure data: its parameter schema, the endpoint it calls, how the
//! call is repeated or chained, and how the result is turned into text. The
//! tables in [`super::confluence`] and [`super::jira`] are built from these types
//! and interpreted by [`super::ToolDispatcher`].

use crate::atlassian_client::HttpMethod;
use serde_json::{json, Map, Value};

/// Declared JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    StringArray,
    /// Array of objects, each validated against the nested parameter list
    ObjectArray(&'static [ParamSpec]),
}

/// One named tool argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
    pub choices: &'static [&'static str],
}

impl ParamSpec {
    const fn of(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            choices: &[],
        }
    }

    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::of(name, ParamKind::String, description)
    }

    pub const fn number(name: &'static str, description: &'static str) -> Self {
        Self::of(name, ParamKind::Number, description)
    }

    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::of(name, ParamKind::Boolean, description)
    }

    pub const fn string_array(name: &'static str, description: &'static str) -> Self {
        Self::of(name, ParamKind::StringArray, description)
    }

    pub const fn object_array(
        name: &'static str,
        description: &'static str,
        items: &'static [ParamSpec],
    ) -> Self {
        Self::of(name, ParamKind::ObjectArray(items), description)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict a string parameter to a fixed set of values
    pub const fn one_of(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    /// JSON Schema fragment for this parameter
    pub fn schema(&self) -> Value {
        let mut schema = match self.kind {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Number => json!({ "type": "number" }),
            ParamKind::Boolean => json!({ "type": "boolean" }),
            ParamKind::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            ParamKind::ObjectArray(items) => json!({ "type": "array", "items": object_schema(items) }),
        };

        if let Value::Object(map) = &mut schema {
            if !self.description.is_empty() {
                map.insert("description".to_string(), json!(self.description));
            }
            if !self.choices.is_empty() {
                map.insert("enum".to_string(), json!(self.choices));
            }
        }
        schema
    }
}

/// `{type:"object", properties, required?}` for a parameter list
///
/// `required` is omitted when no parameter is required.
pub fn object_schema(params: &[ParamSpec]) -> Map<String, Value> {
    let properties: Map<String, Value> = params
        .iter()
        .map(|p| (p.name.to_string(), p.schema()))
        .collect();
    let required: Vec<&str> = params.iter().filter(|p| p.required).map(|p| p.name).collect();

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), json!(required));
    }
    schema
}

/// Literal value baked into a tool record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Str(&'static str),
    Bool(bool),
    Int(i64),
    StrList(&'static [&'static str]),
    EmptyObject,
}

impl ConstValue {
    pub fn to_value(self) -> Value {
        match self {
            ConstValue::Str(s) => json!(s),
            ConstValue::Bool(b) => json!(b),
            ConstValue::Int(i) => json!(i),
            ConstValue::StrList(items) => json!(items),
            ConstValue::EmptyObject => json!({}),
        }
    }
}

/// Where a query value or body field comes from
///
/// "Provided" below means present, not null, and not an empty string. Sources
/// that yield nothing leave their key out of the query or body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    /// The argument, when provided
    Arg(&'static str),
    /// The argument, when provided and not an empty array
    NonEmpty(&'static str),
    /// The argument, or a default when not provided
    ArgOr(&'static str, ConstValue),
    Const(ConstValue),
    /// A text argument wrapped in a single-paragraph rich-text document
    Adf(&'static str),
    /// `{key: argument}`
    Keyed(&'static str, &'static str),
    /// A numeric argument plus one
    Incremented(&'static str),
    /// The first argument, only when the second is not provided
    ArgUnless(&'static str, &'static str),
    /// `{name}` placeholders filled from the arguments
    Template(&'static str),
    /// `true` when the boolean argument is `true`, nothing otherwise
    Flag(&'static str),
    /// One object per element of an array argument, each built from `fields`
    /// with the element's own keys as arguments
    EachOf {
        arg: &'static str,
        fields: &'static [BodyField],
    },
}

/// Query string entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryParam {
    pub key: &'static str,
    pub source: Source,
}

/// JSON body entry
///
/// `target` is a dotted path; numeric segments index into arrays, so
/// `update.comment.0.add.body` builds `{"update":{"comment":[{"add":{"body":…}}]}}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyField {
    pub target: &'static str,
    pub source: Source,
}

pub const fn query(key: &'static str, source: Source) -> QueryParam {
    QueryParam { key, source }
}

pub const fn field(target: &'static str, source: Source) -> BodyField {
    BodyField { target, source }
}

/// Request body shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Body {
    None,
    Object(&'static [BodyField]),
    /// The named argument sent as the whole body
    Arg(&'static str),
}

/// One HTTP call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// Root-relative path; `{name}` placeholders are percent-encoded arguments
    pub path: &'static str,
    pub query: &'static [QueryParam],
    pub body: Body,
}

impl Endpoint {
    pub const fn get(path: &'static str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub const fn post(path: &'static str) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub const fn put(path: &'static str) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub const fn delete(path: &'static str) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    const fn new(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            query: &[],
            body: Body::None,
        }
    }

    pub const fn with_query(mut self, query: &'static [QueryParam]) -> Self {
        self.query = query;
        self
    }

    pub const fn with_body(mut self, fields: &'static [BodyField]) -> Self {
        self.body = Body::Object(fields);
        self
    }

    pub const fn with_raw_body(mut self, arg: &'static str) -> Self {
        self.body = Body::Arg(arg);
        self
    }
}

/// How each element of a fanned-out array is exposed to the endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bind {
    /// Bound as a single argument under this name
    As(&'static str),
    /// An object element whose keys are merged over the arguments
    Merge,
}

/// Execution strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    /// One call
    Single,
    /// One call per element of the `over` array; results are collected in order
    FanOut {
        over: &'static str,
        bind: Bind,
        concurrent: bool,
    },
    /// When `when_missing` is not provided, call `prelude` first and bind its
    /// `bind_from` response field under that name
    Chained {
        when_missing: &'static str,
        prelude: Endpoint,
        bind_from: &'static str,
    },
}

/// How the call result becomes tool text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    /// Pretty-printed JSON of the result
    Json,
    /// Fixed text; `{name}` inserts an argument, `{#name}` an array length
    Message(&'static str),
    /// `on` when the boolean argument `flag` is true, `off` otherwise
    Flagged {
        flag: &'static str,
        on: &'static str,
        off: &'static str,
    },
}

/// A complete tool record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub endpoint: Endpoint,
    pub dispatch: Dispatch,
    pub reply: Reply,
}

impl ToolSpec {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        params: &'static [ParamSpec],
        endpoint: Endpoint,
    ) -> Self {
        Self {
            name,
            description,
            params,
            endpoint,
            dispatch: Dispatch::Single,
            reply: Reply::Json,
        }
    }

    pub const fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub const fn reply(mut self, reply: Reply) -> Self {
        self.reply = reply;
        self
    }

    pub const fn message(self, template: &'static str) -> Self {
        self.reply(Reply::Message(template))
    }

    pub fn input_schema(&self) -> Map<String, Value> {
        object_schema(self.params)
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM: &[ParamSpec] = &[
        ParamSpec::string("name", "").required(),
        ParamSpec::boolean("released", ""),
    ];

    const PARAMS: &[ParamSpec] = &[
        ParamSpec::string("status", "Filter by status").one_of(&["current", "archived"]),
        ParamSpec::number("limit", "Page size"),
        ParamSpec::string_array("labels", "Labels").required(),
        ParamSpec::object_array("versions", "Versions", ITEM),
    ];

    #[test]
    fn test_object_schema() {
        let schema = object_schema(PARAMS);

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["labels"]));
        assert_eq!(schema["properties"]["status"]["enum"], json!(["current", "archived"]));
        assert_eq!(schema["properties"]["limit"]["type"], "number");
        assert_eq!(schema["properties"]["labels"]["items"]["type"], "string");

        let item = &schema["properties"]["versions"]["items"];
        assert_eq!(item["type"], "object");
        assert_eq!(item["required"], json!(["name"]));
        assert!(item["properties"]["name"].get("description").is_none());
    }

    #[test]
    fn test_required_omitted_when_empty() {
        let schema = object_schema(&[ParamSpec::number("limit", "Page size")]);
        assert!(schema.get("required").is_none());

        let schema = object_schema(&[]);
        assert_eq!(Value::Object(schema), json!({ "type": "object", "properties": {} }));
    }

    #[test]
    fn test_builders() {
        const QUERY: &[QueryParam] = &[query("limit", Source::ArgOr("limit", ConstValue::Int(25)))];
        let endpoint = Endpoint::put("/x/{id}").with_query(QUERY);
        assert_eq!(endpoint.method, HttpMethod::Put);
        assert_eq!(endpoint.body, Body::None);
        assert_eq!(endpoint.query.len(), 1);

        let tool = ToolSpec::new("t", "d", PARAMS, endpoint).message("done");
        assert_eq!(tool.dispatch, Dispatch::Single);
        assert_eq!(tool.reply, Reply::Message("done"));
        assert!(tool.param("labels").is_some_and(|p| p.required));
        assert!(tool.param("missing").is_none());
    }
}
