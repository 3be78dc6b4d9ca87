//! Tools module for the Atlassian MCP Server
//!
//! Every tool is a [`ToolSpec`] record in one of the static tables. The
//! [`ToolRegistry`] indexes them once at startup and the [`ToolDispatcher`]
//! validates arguments and executes a record against an [`ApiRequester`].

pub mod confluence;
pub mod jira;
pub mod record;
pub mod render;

pub use record::{ParamKind, ParamSpec, ToolSpec};

use crate::atlassian_client::{ApiRequester, RequestOptions};
use crate::error::{AtlassianMcpError, AtlassianMcpResult};
use futures::future::try_join_all;
use record::{Bind, Dispatch, Endpoint, Reply};
use render::{provided, Args};
use rmcp::model::Tool;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Name → tool record index, built once
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<&'static ToolSpec>,
    by_name: HashMap<&'static str, &'static ToolSpec>,
}

impl ToolRegistry {
    /// Registry of every Confluence tool followed by every Jira tool
    pub fn new() -> Self {
        Self::from_specs(confluence::TOOLS.iter().chain(jira::TOOLS.iter()))
    }

    pub fn from_specs(specs: impl IntoIterator<Item = &'static ToolSpec>) -> Self {
        let tools: Vec<&'static ToolSpec> = specs.into_iter().collect();
        let by_name = tools.iter().map(|tool| (tool.name, *tool)).collect();
        Self { tools, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&'static ToolSpec> {
        self.by_name.get(name).copied()
    }

    /// Tools in registration order
    pub fn tools(&self) -> &[&'static ToolSpec] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// `tools/list` entries in registration order
    pub fn definitions(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|tool| Tool::new(tool.name, tool.description, Arc::new(tool.input_schema())))
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check arguments against the declared parameters
///
/// `prefix` qualifies nested names, e.g. `issues[2].summary`.
pub fn validate_arguments(params: &[ParamSpec], args: &Args, prefix: &str) -> AtlassianMcpResult<()> {
    for param in params {
        let qualified = format!("{}{}", prefix, param.name);
        let value = match args.get(param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(AtlassianMcpError::invalid_param(qualified, "is required"));
                }
                continue;
            }
            Some(value) => value,
        };

        let matches = match param.kind {
            ParamKind::String => value.is_string(),
            ParamKind::Number => value.is_number(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            ParamKind::ObjectArray(items) => match value.as_array() {
                None => false,
                Some(elements) => {
                    for (index, element) in elements.iter().enumerate() {
                        let element_name = format!("{}[{}]", qualified, index);
                        let object = element.as_object().ok_or_else(|| {
                            AtlassianMcpError::invalid_param(&element_name, "must be an object")
                        })?;
                        validate_arguments(items, object, &format!("{}.", element_name))?;
                    }
                    true
                }
            },
        };

        if !matches {
            return Err(AtlassianMcpError::invalid_param(
                qualified,
                format!("must be {}", kind_name(&param.kind)),
            ));
        }

        if let (false, Some(choice)) = (param.choices.is_empty(), value.as_str()) {
            if !param.choices.contains(&choice) {
                return Err(AtlassianMcpError::invalid_param(
                    qualified,
                    format!("must be one of: {}", param.choices.join(", ")),
                ));
            }
        }
    }
    Ok(())
}

fn kind_name(kind: &ParamKind) -> &'static str {
    match kind {
        ParamKind::String => "a string",
        ParamKind::Number => "a number",
        ParamKind::Boolean => "a boolean",
        ParamKind::StringArray => "an array of strings",
        ParamKind::ObjectArray(_) => "an array of objects",
    }
}

/// Executes tool records against the remote API
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    requester: Arc<dyn ApiRequester>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, requester: Arc<dyn ApiRequester>) -> Self {
        Self {
            registry,
            requester,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run a tool by name and render its reply text
    ///
    /// Arguments are validated before any request is issued.
    #[instrument(skip(self, arguments))]
    pub async fn call(&self, name: &str, arguments: Value) -> AtlassianMcpResult<String> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| AtlassianMcpError::unknown_tool(name))?;

        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => Args::new(),
            _ => {
                return Err(AtlassianMcpError::invalid_param(
                    "arguments",
                    "must be an object",
                ))
            }
        };
        validate_arguments(tool.params, &args, "")?;

        info!("Calling tool {}", tool.name);
        let result = self.execute(tool, &args).await?;
        render_reply(&tool.reply, &args, result)
    }

    async fn execute(&self, tool: &ToolSpec, args: &Args) -> AtlassianMcpResult<Option<Value>> {
        match tool.dispatch {
            Dispatch::Single => self.send(&tool.endpoint, args).await,
            Dispatch::FanOut {
                over,
                bind,
                concurrent,
            } => {
                let items = args.get(over).and_then(Value::as_array).ok_or_else(|| {
                    AtlassianMcpError::invalid_param(over, "must be an array")
                })?;
                let bound = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| bind_item(args, bind, over, index, item))
                    .collect::<AtlassianMcpResult<Vec<_>>>()?;

                debug!(
                    "Fanning out {} over {} items ({})",
                    tool.name,
                    bound.len(),
                    if concurrent { "concurrent" } else { "sequential" }
                );

                let results = if concurrent {
                    try_join_all(bound.iter().map(|item| self.send(&tool.endpoint, item))).await?
                } else {
                    let mut results = Vec::with_capacity(bound.len());
                    for item in &bound {
                        results.push(self.send(&tool.endpoint, item).await?);
                    }
                    results
                };

                Ok(Some(Value::Array(
                    results
                        .into_iter()
                        .map(|result| result.unwrap_or(Value::Null))
                        .collect(),
                )))
            }
            Dispatch::Chained {
                when_missing,
                prelude,
                bind_from,
            } => {
                let mut args = args.clone();
                if provided(&args, when_missing).is_none() {
                    let created = self.send(&prelude, &args).await?;
                    let bound = created
                        .as_ref()
                        .and_then(|value| value.get(bind_from))
                        .filter(|value| !value.is_null())
                        .cloned()
                        .ok_or_else(|| {
                            AtlassianMcpError::internal(format!(
                                "Response from {} has no '{}'",
                                prelude.path, bind_from
                            ))
                        })?;
                    debug!("Bound {} = {} from {}", when_missing, bound, prelude.path);
                    args.insert(when_missing.to_string(), bound);
                }
                self.send(&tool.endpoint, &args).await
            }
        }
    }

    async fn send(&self, endpoint: &Endpoint, args: &Args) -> AtlassianMcpResult<Option<Value>> {
        let path = render::request_path(endpoint, args)?;
        let options = match render::request_body(&endpoint.body, args)? {
            Some(body) => RequestOptions::json(endpoint.method, &body)?,
            None => RequestOptions::new(endpoint.method),
        };

        self.requester.request(&path, options).await.map_err(|e| {
            warn!("{} {} failed: {}", endpoint.method, endpoint.path, e);
            e
        })
    }
}

fn bind_item(
    args: &Args,
    bind: Bind,
    over: &str,
    index: usize,
    item: &Value,
) -> AtlassianMcpResult<Args> {
    let mut bound = args.clone();
    match bind {
        Bind::As(name) => {
            bound.insert(name.to_string(), item.clone());
        }
        Bind::Merge => {
            let object = item.as_object().ok_or_else(|| {
                AtlassianMcpError::invalid_param(format!("{}[{}]", over, index), "must be an object")
            })?;
            bound.extend(object.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
    Ok(bound)
}

fn render_reply(reply: &Reply, args: &Args, result: Option<Value>) -> AtlassianMcpResult<String> {
    match *reply {
        Reply::Json => Ok(serde_json::to_string_pretty(&result.unwrap_or(Value::Null))?),
        Reply::Message(template) => render::render_template(template, args, false),
        Reply::Flagged { flag, on, off } => {
            let template = if args.get(flag) == Some(&Value::Bool(true)) {
                on
            } else {
                off
            };
            render::render_template(template, args, false)
        }
    }
}
