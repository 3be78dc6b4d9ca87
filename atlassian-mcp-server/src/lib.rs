//! Atlassian MCP Server Library
//!
//! Exposes Confluence and Jira Cloud REST operations as MCP tools over stdio.
//! Each tool call becomes one (or a short, fixed sequence of) authenticated
//! HTTP request(s), and the JSON result is relayed back as tool text.
//!
//! ## Features
//!
//! - **Layered configuration**: config file, then environment, then CLI flags
//! - **Data-driven tools**: 13 Confluence and 38 Jira tools declared as tables
//! - **Isolated calls**: every request runs on its own task; a failing tool call
//!   becomes an `isError` result and never stops the server
//! - **Robust framing**: a malformed input line gets a JSON-RPC error reply and
//!   the session keeps reading

pub mod atlassian_client;
pub mod config;
pub mod error;
pub mod tools;
pub mod transport;

use crate::atlassian_client::{ApiRequester, AtlassianClient};
use crate::config::AtlassianConfig;
use crate::error::AtlassianMcpResult;
use crate::tools::{ToolDispatcher, ToolRegistry};

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation, JsonObject,
    ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{info, instrument, warn};

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "atlassian-mcp";

/// Atlassian MCP Server
///
/// MCP handler over the tool dispatcher. Cheap to clone; clones share the
/// registry and HTTP client.
#[derive(Clone)]
pub struct AtlassianMcpServer {
    dispatcher: ToolDispatcher,
}

impl AtlassianMcpServer {
    /// Create a server talking to the Atlassian instance in `config`
    #[instrument(skip(config), fields(domain = %config.domain()))]
    pub fn new(config: AtlassianConfig) -> AtlassianMcpResult<Self> {
        info!("Initializing Atlassian MCP Server");

        let client = AtlassianClient::new(Arc::new(config))?;
        let server = Self::with_requester(Arc::new(client));

        info!(
            "Atlassian MCP Server initialized with {} tools",
            server.dispatcher.registry().len()
        );
        Ok(server)
    }

    /// Create a server over any request primitive
    pub fn with_requester(requester: Arc<dyn ApiRequester>) -> Self {
        let registry = Arc::new(ToolRegistry::new());
        Self {
            dispatcher: ToolDispatcher::new(registry, requester),
        }
    }

    /// Configure logging for the STDIO transport
    ///
    /// stdout carries protocol messages only, so all logs go to stderr.
    /// `RUST_LOG` overrides the default `info` level.
    pub fn configure_stdio_logging() {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        // A second initialization (e.g. in tests) is harmless
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(false)
            .try_init();
    }

    /// Run a tool; failures become `isError` results
    pub async fn run_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let arguments = arguments.map(Value::Object).unwrap_or(Value::Null);

        match self.dispatcher.call(name, arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                warn!(
                    tool = %name,
                    category = e.category(),
                    code = e.error_code(),
                    "Tool call failed: {}",
                    e
                );
                CallToolResult::error(vec![Content::text(format!("Error: {}", e))])
            }
        }
    }

    /// Serve MCP on stdin/stdout until stdin closes
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        self.serve_io(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve MCP over any reader/writer pair
    ///
    /// Each request runs on its own task and a single writer task owns the
    /// output, so slow calls never block fast ones.
    pub async fn serve_io<R, W>(self, reader: R, writer: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (line_transport, tasks) = transport::spawn(reader, writer);

        let service = self.serve(line_transport).await?;
        let quit_reason = service.waiting().await?;
        info!(?quit_reason, "MCP session ended");

        tasks.finish().await
    }
}

impl ServerHandler for AtlassianMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _pagination: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(
            self.dispatcher.registry().definitions(),
        ))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.run_tool(&request.name, request.arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlassian_client::RequestOptions;
    use crate::error::AtlassianMcpError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;
    use tokio::io::{
        AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
    };
    use tokio::task::JoinHandle;

    /// Answers by path: `/slow` waits, `/fail` returns a 500
    struct StubRequester;

    #[async_trait]
    impl ApiRequester for StubRequester {
        async fn request(
            &self,
            path: &str,
            _options: RequestOptions,
        ) -> AtlassianMcpResult<Option<Value>> {
            if path.contains("slow") {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            if path.contains("fail") {
                return Err(AtlassianMcpError::transport(500, "boom"));
            }
            Ok(Some(json!({ "path": path })))
        }
    }

    fn server() -> AtlassianMcpServer {
        AtlassianMcpServer::with_requester(Arc::new(StubRequester))
    }

    /// Client end of an in-memory stdio session
    struct Session {
        input: WriteHalf<DuplexStream>,
        output: Lines<BufReader<ReadHalf<DuplexStream>>>,
        handle: JoinHandle<anyhow::Result<()>>,
    }

    impl Session {
        /// Start serving and complete the handshake; returns the initialize reply too
        async fn open() -> (Self, Value) {
            let (client_end, server_end) = tokio::io::duplex(64 * 1024);
            let (server_read, server_write) = tokio::io::split(server_end);
            let (client_read, client_write) = tokio::io::split(client_end);

            let handle = tokio::spawn(server().serve_io(server_read, server_write));
            let mut session = Session {
                input: client_write,
                output: BufReader::new(client_read).lines(),
                handle,
            };

            session
                .send(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "initialize",
                    "params": {
                        "protocolVersion": "2024-11-05",
                        "capabilities": {},
                        "clientInfo": { "name": "test-client", "version": "1.0.0" }
                    }
                }))
                .await;
            let reply = session.reply().await;
            session
                .send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
                .await;

            (session, reply)
        }

        async fn send_raw(&mut self, line: &[u8]) {
            self.input.write_all(line).await.unwrap();
            self.input.write_all(b"\n").await.unwrap();
            self.input.flush().await.unwrap();
        }

        async fn send(&mut self, message: Value) {
            self.send_raw(message.to_string().as_bytes()).await;
        }

        async fn reply(&mut self) -> Value {
            let line = self.output.next_line().await.unwrap().expect("server closed output");
            serde_json::from_str(&line).unwrap()
        }

        async fn request(&mut self, id: i64, method: &str, params: Value) -> Value {
            self.send(json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
                .await;
            self.reply().await
        }

        /// Close stdin and wait for the server to wind down
        async fn close(mut self) {
            self.input.shutdown().await.unwrap();
            drop(self.input);
            self.handle.await.unwrap().unwrap();
        }
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();

        assert_eq!(info.server_info.name, SERVER_NAME);
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.protocol_version, ProtocolVersion::V_2024_11_05);
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn test_initialize_and_list_tools() {
        let (mut session, init) = Session::open().await;

        assert_eq!(init["id"], 1);
        assert_eq!(init["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(init["result"]["serverInfo"]["name"], "atlassian-mcp");
        assert_eq!(init["result"]["capabilities"], json!({ "tools": {} }));

        let response = session.request(2, "tools/list", json!({})).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 51);
        assert_eq!(tools[0]["name"], "confluence_list_spaces");
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));

        session.close().await;
    }

    #[tokio::test]
    async fn test_tool_errors_are_results() {
        let result = serde_json::to_value(server().run_tool("nope", None).await).unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "Error: Unknown tool: nope");

        let result = server()
            .run_tool(
                "jira_get_transitions",
                json!({"issueKey": "PROJ-1"}).as_object().cloned(),
            )
            .await;
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_calls_answer_concurrently_and_isolate_failures() {
        let (mut session, _) = Session::open().await;

        let call = |id: i64, issue_key: &str| {
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": "tools/call",
                "params": {"name": "jira_get_transitions", "arguments": {"issueKey": issue_key}}
            })
        };
        session.send(call(2, "slow")).await;
        session.send(call(3, "fail")).await;
        session
            .send(json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}))
            .await;

        let responses = vec![
            session.reply().await,
            session.reply().await,
            session.reply().await,
        ];

        // The slow call finishes last even though it was sent first
        assert_eq!(responses[2]["id"], 2);
        assert_eq!(responses[2]["result"]["isError"], false);

        let by_id = |id: i64| responses.iter().find(|r| r["id"] == id).unwrap().clone();
        assert_eq!(by_id(3)["result"]["isError"], true);
        assert_eq!(
            by_id(3)["result"]["content"][0]["text"],
            "Error: Atlassian API error (500): boom"
        );
        assert_eq!(by_id(4)["result"], json!({}));

        session.close().await;
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_the_session() {
        let (mut session, _) = Session::open().await;

        session.send_raw(b"\xff\xfe garbage").await;
        let reply = session.reply().await;
        assert_eq!(reply["id"], Value::Null);
        assert_eq!(reply["error"]["code"], -32700);

        let reply = session.request(3, "ping", json!({})).await;
        assert_eq!(reply["id"], 3);
        assert_eq!(reply["result"], json!({}));

        session.close().await;
    }

    #[tokio::test]
    async fn test_protocol_errors_keep_the_session_alive() {
        let (mut session, _) = Session::open().await;

        session.send_raw(b"").await;
        session.send_raw(b"{not json").await;
        assert_eq!(session.reply().await["error"]["code"], -32700);

        let reply = session.request(2, "tools/teleport", json!({})).await;
        assert_eq!(reply["id"], 2);
        assert_eq!(reply["error"]["code"], -32601);

        let reply = session
            .request(3, "tools/call", json!({"arguments": {}}))
            .await;
        assert_eq!(reply["id"], 3);
        assert_eq!(reply["error"]["code"], -32602);

        let reply = session.request(4, "ping", json!({})).await;
        assert_eq!(reply["result"], json!({}));

        session.close().await;
    }
}
