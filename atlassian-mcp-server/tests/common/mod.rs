/// Common utilities for Atlassian MCP Server integration tests
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

const SERVER_BINARY: &str = env!("CARGO_BIN_EXE_atlassian-mcp-server");

/// Base command for the server binary, isolated from the developer's own config
///
/// HOME and the working directory point at `sandbox` so no default config
/// file is found, and any inherited `ATLASSIAN_*` variables are cleared.
pub fn server_command(sandbox: &Path) -> Command {
    let mut command = Command::new(SERVER_BINARY);
    command
        .current_dir(sandbox)
        .env("HOME", sandbox)
        .env("RUST_LOG", "error")
        .env_remove("ATLASSIAN_DOMAIN")
        .env_remove("ATLASSIAN_EMAIL")
        .env_remove("ATLASSIAN_API_TOKEN");
    command
}

/// MCP Test Client for sending JSON-RPC requests to the server
#[allow(dead_code)]
pub struct McpTestClient {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    initialize_response: Value,
    _sandbox: TempDir,
}

#[allow(dead_code)]
impl McpTestClient {
    /// Spawn the server against `domain` and complete the MCP handshake
    pub fn new(domain: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let sandbox = TempDir::new()?;

        let mut child = server_command(sandbox.path())
            .env("ATLASSIAN_DOMAIN", domain)
            .env("ATLASSIAN_EMAIL", "user@example.com")
            .env("ATLASSIAN_API_TOKEN", "secret")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = child.stdin.take().ok_or("Failed to open stdin")?;
        let stdout = child.stdout.take().ok_or("Failed to open stdout")?;

        let mut client = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            initialize_response: Value::Null,
            _sandbox: sandbox,
        };

        let response = client.initialize()?;
        if response.get("error").is_some() {
            return Err(format!("Initialization failed: {:?}", response["error"]).into());
        }
        client.initialize_response = response;

        Ok(client)
    }

    /// Reply to the handshake's `initialize`
    pub fn initialize_response(&self) -> &Value {
        &self.initialize_response
    }

    /// Send `initialize` and the `initialized` notification
    fn initialize(&mut self) -> Result<Value, Box<dyn std::error::Error>> {
        let response = self.request(
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {
                    "name": "rust-test-client",
                    "version": "1.0.0"
                }
            }),
        )?;

        self.send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))?;
        Ok(response)
    }

    /// Send a request with a fresh id and wait for its response
    pub fn request(
        &mut self,
        method: &str,
        params: Value,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);

        self.send(&json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": method,
            "params": params
        }))?;
        self.read_response()
    }

    /// Call an MCP tool
    pub fn call_tool(
        &mut self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        self.request(
            "tools/call",
            json!({
                "name": tool_name,
                "arguments": arguments
            }),
        )
    }

    /// Write one raw line to the server
    pub fn send_line(&mut self, line: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.send_bytes(line.as_bytes())
    }

    /// Write one line of arbitrary bytes, which need not be UTF-8
    pub fn send_bytes(&mut self, line: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        self.stdin.write_all(line)?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn send(&mut self, message: &Value) -> Result<(), Box<dyn std::error::Error>> {
        let line = serde_json::to_string(message)?;
        self.send_line(&line)
    }

    /// Read a JSON-RPC response
    pub fn read_response(&mut self) -> Result<Value, Box<dyn std::error::Error>> {
        let mut line = String::new();
        self.stdout.read_line(&mut line)?;

        if line.is_empty() {
            return Err("Server closed connection".into());
        }

        Ok(serde_json::from_str(&line)?)
    }

    /// Text of the first content item, plus the `isError` flag
    pub fn tool_text(response: &Value) -> Result<(String, bool), String> {
        if let Some(error) = response.get("error") {
            return Err(format!("Tool call failed: {:?}", error));
        }

        let result = response.get("result").ok_or("No result in response")?;

        let text = result
            .get("content")
            .and_then(Value::as_array)
            .and_then(|content| content.iter().find(|item| item["type"] == "text"))
            .and_then(|item| item["text"].as_str())
            .ok_or("No text content found")?;

        let is_error = result
            .get("isError")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok((text.to_string(), is_error))
    }

    /// Parse the tool result text as JSON
    pub fn extract_tool_result(response: &Value) -> Result<Value, String> {
        let (text, _) = Self::tool_text(response)?;
        serde_json::from_str(&text).map_err(|e| {
            format!(
                "Failed to parse tool result JSON: {}. Text was: {}",
                e, text
            )
        })
    }
}

impl Drop for McpTestClient {
    fn drop(&mut self) {
        // Kill the server process when the client is dropped
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Run the server without credentials and collect its exit status and stderr
#[allow(dead_code)]
pub fn run_unconfigured(
    args: &[&str],
) -> Result<(std::process::ExitStatus, String), Box<dyn std::error::Error>> {
    let sandbox = TempDir::new()?;

    let mut child = server_command(sandbox.path())
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut stderr = String::new();
    child
        .stderr
        .take()
        .ok_or("Failed to open stderr")?
        .read_to_string(&mut stderr)?;
    let status = child.wait()?;

    Ok((status, stderr))
}
