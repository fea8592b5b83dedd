/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Processes tool calls against the mood journal
/// 3. Sends JSON-RPC responses to stdout

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{MoodJournalServer, ServerError};

/// MCP server that handles communication with Claude
pub struct McpServer {
    journal: MoodJournalServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
}

/// Schema-backed tool definition
fn tool_definition<T: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(T);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({"type": "object"})),
    }
}

/// All tools this server exposes
fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool_definition::<tools::LogMoodParams>(
            "mood_log",
            "Log how you feel (Sad, Neutral, Happy, Very Happy, Ecstatic) for today or a past date",
        ),
        tool_definition::<tools::LogFoodParams>(
            "food_log",
            "Log what you ate for today or a past date",
        ),
        tool_definition::<tools::LogProductivityParams>(
            "productivity_log",
            "Rate your productivity from 1 to 10 for a day",
        ),
        tool_definition::<tools::WriteJournalParams>(
            "journal_write",
            "Write a free-text journal entry",
        ),
        tool_definition::<tools::ListJournalParams>(
            "journal_list",
            "Read back your most recent journal entries",
        ),
        tool_definition::<tools::LogWeatherParams>(
            "weather_log",
            "Record the weather for a day so it can be correlated with mood",
        ),
        tool_definition::<tools::StreakStatusParams>(
            "streak_status",
            "Check your logging streak and achievement progress",
        ),
        tool_definition::<tools::InsightsParams>(
            "mood_insights",
            "Get mood correlations with weather, food and weekday, plus a prediction for tomorrow",
        ),
    ]
}

/// Deserialize tool arguments into a parameter struct
fn parse_args<P: DeserializeOwned>(args: Map<String, Value>) -> Result<P, ToolCallResult> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolCallResult::error(format!("Invalid arguments: {}", e)))
}

/// Turn a tool outcome into an MCP result
fn to_tool_result<T: Serialize>(
    outcome: Result<T, ToolError>,
    message: impl FnOnce(&T) -> String,
) -> ToolCallResult {
    match outcome {
        Ok(response) => {
            let text = message(&response);
            ToolCallResult::success(text, serde_json::to_value(&response).ok())
        }
        Err(e) => {
            warn!("Tool call failed: {}", e);
            ToolCallResult::error(e.to_string())
        }
    }
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(journal: MoodJournalServer) -> Self {
        Self {
            journal,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a JSON-RPC request; notifications get no response
    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            self.handle_notification(&request.method);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };

        Some(response)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Mood Journal MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        JsonRpcResponse::from_serializable(id, &result)
    }

    /// Handle tools/call request
    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        if !self.initialized {
            debug!("Tool call '{}' before initialized notification", tool_params.name);
        }

        let result = self.call_tool(&tool_params.name, tool_params.arguments).await;
        JsonRpcResponse::from_serializable(id, &result)
    }

    /// Route a tool call to its implementation
    async fn call_tool(&self, name: &str, args: Map<String, Value>) -> ToolCallResult {
        let storage = self.journal.storage();
        let analytics = self.journal.analytics();
        let user = self.journal.user();

        match name {
            "mood_log" => match parse_args(args) {
                Ok(p) => to_tool_result(tools::log_mood(storage, analytics, user, p), |r| r.message.clone()),
                Err(e) => e,
            },
            "food_log" => match parse_args(args) {
                Ok(p) => to_tool_result(tools::log_food(storage, analytics, user, p), |r| r.message.clone()),
                Err(e) => e,
            },
            "productivity_log" => match parse_args(args) {
                Ok(p) => to_tool_result(tools::log_productivity(storage, analytics, user, p), |r| r.message.clone()),
                Err(e) => e,
            },
            "journal_write" => match parse_args(args) {
                Ok(p) => to_tool_result(tools::write_journal(storage, analytics, user, p), |r| r.message.clone()),
                Err(e) => e,
            },
            "journal_list" => match parse_args(args) {
                Ok(p) => to_tool_result(tools::list_journal(storage, user, p), |r| r.message.clone()),
                Err(e) => e,
            },
            "weather_log" => match parse_args(args) {
                Ok(p) => to_tool_result(tools::log_weather(storage, analytics, user, p), |r| r.message.clone()),
                Err(e) => e,
            },
            "streak_status" => match parse_args(args) {
                Ok(p) => to_tool_result(tools::get_streak_status(storage, analytics, user, p), |r| r.message.clone()),
                Err(e) => e,
            },
            "mood_insights" => match parse_args(args) {
                Ok(p) => to_tool_result(
                    tools::get_mood_insights(storage, analytics, user, p).await,
                    |r| r.message.clone(),
                ),
                Err(e) => e,
            },
            _ => ToolCallResult::error(format!("Unknown tool: {}", name)),
        }
    }
}
