/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads newline-delimited JSON-RPC requests
/// 2. Routes tool calls to the habit tracker tools
/// 3. Writes JSON-RPC responses back, one per line

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::SqliteStorage;
use crate::tools::{self, ToolError};
use crate::{HabitTrackerServer, ServerError};

/// The calendar date "today" in the server's local time
fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying habit tracker server
    habit_tracker: HabitTrackerServer,
    /// Whether the client has sent its initialized notification
    initialized: bool,
    /// Source of the current date for tracking requests
    today: fn() -> NaiveDate,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_tracker: HabitTrackerServer) -> Self {
        Self {
            habit_tracker,
            initialized: false,
            today: local_today,
        }
    }

    /// Replace the clock used to decide what "today" is
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
    }

    /// Serve requests from `reader` until it reaches end of input
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(req) => req,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a JSON-RPC request; notifications get no response
    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, json!({}))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
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
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                info!("MCP client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match params.map(serde_json::from_value::<InitializeParams>) {
            Some(Ok(params)) => {
                let client = params.client_info.map(|c| format!("{} {}", c.name, c.version));
                info!(
                    "MCP client connected: {} (protocol {})",
                    client.as_deref().unwrap_or("unknown client"),
                    params.protocol_version
                );
            }
            Some(Err(e)) => warn!("Unreadable initialize params: {}", e),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Habit Streak Tracker".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools = vec![
            tool_definition::<tools::CreateHabitParams>(
                "habit_create",
                "Create a new habit. Frequency is 'Daily' or a weekday ('Mon'..'Sun').",
            ),
            tool_definition::<tools::ViewHabitParams>(
                "habit_view",
                "Show one habit with its log, start date and streaks",
            ),
            tool_definition::<tools::ListHabitsParams>(
                "habit_list",
                "List all habits with their streaks",
            ),
            tool_definition::<tools::EditHabitParams>(
                "habit_edit",
                "Change a habit's name, description, frequency or reminder time",
            ),
            tool_definition::<tools::DeleteHabitParams>(
                "habit_delete",
                "Permanently delete a habit and its log",
            ),
            tool_definition::<tools::TrackHabitParams>(
                "habit_track",
                "Mark a habit done (or undone) for today or a past date and update its streaks",
            ),
        ];

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
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

        let arguments = tool_params.arguments.unwrap_or_else(|| json!({}));
        let result = match tool_params.name.as_str() {
            "habit_create" => self.call_habit_create(arguments).await,
            "habit_view" => self.call_habit_view(arguments).await,
            "habit_list" => self.call_habit_list(arguments).await,
            "habit_edit" => self.call_habit_edit(arguments).await,
            "habit_delete" => self.call_habit_delete(arguments).await,
            "habit_track" => self.call_habit_track(arguments).await,
            _ => ToolCallResult::error(format!("Unknown tool: {}", tool_params.name)),
        };

        respond(id, &result)
    }

    async fn call_habit_create(&self, arguments: Value) -> ToolCallResult {
        self.call_tool(arguments, tools::create_habit::<SqliteStorage>, |response: &tools::CreateHabitResponse| {
            format!("{}\nHabit ID: {}", response.message, response.habit_id)
        })
    }

    async fn call_habit_view(&self, arguments: Value) -> ToolCallResult {
        self.call_tool(arguments, tools::view_habit::<SqliteStorage>, |response: &tools::ViewHabitResponse| {
            format!("{}\n\n{}", response.message, pretty(&response.habit))
        })
    }

    async fn call_habit_list(&self, arguments: Value) -> ToolCallResult {
        self.call_tool(arguments, tools::list_habits::<SqliteStorage>, |response: &tools::ListHabitsResponse| {
            if response.habits.is_empty() {
                return "No habits found. Create your first habit to get started!".to_string();
            }
            format!(
                "📋 **Habit Summary** ({} habits, {} on a streak, best streak {})\n\n{}",
                response.summary.total_habits,
                response.summary.habits_on_streak,
                response.summary.best_longest_streak,
                pretty(&response.habits)
            )
        })
    }

    async fn call_habit_edit(&self, arguments: Value) -> ToolCallResult {
        self.call_tool(arguments, tools::edit_habit::<SqliteStorage>, |response: &tools::EditHabitResponse| {
            response.message.clone()
        })
    }

    async fn call_habit_delete(&self, arguments: Value) -> ToolCallResult {
        self.call_tool(arguments, tools::delete_habit::<SqliteStorage>, |response: &tools::DeleteHabitResponse| {
            response.message.clone()
        })
    }

    async fn call_habit_track(&self, arguments: Value) -> ToolCallResult {
        let today = (self.today)();
        let engine = *self.habit_tracker.engine();
        self.call_tool(
            arguments,
            |storage: &SqliteStorage, params: tools::TrackHabitParams| {
                tools::track_habit(storage, params, today, &engine)
            },
            |response: &tools::TrackHabitResponse| response.message.clone(),
        )
    }

    /// Decode arguments, run a tool against storage and render its response
    fn call_tool<P, R>(
        &self,
        arguments: Value,
        run: impl FnOnce(&SqliteStorage, P) -> Result<R, ToolError>,
        render: impl FnOnce(&R) -> String,
    ) -> ToolCallResult
    where
        P: DeserializeOwned,
    {
        let params: P = match serde_json::from_value(arguments) {
            Ok(params) => params,
            Err(e) => {
                return ToolCallResult::from_tool_error(&ToolError::InvalidInput(e.to_string()));
            }
        };

        match run(self.habit_tracker.storage(), params) {
            Ok(response) => ToolCallResult::success(render(&response)),
            Err(e) => {
                warn!("Tool call failed: {}", e);
                ToolCallResult::from_tool_error(&e)
            }
        }
    }
}

fn tool_definition<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(P);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({ "type": "object" })),
    }
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
            None,
        ),
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
