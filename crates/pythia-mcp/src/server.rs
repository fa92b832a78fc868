//! MCP server over the prediction service.
//!
//! Exposes the four prediction tools and two report resources on stdio.
//! Domain failures are rendered as structured tool errors the calling agent
//! can inspect; protocol errors are reserved for serialization faults and
//! unknown resources.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::{RequestContext, RoleServer},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use tracing::{debug, info};

use pythia_client::{ClientError, PredictionService};
use pythia_common::{DateCode, PredictionRecord};

use crate::tools::{CurrentDateOutput, DateArgs, DateDataOutput, FormatDateOutput};

/// Render a domain error as a tool result the calling agent can act on.
///
/// The body always carries `error` (a stable kind), `message`, and
/// `retryable`; errors with more context add a `detail` object.
fn tool_error(error: &ClientError) -> CallToolResult {
    let mut body = serde_json::json!({
        "error": error.kind(),
        "message": error.to_string(),
        "retryable": error.is_retryable(),
    });
    if let Some(detail) = error_detail(error) {
        body["detail"] = detail;
    }
    CallToolResult::error(vec![Content::text(body.to_string())])
}

/// Structured context for errors that carry more than a message.
fn error_detail(error: &ClientError) -> Option<serde_json::Value> {
    match error {
        ClientError::Service { status, body } => Some(serde_json::json!({
            "status": status,
            "body": body,
        })),
        ClientError::NoDataForDate(date) => Some(serde_json::json!({ "date": date })),
        _ => None,
    }
}

/// Tool result for date input that fits neither accepted form.
fn invalid_date_error(message: &str) -> CallToolResult {
    let body = serde_json::json!({
        "error": "invalid_date",
        "message": message,
        "retryable": false,
    });
    CallToolResult::error(vec![Content::text(body.to_string())])
}

/// Pretty-print a successful payload as the tool's text content.
fn render<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| McpError::internal_error(format!("failed to serialize response: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// A prediction record as a JSON value for embedding in a tool envelope.
fn record_value(record: &PredictionRecord) -> Result<serde_json::Value, McpError> {
    serde_json::to_value(record)
        .map_err(|e| McpError::internal_error(format!("failed to serialize record: {e}"), None))
}

/// Resource body for a report that could not be fetched.
fn resource_error_body(context: &str, error: &ClientError) -> String {
    serde_json::json!({ "error": format!("{context}: {error}") }).to_string()
}

/// MCP surface over a [`PredictionService`].
#[derive(Clone)]
pub struct PythiaMcpServer {
    service: Arc<dyn PredictionService>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PythiaMcpServer {
    /// Create a server over the given prediction service.
    #[must_use]
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    /// Resolve a date selector to the six-digit wire code.
    ///
    /// A non-empty `date` string wins; then a full year/month/day triple;
    /// then today.
    fn requested_code(&self, input: &DateArgs) -> Result<DateCode, ClientError> {
        if let Some(text) = input.text() {
            return self.service.format_date(text);
        }
        if let Some((year, month, day)) = input.triple() {
            return Ok(DateCode::from_ymd(year, month, day)?);
        }
        Ok(DateCode::today())
    }

    #[tool(
        description = "Get the last prediction elements for a specific date. Pass `date` as a YYMMDD code (e.g. '250613') or a natural date ('2025-06-13', 'June 13, 2025'), or pass year, month, and day together. With no arguments, returns today's data."
    )]
    async fn get_last_elements_by_date(
        &self,
        Parameters(input): Parameters<DateArgs>,
    ) -> Result<CallToolResult, McpError> {
        let code = match self.requested_code(&input) {
            Ok(code) => code,
            Err(error) => return Ok(tool_error(&error)),
        };
        debug!(date = %code, "Fetching last elements by date");

        match self.service.data_for_date(code.as_str()).await {
            Ok(record) => render(&DateDataOutput {
                requested_date: code.as_str().to_string(),
                data: record_value(&record)?,
            }),
            Err(error) => Ok(tool_error(&error)),
        }
    }

    #[tool(description = "Get the last prediction elements for today's date.")]
    async fn get_current_date_data(&self) -> Result<CallToolResult, McpError> {
        let today = DateCode::today();
        debug!(date = %today, "Fetching current date data");

        match self.service.current_date_data().await {
            Ok(record) => render(&CurrentDateOutput {
                current_date: today.as_str().to_string(),
                data: record_value(&record)?,
            }),
            Err(error) => Ok(tool_error(&error)),
        }
    }

    #[tool(
        description = "Get debug information about the prediction service and the V53a model."
    )]
    async fn get_api_debug_info(&self) -> Result<CallToolResult, McpError> {
        debug!("Fetching service debug info");
        match self.service.debug_info().await {
            Ok(snapshot) => render(&snapshot),
            Err(error) => Ok(tool_error(&error)),
        }
    }

    #[tool(
        description = "Convert a date to the six-digit YYMMDD code the service uses. Pass `date` as a string, or year, month, and day together. Two-digit years 0-49 map to 20xx, 51-99 to 19xx."
    )]
    async fn format_date_yymmdd(
        &self,
        Parameters(input): Parameters<DateArgs>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(text) = input.text() {
            return match self.service.format_date(text) {
                Ok(code) => render(&FormatDateOutput {
                    input: serde_json::Value::String(text.to_string()),
                    formatted_date: code.as_str().to_string(),
                }),
                Err(error) => Ok(tool_error(&error)),
            };
        }
        if let Some((year, month, day)) = input.triple() {
            return match DateCode::from_ymd(year, month, day) {
                Ok(code) => render(&FormatDateOutput {
                    input: serde_json::json!({
                        "year": year,
                        "month": month,
                        "day": day,
                    }),
                    formatted_date: code.as_str().to_string(),
                }),
                Err(error) => Ok(tool_error(&ClientError::from(error))),
            };
        }
        Ok(invalid_date_error(
            "provide either a date string or year, month, and day together",
        ))
    }
}

/// Resource URI prefix for the prediction reports.
const REPORT_URI_PREFIX: &str = "aiprediction://";
/// Today's prediction record.
const CURRENT_DATE_URI: &str = "aiprediction://current-date";
/// Upstream service diagnostics.
const DEBUG_INFO_URI: &str = "aiprediction://debug-info";

/// The resource template advertised to clients.
fn report_template() -> RawResourceTemplate {
    RawResourceTemplate {
        uri_template: format!("{REPORT_URI_PREFIX}{{report}}"),
        name: "aiprediction".to_string(),
        title: Some("Prediction reports".to_string()),
        description: Some(
            "Prediction reports by name: `current-date` for today's last elements, \
             `debug-info` for service diagnostics."
                .to_string(),
        ),
        mime_type: Some("application/json".to_string()),
    }
}

impl PythiaMcpServer {
    /// Resolve a report URI to its JSON body.
    ///
    /// Fetch failures become `{"error": ...}` bodies rather than protocol
    /// faults; only unknown URIs are rejected outright.
    async fn read_report(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let text = match uri {
            CURRENT_DATE_URI => match self.service.current_date_data().await {
                Ok(record) => serde_json::to_string_pretty(&record).map_err(|e| {
                    McpError::internal_error(format!("failed to serialize record: {e}"), None)
                })?,
                Err(error) => resource_error_body("Failed to get current date data", &error),
            },
            DEBUG_INFO_URI => match self.service.debug_info().await {
                Ok(snapshot) => serde_json::to_string_pretty(&snapshot).map_err(|e| {
                    McpError::internal_error(format!("failed to serialize snapshot: {e}"), None)
                })?,
                Err(error) => resource_error_body("Failed to get debug info", &error),
            },
            other => {
                return Err(McpError::invalid_params(
                    format!("Unknown resource: {other}"),
                    None,
                ));
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

#[tool_handler]
impl rmcp::ServerHandler for PythiaMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "aiprediction.us prediction server - query daily V53a prediction records. \
                 Use `get_current_date_data` for today's last elements, \
                 `get_last_elements_by_date` for a specific date (YYMMDD code, natural date, \
                 or year/month/day), and `format_date_yymmdd` to convert dates. The same \
                 reports are readable as `aiprediction://current-date` and \
                 `aiprediction://debug-info` resources."
                    .into(),
            ),
        }
    }

    /// Advertise the `aiprediction://{report}` URI template.
    #[allow(clippy::manual_async_fn)]
    fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_
    {
        async move {
            Ok(ListResourceTemplatesResult {
                resource_templates: vec![Annotated::new(report_template(), None)],
                next_cursor: None,
            })
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            debug!(uri = %request.uri, "Reading prediction resource");
            self.read_report(&request.uri).await
        }
    }
}

/// Run the MCP server on stdio transport until the client disconnects.
///
/// Transport close (client disconnect, stdin EOF) is a clean exit, not an
/// error.
///
/// # Errors
///
/// Currently always returns `Ok`; the `Result` leaves room for startup
/// failures in future transports.
pub async fn run_server(service: Arc<dyn PredictionService>) -> anyhow::Result<()> {
    use rmcp::{ServiceExt, transport::stdio};

    info!("Starting prediction MCP server on stdio");

    let server = PythiaMcpServer::new(service);

    let running = match server.serve(stdio()).await {
        Ok(running) => running,
        Err(e) => {
            info!("MCP transport closed during setup: {e}");
            return Ok(());
        }
    };

    if let Err(e) = running.waiting().await {
        info!("MCP transport closed: {e}");
    }

    info!("MCP server stopping");
    Ok(())
}
