// src/mcp/mod.rs
// MCP Server implementation

use crate::config::BrokerConfig;
use crate::store::CompletionStore;
use crate::tools;
use crate::transport::CommandPublisher;
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, wrapper::Parameters},
    model::{
        CallToolRequestParam, CallToolResult, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    schemars,
    service::{RequestContext, RoleServer},
    tool, tool_router, ErrorData, ServerHandler,
};
use serde::Deserialize;
use std::sync::Arc;

/// MCP server state: the correlation store plus the broker connection
#[derive(Clone)]
pub struct MoverServer {
    pub store: Arc<CompletionStore>,
    pub publisher: Arc<dyn CommandPublisher>,
    pub command_topic: String,
    tool_router: ToolRouter<Self>,
}

impl MoverServer {
    pub fn new(
        store: Arc<CompletionStore>,
        publisher: Arc<dyn CommandPublisher>,
        config: &BrokerConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            command_topic: config.command_topic.clone(),
            tool_router: Self::tool_router(),
        }
    }
}

impl tools::ToolContext for MoverServer {
    fn store(&self) -> &Arc<CompletionStore> {
        &self.store
    }

    fn publisher(&self) -> &Arc<dyn CommandPublisher> {
        &self.publisher
    }

    fn command_topic(&self) -> &str {
        &self.command_topic
    }
}

// Request types for tools with parameters
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InitiateMoveRequest {
    #[schemars(description = "Name or ID of the 3D object to move (e.g. 'Cube')")]
    pub object_name: String,
    #[schemars(description = "Destination coordinate as exactly three numbers [x, y, z]")]
    pub target_position: Vec<f64>,
    #[schemars(description = "Movement time in seconds (positive, default 2.0)")]
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckMoveStatusRequest {
    #[schemars(description = "Request id returned by initiate_object_move")]
    pub request_id: String,
}

#[tool_router]
impl MoverServer {
    #[tool(
        description = "Send a command to move a 3D object to a target coordinate. Fire-and-forget: returns a request_id immediately without waiting for the move to finish. Use check_move_status with that id to find out when it completes."
    )]
    async fn initiate_object_move(
        &self,
        Parameters(req): Parameters<InitiateMoveRequest>,
    ) -> Result<String, String> {
        tools::initiate_object_move(self, req.object_name, req.target_position, req.duration).await
    }

    #[tool(
        description = "Check whether a previously initiated move has completed. Returns the completion feedback exactly once; a move still running or an unknown id reports in_progress."
    )]
    async fn check_move_status(
        &self,
        Parameters(req): Parameters<CheckMoveStatusRequest>,
    ) -> Result<String, String> {
        tools::check_move_status(self, req.request_id).await
    }
}

impl ServerHandler for MoverServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "unity-mover".into(),
                title: Some("Unity Mover - MQTT move-command bridge".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Moves 3D scene objects over MQTT. initiate_object_move starts a move and \
                 returns a request_id; poll check_move_status with that id until it reports \
                 completed. Completion feedback is consumed on first read."
                    .into(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let tool_name = request.name.to_string();
            let start = std::time::Instant::now();

            let ctx = ToolCallContext::new(self, request, context);
            let result = self.tool_router.call(ctx).await;

            tracing::debug!(
                tool = %tool_name,
                duration_ms = start.elapsed().as_millis() as u64,
                success = result.is_ok(),
                "Tool call finished"
            );

            result
        }
    }
}
