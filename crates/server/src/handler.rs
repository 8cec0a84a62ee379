//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    BulkValidateParams, EmailCheckParams, EmailValidateBatchParams, EmailValidateParams, IdentityImportParams,
    UninstallParams,
    bulk_validate::bulk_impl,
    cache::{CachePurgeParams, purge_impl},
    email_check::check_impl,
    email_validate::validate_impl,
    email_validate_batch::validate_batch_impl,
    identity_import::import_impl,
    uninstall::uninstall_impl,
    validation_status::status_impl,
};

use mailodds_client::ValidationClient;
use mailodds_core::{AppConfig, CacheDb};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for mailodds.
#[derive(Clone)]
pub struct MailOddsServer {
    tool_router: ToolRouter<Self>,
    db: CacheDb,
    config: Arc<AppConfig>,
    client: ValidationClient,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl MailOddsServer {
    /// Create a new server handler.
    pub fn new(db: CacheDb, config: Arc<AppConfig>, client: ValidationClient) -> Self {
        Self { tool_router: Self::tool_router(), db, config, client }
    }

    #[tool(description = "Validate one email address. Returns status, action, and deliverability signals. \
                          Results are cached for 24 hours unless skip_cache is set.")]
    async fn email_validate(&self, params: Parameters<EmailValidateParams>) -> Result<CallToolResult, McpError> {
        validate_impl(&self.client, params.0).await
    }

    #[tool(description = "Validate up to 1000 email addresses in one request. Invalid entries and duplicates are dropped.")]
    async fn email_validate_batch(
        &self, params: Parameters<EmailValidateBatchParams>,
    ) -> Result<CallToolResult, McpError> {
        validate_batch_impl(&self.client, params.0).await
    }

    /// Allow/block decision as applied to form submissions.
    #[tool(description = "Decide whether a submitted email address would be allowed or blocked. \
                          Validation failures allow the address.")]
    async fn email_check(&self, params: Parameters<EmailCheckParams>) -> Result<CallToolResult, McpError> {
        check_impl(&self.client, self.config.action_threshold, params.0).await
    }

    #[tool(description = "Add email addresses to the identity directory for bulk validation.")]
    async fn identity_import(&self, params: Parameters<IdentityImportParams>) -> Result<CallToolResult, McpError> {
        import_impl(&self.db, params.0).await
    }

    #[tool(description = "Validate every identity that has not been validated yet, page by page.")]
    async fn bulk_validate(&self, params: Parameters<BulkValidateParams>) -> Result<CallToolResult, McpError> {
        bulk_impl(&self.client, &self.db, self.config.bulk_batch_size, params.0).await
    }

    #[tool(description = "Report configuration, validation counters, and bulk progress.")]
    async fn validation_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.client, &self.db, &self.config).await
    }

    #[tool(description = "Purge expired cached validation results, or all of them with all=true.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.db, params.0).await
    }

    #[tool(description = "Remove cached results, stored counters, and identity validation markers. \
                          Identities are kept. Requires confirm=true.")]
    async fn uninstall(&self, params: Parameters<UninstallParams>) -> Result<CallToolResult, McpError> {
        uninstall_impl(&self.db, params.0).await
    }
}

impl ServerHandler for MailOddsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mailodds".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{CannedTransport, client_with};

    #[tokio::test]
    async fn test_registers_all_tools() {
        let transport = CannedTransport::default();
        let (client, db) = client_with(&transport, "key").await;
        let server = MailOddsServer::new(db, Arc::new(AppConfig::default()), client);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "bulk_validate",
                "cache_purge",
                "email_check",
                "email_validate",
                "email_validate_batch",
                "identity_import",
                "uninstall",
                "validation_status"
            ]
        );
    }

    #[tokio::test]
    async fn test_server_info() {
        let transport = CannedTransport::default();
        let (client, db) = client_with(&transport, "key").await;
        let server = MailOddsServer::new(db, Arc::new(AppConfig::default()), client);
        assert_eq!(server.get_info().server_info.name, "mailodds");
    }
}
