//! # Command Handler
//!
//! One JSON command per input line, one JSON response per output line.
//!
//! ```text
//! {"cmd":"scan","actor":{"identity":"luis","role":"mechanic"},"code":"REF|1"}
//!   → {"request_id":"…","ok":true,"data":{…}}
//! {"cmd":"delete_client","name":"ACME"}
//!   → {"request_id":"…","ok":false,"error":{"kind":"client_has_records","message":"…"}}
//! ```

use std::sync::Arc;

use ft_02_lifecycle::{
    ClientAdminApi, DirectoryError, LifecycleApi, LifecycleError, TransitionPayload,
};
use ft_03_projection::{resolve_projection_filter, ProjectionApi, ProjectionError, ReportingApi};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{ActorContext, ActorRole, ClientName, RecordScope};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::container::EngineContainer;

/// Caller as sent on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorInput {
    /// User identity.
    pub identity: String,
    /// Declared role.
    #[serde(default)]
    pub role: ActorRole,
    /// Client the caller works for or is dispatching to.
    #[serde(default)]
    pub client: Option<String>,
}

impl ActorInput {
    fn context(&self) -> ActorContext {
        let actor = ActorContext::new(self.identity.as_str(), self.role);
        match &self.client {
            Some(client) => actor.with_client(client),
            None => actor,
        }
    }
}

/// Commands accepted on stdin.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Advance a unit by one stage.
    Scan {
        /// Caller
        actor: ActorInput,
        /// Raw scanned text
        code: String,
        /// Install or uninstall data
        #[serde(default)]
        payload: TransitionPayload,
    },
    /// Replacement forecasts.
    Projections {
        /// Caller
        actor: ActorInput,
        /// Optional client filter
        #[serde(default)]
        client: Option<String>,
    },
    /// Most recent records in the caller's scope.
    Recent {
        /// Caller
        actor: ActorInput,
        /// Explicit client view
        #[serde(default)]
        client: Option<String>,
        /// Number of records
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Per-state counts in the caller's scope.
    Stats {
        /// Caller
        actor: ActorInput,
        /// Explicit client view
        #[serde(default)]
        client: Option<String>,
    },
    /// Registered clients.
    ListClients,
    /// Register a client.
    RegisterClient {
        /// Client name
        name: String,
    },
    /// Delete a client with no records.
    DeleteClient {
        /// Client name
        name: String,
    },
}

impl Command {
    fn label(&self) -> &'static str {
        match self {
            Command::Scan { .. } => "scan",
            Command::Projections { .. } => "projections",
            Command::Recent { .. } => "recent",
            Command::Stats { .. } => "stats",
            Command::ListClients => "list_clients",
            Command::RegisterClient { .. } => "register_client",
            Command::DeleteClient { .. } => "delete_client",
        }
    }
}

/// Error body of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable kind.
    pub kind: &'static str,
    /// Message for the user.
    pub message: String,
}

/// One response line.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Correlates the response with log lines.
    pub request_id: String,
    /// Whether the command succeeded.
    pub ok: bool,
    /// Result payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    fn success(request_id: String, data: Value) -> Self {
        Self {
            request_id,
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(request_id: String, error: ErrorBody) -> Self {
        Self {
            request_id,
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

fn lifecycle_error(err: &LifecycleError) -> ErrorBody {
    let kind = match err {
        LifecycleError::InvalidFormat(_) => "invalid_format",
        LifecycleError::MissingClient { .. } => "missing_client",
        LifecycleError::StoreUnavailable { .. } => "store_unavailable",
        LifecycleError::Transition(_) => "invalid_transition",
    };
    ErrorBody {
        kind,
        message: err.user_message(),
    }
}

fn directory_error(err: &DirectoryError) -> ErrorBody {
    let kind = match err {
        DirectoryError::InvalidClientName => "invalid_client_name",
        DirectoryError::ClientAlreadyExists { .. } => "client_already_exists",
        DirectoryError::ClientNotFound { .. } => "client_not_found",
        DirectoryError::ClientHasRecords { .. } => "client_has_records",
        DirectoryError::StoreUnavailable { .. } => "store_unavailable",
    };
    ErrorBody {
        kind,
        message: err.user_message(),
    }
}

fn projection_error(err: &ProjectionError) -> ErrorBody {
    let kind = match err {
        ProjectionError::StoreUnavailable { .. } => "store_unavailable",
        ProjectionError::ScopeUnresolved { .. } => "scope_unresolved",
    };
    ErrorBody {
        kind,
        message: err.user_message(),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ErrorBody> {
    serde_json::to_value(value).map_err(|e| ErrorBody {
        kind: "internal",
        message: format!("Could not encode response: {}", e),
    })
}

/// Executes decoded commands against the engine container.
pub struct CommandHandler {
    container: Arc<EngineContainer>,
}

impl CommandHandler {
    /// Create a handler over a wired container.
    pub fn new(container: Arc<EngineContainer>) -> Self {
        Self { container }
    }

    /// Decode and execute one input line.
    ///
    /// A string `request_id` on the line is echoed back; otherwise one is
    /// generated. Responses may arrive out of order, so callers sending
    /// several lines at once should set it.
    pub async fn handle_line(&self, line: &str) -> Response {
        let value = serde_json::from_str::<Value>(line);
        let request_id = value
            .as_ref()
            .ok()
            .and_then(|v| v.get("request_id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let command = match value.and_then(serde_json::from_value::<Command>) {
            Ok(command) => command,
            Err(e) => {
                info!(request_id = %request_id, error = %e, "[runtime] malformed command");
                return Response::failure(
                    request_id,
                    ErrorBody {
                        kind: "bad_request",
                        message: format!("Malformed command: {}", e),
                    },
                );
            }
        };
        self.handle(request_id, command).await
    }

    /// Execute one decoded command.
    pub async fn handle(&self, request_id: String, command: Command) -> Response {
        let label = command.label();
        debug!(request_id = %request_id, cmd = label, "[runtime] command received");
        match self.execute(command).await {
            Ok(data) => Response::success(request_id, data),
            Err(error) => {
                if error.kind == "store_unavailable" || error.kind == "internal" {
                    warn!(request_id = %request_id, cmd = label, kind = error.kind, "[runtime] command failed");
                } else {
                    info!(request_id = %request_id, cmd = label, kind = error.kind, "[runtime] command rejected");
                }
                Response::failure(request_id, error)
            }
        }
    }

    async fn execute(&self, command: Command) -> Result<Value, ErrorBody> {
        let engines = &self.container;
        match command {
            Command::Scan {
                actor,
                code,
                payload,
            } => {
                let result = engines
                    .lifecycle
                    .scan_code(&code, &actor.context(), payload)
                    .await
                    .map_err(|e| lifecycle_error(&e))?;
                encode(&result)
            }
            Command::Projections { actor, client } => {
                let requested = client.as_deref().and_then(ClientName::parse);
                let filter = resolve_projection_filter(&actor.context(), requested)
                    .map_err(|e| projection_error(&e))?;
                let result = engines
                    .projection
                    .project(filter)
                    .await
                    .map_err(|e| projection_error(&e))?;
                encode(&result)
            }
            Command::Recent {
                actor,
                client,
                limit,
            } => {
                let scope = scope_for(&actor, client.as_deref());
                let records = engines
                    .projection
                    .list_recent(&scope, limit)
                    .await
                    .map_err(|e| projection_error(&e))?;
                encode(&records)
            }
            Command::Stats { actor, client } => {
                let scope = scope_for(&actor, client.as_deref());
                let stats = engines
                    .projection
                    .compute_stats(&scope)
                    .await
                    .map_err(|e| projection_error(&e))?;
                encode(&stats)
            }
            Command::ListClients => {
                let clients = engines
                    .clients
                    .list_clients()
                    .await
                    .map_err(|e| directory_error(&e))?;
                encode(&clients)
            }
            Command::RegisterClient { name } => {
                let entry = engines
                    .clients
                    .register_client(&name)
                    .await
                    .map_err(|e| directory_error(&e))?;
                encode(&entry)
            }
            Command::DeleteClient { name } => {
                engines
                    .clients
                    .delete_client(&name)
                    .await
                    .map_err(|e| directory_error(&e))?;
                Ok(Value::Null)
            }
        }
    }
}

fn scope_for(actor: &ActorInput, client: Option<&str>) -> RecordScope {
    RecordScope::resolve(&actor.context(), client.and_then(ClientName::parse))
}
