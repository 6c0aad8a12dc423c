//! Projection scope resolution.

use shared_types::{ActorContext, ActorRole, ClientName};

use super::errors::ProjectionError;

/// Client filter a caller's projection runs under.
///
/// An explicit filter always applies. Without one, superadmins see every
/// client, admins see their own client, and other roles are refused.
pub fn resolve_projection_filter(
    actor: &ActorContext,
    requested: Option<ClientName>,
) -> Result<Option<ClientName>, ProjectionError> {
    if requested.is_some() {
        return Ok(requested);
    }
    match (actor.role, &actor.client_hint) {
        (ActorRole::SuperAdmin, _) => Ok(None),
        (ActorRole::Admin, Some(client)) => Ok(Some(client.clone())),
        (role, _) => Err(ProjectionError::ScopeUnresolved { role }),
    }
}
