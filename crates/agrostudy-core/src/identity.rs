//! Identity — the authenticated owner of every other entity.
//!
//! Created by the session layer on sign-up and authoritative for scoping
//! every query and mutation issued by the resource hooks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user. Opaque id, email, and a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub id:           Uuid,
  pub email:        String,
  pub display_name: String,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::gateway::AuthGateway::sign_up`]. The password travels
/// in the clear only as far as the gateway, which stores a PHC hash.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub email:        String,
  pub display_name: String,
  pub password:     String,
}
