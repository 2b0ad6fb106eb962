//! Session state — the authenticated identity gating every hook.
//!
//! The store is handed to hooks explicitly (no ambient context): each hook
//! receives an [`IdentityWatch`] at construction and re-checks it before
//! every gateway call. Identity changes propagate through a
//! `tokio::sync::watch` channel; sign-out flips the value to `None`, which
//! each hook turns into a local reset before serving any further reads.

use std::sync::Arc;

use tokio::sync::watch;

use agrostudy_core::{
  Error, Result,
  gateway::AuthGateway,
  identity::{Identity, NewIdentity},
  record::require,
};

/// Read-only view of the current identity. Cheap to clone; every hook
/// holds one.
#[derive(Clone)]
pub struct IdentityWatch(watch::Receiver<Option<Identity>>);

impl IdentityWatch {
  pub fn current(&self) -> Option<Identity> { self.0.borrow().clone() }

  /// Wait until the identity changes. Returns `false` once the owning
  /// session store has been dropped.
  pub async fn changed(&mut self) -> bool { self.0.changed().await.is_ok() }
}

/// Holds the current authenticated identity and exposes
/// sign-up / sign-in / sign-out against an [`AuthGateway`].
pub struct SessionStore<A: AuthGateway> {
  auth: Arc<A>,
  tx:   watch::Sender<Option<Identity>>,
}

impl<A: AuthGateway> SessionStore<A> {
  pub fn new(auth: Arc<A>) -> Self {
    let (tx, _rx) = watch::channel(None);
    Self { auth, tx }
  }

  pub fn watch(&self) -> IdentityWatch {
    IdentityWatch(self.tx.subscribe())
  }

  pub fn current(&self) -> Option<Identity> { self.tx.borrow().clone() }

  /// Register a new identity and sign it in.
  pub async fn sign_up(&self, input: NewIdentity) -> Result<Identity> {
    require("email", &input.email)?;
    require("display name", &input.display_name)?;
    require("password", &input.password)?;

    let identity = self.auth.sign_up(input).await.map_err(Error::remote)?;
    tracing::debug!(id = %identity.id, "signed up");
    self.tx.send_replace(Some(identity.clone()));
    Ok(identity)
  }

  /// Verify credentials and make the identity current.
  pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
    require("email", email)?;
    require("password", password)?;

    let identity = self
      .auth
      .sign_in(email, password)
      .await
      .map_err(Error::remote)?;
    tracing::debug!(id = %identity.id, "signed in");
    self.tx.send_replace(Some(identity.clone()));
    Ok(identity)
  }

  /// Clear the current identity. Hooks observe the change and reset their
  /// collections.
  pub fn sign_out(&self) {
    tracing::debug!("signed out");
    self.tx.send_replace(None);
  }
}
