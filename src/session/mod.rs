//! Per-browser session record and the authorization state machine.
//!
//! ```text
//! Anonymous --callback--> Unscoped --select--> Scoped --select--> Scoped
//!     ^                                                             |
//!     +------------------------- logout ----------------------------+
//! ```
//!
//! Token, identity and memberships arrive together, so they live in one
//! [`OperatorSession`]; a selection can only exist inside it.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::discord::permissions;
use crate::discord::{OperatorIdentity, TenantMembership};

pub mod cookie;
pub mod store;

pub use store::{SessionStore, SessionTtl};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid OAuth state.")]
    OAuthStateMismatch,

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("server {0} is not available for management")]
    TenantNotManageable(String),
}

/// Opaque identifier carried in the signed session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Clone)]
pub struct OperatorSession {
    access_token: String,
    pub identity: OperatorIdentity,
    pub memberships: Vec<TenantMembership>,
    selected_tenant: Option<String>,
}

impl fmt::Debug for OperatorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorSession")
            .field("identity", &self.identity)
            .field("memberships", &self.memberships.len())
            .field("selected_tenant", &self.selected_tenant)
            .finish_non_exhaustive()
    }
}

impl OperatorSession {
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn selected_tenant(&self) -> Option<&str> {
        self.selected_tenant.as_deref()
    }

    /// Cached memberships that pass the management filter.
    pub fn manageable_tenants(&self) -> Vec<TenantMembership> {
        permissions::manageable(&self.memberships)
    }

    pub fn tenant(&self, tenant_id: &str) -> Option<&TenantMembership> {
        self.memberships.iter().find(|m| m.id == tenant_id)
    }
}

/// Exhaustive view of where a session stands.
#[derive(Debug)]
pub enum SessionState<'a> {
    Anonymous,
    Unscoped(&'a OperatorSession),
    Scoped {
        operator: &'a OperatorSession,
        tenant_id: &'a str,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    oauth_state: Option<String>,
    operator: Option<OperatorSession>,
}

impl Session {
    pub fn state(&self) -> SessionState<'_> {
        match &self.operator {
            None => SessionState::Anonymous,
            Some(operator) => match operator.selected_tenant.as_deref() {
                None => SessionState::Unscoped(operator),
                Some(tenant_id) => SessionState::Scoped { operator, tenant_id },
            },
        }
    }

    pub fn operator(&self) -> Option<&OperatorSession> {
        self.operator.as_ref()
    }

    pub fn has_pending_login(&self) -> bool {
        self.oauth_state.is_some()
    }

    /// Remember the anti-forgery token for the login just started. A newer
    /// login replaces any pending one.
    pub fn begin_login(&mut self, state: String) {
        self.oauth_state = Some(state);
    }

    /// Check a callback's `state` against the pending token without consuming it.
    pub fn verify_oauth_state(&self, received: &str) -> Result<(), SessionError> {
        match self.oauth_state.as_deref() {
            Some(expected) if !received.is_empty() && expected == received => Ok(()),
            _ => Err(SessionError::OAuthStateMismatch),
        }
    }

    /// Consume the pending token. Returns an error and leaves the session
    /// untouched when `received` does not match.
    pub fn consume_oauth_state(&mut self, received: &str) -> Result<(), SessionError> {
        self.verify_oauth_state(received)?;
        self.oauth_state = None;
        Ok(())
    }

    /// Install a freshly authenticated operator. Any previous selection is
    /// dropped since it belonged to the previous membership list.
    pub fn authenticate(
        &mut self,
        access_token: String,
        identity: OperatorIdentity,
        memberships: Vec<TenantMembership>,
    ) {
        self.operator = Some(OperatorSession {
            access_token,
            identity,
            memberships,
            selected_tenant: None,
        });
    }

    /// Scope the session to one tenant. The id must be a cached membership
    /// carrying the management bit.
    pub fn select_tenant(&mut self, tenant_id: &str) -> Result<(), SessionError> {
        let operator = self.operator.as_mut().ok_or(SessionError::NotAuthenticated)?;

        let manageable = operator
            .tenant(tenant_id)
            .is_some_and(|m| permissions::can_manage(m.permissions));
        if !manageable {
            return Err(SessionError::TenantNotManageable(tenant_id.to_string()));
        }

        operator.selected_tenant = Some(tenant_id.to_string());
        Ok(())
    }

    /// Replace the cached memberships. A selection that is no longer
    /// manageable is cleared. Returns true when that happened.
    pub fn refresh_memberships(&mut self, memberships: Vec<TenantMembership>) -> Result<bool, SessionError> {
        let operator = self.operator.as_mut().ok_or(SessionError::NotAuthenticated)?;
        operator.memberships = memberships;

        let still_valid = match operator.selected_tenant.as_deref() {
            None => true,
            Some(id) => operator
                .tenant(id)
                .is_some_and(|m| permissions::can_manage(m.permissions)),
        };
        if !still_valid {
            operator.selected_tenant = None;
        }
        Ok(!still_valid)
    }
}
