//! Subscription context from `az account show`.

use serde::{Deserialize, Serialize};

/// The active subscription the engine operates against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    /// Subscription id (GUID).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tenant id.
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// Signed-in user email, when available. Feeds the last-resort currency
    /// heuristic.
    #[serde(default)]
    pub user_email: Option<String>,
}

impl SubscriptionInfo {
    /// The domain part of the signed-in user's email.
    pub fn email_domain(&self) -> Option<&str> {
        self.user_email
            .as_deref()
            .and_then(|e| e.rsplit_once('@'))
            .map(|(_, domain)| domain)
    }
}

// ============================================================================
// Tests
// ============================================================================
