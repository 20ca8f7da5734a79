//! Audit log entries: immutable facts about state-changing operations
//!
//! Entries are append-only. The engine emits exactly one entry per
//! accepted mutation; rejected operations leave no trace here.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Entry Identifier ─────────────────────────────────────────────────

/// Unique identifier for an audit log entry
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditLogId(pub String);

impl AuditLogId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for AuditLogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Audit Action ─────────────────────────────────────────────────────

/// What happened
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    DocumentUploaded,
    DocumentViewed,
    DocumentDownloaded,
    DocumentExpired,
    SignatureRequested,
    SignatureCompleted,
    SignatureRejected,
    UserLogin,
    UserLogout,
    UserCreated,
    UserUpdated,
    CertificateIssued,
    CertificateRevoked,
    SystemConfigChanged,
}

/// What kind of resource the entry refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Document,
    User,
    Signature,
    Certificate,
    System,
}

// ── Audit Log Entry ──────────────────────────────────────────────────

/// One immutable audit fact
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditLog {
    /// Unique entry identifier
    pub id: AuditLogId,
    /// When the action happened
    pub timestamp: DateTime<Utc>,
    /// Who performed the action
    pub actor: UserId,
    /// What happened
    pub action: AuditAction,
    /// Kind of resource acted upon
    pub resource_type: ResourceType,
    /// Identifier of the resource acted upon
    pub resource_id: String,
    /// Free-text detail
    pub detail: String,
}

impl AuditLog {
    /// Record a fact at the current instant
    pub fn record(
        actor: UserId,
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: AuditLogId::generate(),
            timestamp: Utc::now(),
            actor,
            action,
            resource_type,
            resource_id: resource_id.into(),
            detail: detail.into(),
        }
    }
}
