//! Signing certificates: external identity bindings
//!
//! Certificates are issued and revoked by the institutional certificate
//! authority. The workflow engine only reads them — it resolves a signer's
//! certificate at signing time and replays the binding during verification.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Certificate Identifier ───────────────────────────────────────────

/// Unique identifier for a certificate
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(pub String);

impl CertificateId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Certificate Status ───────────────────────────────────────────────

/// Lifecycle status of a signing certificate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    Active,
    Expired,
    Pending,
    Revoked,
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Pending => "pending",
            Self::Revoked => "revoked",
        };
        write!(f, "{}", label)
    }
}

// ── Certificate ──────────────────────────────────────────────────────

/// A signing certificate bound to one user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Certificate {
    /// Unique certificate identifier
    pub id: CertificateId,
    /// The user this certificate belongs to
    pub user_id: UserId,
    /// Serial number assigned by the issuing authority
    pub serial_number: String,
    /// Issuing authority distinguished name
    pub issuer: String,
    /// Subject distinguished name
    pub subject: String,
    /// Start of the validity window
    pub valid_from: DateTime<Utc>,
    /// End of the validity window
    pub valid_to: DateTime<Utc>,
    /// Current status
    pub status: CertificateStatus,
    /// Public key fingerprint
    pub fingerprint: String,
}

impl Certificate {
    /// Create a certificate with an explicit validity window
    pub fn new(
        user_id: UserId,
        serial_number: impl Into<String>,
        issuer: impl Into<String>,
        subject: impl Into<String>,
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CertificateId::generate(),
            user_id,
            serial_number: serial_number.into(),
            issuer: issuer.into(),
            subject: subject.into(),
            valid_from,
            valid_to,
            status: CertificateStatus::Active,
            fingerprint: String::new(),
        }
    }

    pub fn with_id(mut self, id: CertificateId) -> Self {
        self.id = id;
        self
    }

    pub fn with_status(mut self, status: CertificateStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = fingerprint.into();
        self
    }

    /// Check if the certificate is currently usable for signing
    pub fn is_active(&self) -> bool {
        self.status == CertificateStatus::Active
    }

    /// Check if the validity window contains the given instant.
    ///
    /// Independent of the current status: a revoked certificate can still
    /// have covered an instant in the past.
    pub fn window_contains(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && at <= self.valid_to
    }
}
