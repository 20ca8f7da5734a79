//! Signature requests: one slot in a document's ordered signing chain
//!
//! A request is created pending alongside its document's submission and
//! is mutated exactly once: pending → completed, rejected, or expired.
//! It is never re-opened.

use crate::{CertificateId, DocumentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Request Identifier ───────────────────────────────────────────────

/// Unique identifier for a signature request
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureRequestId(pub String);

impl SignatureRequestId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for SignatureRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Signature Status ─────────────────────────────────────────────────

/// Status of one signature request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    /// Waiting for the signer (may or may not be their turn yet)
    #[default]
    Pending,
    /// Signed
    Completed,
    /// Refused by the signer
    Rejected,
    /// Timed out before the signer acted
    Expired,
}

impl SignatureStatus {
    /// Check if this is a terminal status
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// ── Signature Request ────────────────────────────────────────────────

/// One slot in a document's ordered signer list
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignatureRequest {
    /// Unique request identifier
    pub id: SignatureRequestId,
    /// The document this request belongs to
    pub document_id: DocumentId,
    /// Who must sign
    pub signer_id: UserId,
    /// Position in the signing chain (0-based, unique per document)
    pub order: u32,
    /// Current status
    pub status: SignatureStatus,
    /// When the request was issued
    pub requested_at: DateTime<Utc>,
    /// When the signature was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
    /// When the request was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    /// Why the signer refused
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// The certificate used at signing time, captured for later verification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<CertificateId>,
}

impl SignatureRequest {
    /// Create a pending request for one signer slot
    pub fn new(
        document_id: DocumentId,
        signer_id: UserId,
        order: u32,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SignatureRequestId::generate(),
            document_id,
            signer_id,
            order,
            status: SignatureStatus::Pending,
            requested_at,
            signed_at: None,
            rejected_at: None,
            rejection_reason: None,
            certificate_id: None,
        }
    }

    /// Mark the request completed, binding it to the certificate used
    pub fn complete(&mut self, signed_at: DateTime<Utc>, certificate_id: CertificateId) {
        self.status = SignatureStatus::Completed;
        self.signed_at = Some(signed_at);
        self.certificate_id = Some(certificate_id);
    }

    /// Mark the request rejected
    pub fn reject(&mut self, rejected_at: DateTime<Utc>, reason: impl Into<String>) {
        self.status = SignatureStatus::Rejected;
        self.rejected_at = Some(rejected_at);
        self.rejection_reason = Some(reason.into());
    }

    /// Mark the request expired
    pub fn expire(&mut self) {
        self.status = SignatureStatus::Expired;
    }

    /// Check if the request is still waiting for its signer
    pub fn is_pending(&self) -> bool {
        self.status == SignatureStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(order: u32) -> SignatureRequest {
        SignatureRequest::new(
            DocumentId::new("doc-1"),
            UserId::new("signer-1"),
            order,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_request_is_pending() {
        let req = make_request(0);
        assert!(req.is_pending());
        assert!(!req.status.is_terminal());
        assert!(req.signed_at.is_none());
        assert!(req.certificate_id.is_none());
    }

    #[test]
    fn test_complete_binds_certificate() {
        let mut req = make_request(0);
        let cert_id = CertificateId::new("cert-1");
        req.complete(Utc::now(), cert_id.clone());

        assert_eq!(req.status, SignatureStatus::Completed);
        assert!(req.status.is_terminal());
        assert!(req.signed_at.is_some());
        assert_eq!(req.certificate_id, Some(cert_id));
    }

    #[test]
    fn test_reject_records_reason() {
        let mut req = make_request(1);
        req.reject(Utc::now(), "incomplete data");

        assert_eq!(req.status, SignatureStatus::Rejected);
        assert!(req.rejected_at.is_some());
        assert_eq!(req.rejection_reason.as_deref(), Some("incomplete data"));
    }

    #[test]
    fn test_expire() {
        let mut req = make_request(2);
        req.expire();
        assert_eq!(req.status, SignatureStatus::Expired);
        assert!(req.status.is_terminal());
    }
}
