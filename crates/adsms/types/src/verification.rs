//! Verification results: derived, never persisted
//!
//! A [`VerificationResult`] is produced on demand by replaying a
//! document's sealing signature against the certificate directory.
//! It reflects present trust: revocation after signing invalidates the
//! signature even though the binding itself is intact.

use crate::{DocumentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of verifying a document's authenticity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The document that was checked
    pub document_id: DocumentId,
    /// Title at the time of verification
    pub document_title: String,
    /// Whether the signature chain is currently trustworthy
    pub is_valid: bool,
    /// Whether the signature-to-certificate binding itself is broken
    pub tampered_detected: bool,
    /// When the chain was sealed (if it was)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
    /// The final signer (if the chain was sealed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_id: Option<UserId>,
    /// Serial of the certificate that sealed the chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_serial: Option<String>,
    /// Issuer of that certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_issuer: Option<String>,
    /// When this verification was performed
    pub verified_at: DateTime<Utc>,
    /// Human-readable explanation of the outcome
    pub message: String,
}

impl VerificationResult {
    /// An invalid outcome with no certificate details
    pub fn invalid(
        document_id: DocumentId,
        document_title: impl Into<String>,
        verified_at: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            document_id,
            document_title: document_title.into(),
            is_valid: false,
            tampered_detected: false,
            signed_at: None,
            signer_id: None,
            certificate_serial: None,
            certificate_issuer: None,
            verified_at,
            message: message.into(),
        }
    }

    pub fn with_tampering(mut self) -> Self {
        self.tampered_detected = true;
        self
    }

    pub fn with_signature(
        mut self,
        signed_at: DateTime<Utc>,
        signer_id: UserId,
    ) -> Self {
        self.signed_at = Some(signed_at);
        self.signer_id = Some(signer_id);
        self
    }

    pub fn with_certificate(
        mut self,
        serial: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        self.certificate_serial = Some(serial.into());
        self.certificate_issuer = Some(issuer.into());
        self
    }

    /// Flip an outcome to valid with the given message
    pub fn into_valid(mut self, message: impl Into<String>) -> Self {
        self.is_valid = true;
        self.tampered_detected = false;
        self.message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_default_shape() {
        let result = VerificationResult::invalid(
            DocumentId::new("doc-1"),
            "Transcript",
            Utc::now(),
            "document is not fully signed",
        );
        assert!(!result.is_valid);
        assert!(!result.tampered_detected);
        assert!(result.signed_at.is_none());
        assert!(result.certificate_serial.is_none());
    }

    #[test]
    fn test_build_valid_outcome() {
        let result = VerificationResult::invalid(
            DocumentId::new("doc-1"),
            "Transcript",
            Utc::now(),
            "",
        )
        .with_signature(Utc::now(), UserId::new("dean"))
        .with_certificate("SN-0001", "CN=University CA")
        .into_valid("signature chain verified");

        assert!(result.is_valid);
        assert_eq!(result.certificate_serial.as_deref(), Some("SN-0001"));
        assert_eq!(result.message, "signature chain verified");
    }
}
