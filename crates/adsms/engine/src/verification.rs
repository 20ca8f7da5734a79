//! Verification: replaying a sealed chain against the certificate directory
//!
//! Verification reflects present trust, not a historical snapshot. A
//! certificate that was valid at signing time but has since been revoked
//! invalidates the signature — without flagging tampering, since the
//! binding itself is intact.

use adsms_types::{Certificate, CertificateStatus, Document, DocumentStatus, VerificationResult};
use chrono::{DateTime, Utc};

/// Assess a document against the certificate currently on file for its
/// final signer (`None` when the directory has no record).
pub fn assess(
    document: &Document,
    certificate: Option<&Certificate>,
    verified_at: DateTime<Utc>,
) -> VerificationResult {
    let base = |message: &str| {
        VerificationResult::invalid(
            document.id.clone(),
            document.title.clone(),
            verified_at,
            message,
        )
    };

    if document.status != DocumentStatus::Signed {
        return base(&format!(
            "document is not fully signed (status: {:?})",
            document.status
        ));
    }

    let (Some(sealing), Some(completed_at)) = (document.sealing_request(), document.completed_at)
    else {
        // A signed document always has both; a missing one means the
        // record itself is inconsistent.
        return base("signature chain is incomplete").with_tampering();
    };
    let signer = sealing.signer_id.clone();

    let Some(recorded_certificate_id) = sealing.certificate_id.as_ref() else {
        return base("sealing signature carries no certificate binding").with_tampering();
    };

    let Some(certificate) = certificate else {
        return base("sealing certificate is no longer on file")
            .with_signature(completed_at, signer);
    };

    let detailed = base("")
        .with_signature(completed_at, signer)
        .with_certificate(certificate.serial_number.clone(), certificate.issuer.clone());

    if &certificate.id != recorded_certificate_id {
        let mut result = detailed.with_tampering();
        result.message =
            "sealing signature is bound to a different certificate than the one on file".into();
        return result;
    }

    if !certificate.window_contains(completed_at) {
        let mut result = detailed;
        result.message = "document was signed outside the certificate's validity window".into();
        return result;
    }

    if certificate.status == CertificateStatus::Revoked {
        let mut result = detailed;
        result.message =
            "certificate was revoked after signing; the signature is no longer trusted".into();
        return result;
    }

    detailed.into_valid("signature chain verified against the certificate directory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use adsms_types::{CertificateId, ContentRef, DocumentType, UserId};
    use chrono::Duration;

    fn signed_document(certificate_id: &CertificateId) -> Document {
        let mut doc = Document::new(
            "Degree Certificate",
            DocumentType::Certificate,
            "degree.pdf",
            1024,
            ContentRef::generate(),
            UserId::new("registrar"),
        );
        let now = Utc::now();
        let dean = UserId::new("dean");
        doc.submit(&[dean.clone()], now, now + Duration::days(7))
            .unwrap();
        doc.apply_sign(&dean, now, certificate_id.clone()).unwrap();
        doc
    }

    fn dean_certificate() -> Certificate {
        let now = Utc::now();
        Certificate::new(
            UserId::new("dean"),
            "SN-DEAN-1",
            "CN=University CA",
            "CN=Dean of Studies",
            now - Duration::days(1),
            now + Duration::days(364),
        )
    }

    #[test]
    fn test_valid_chain() {
        let cert = dean_certificate();
        let doc = signed_document(&cert.id);
        let result = assess(&doc, Some(&cert), Utc::now());

        assert!(result.is_valid);
        assert!(!result.tampered_detected);
        assert_eq!(result.certificate_serial.as_deref(), Some("SN-DEAN-1"));
        assert_eq!(result.signer_id, Some(UserId::new("dean")));
    }

    #[test]
    fn test_unsigned_document_is_invalid() {
        let doc = Document::new(
            "Draft",
            DocumentType::Other,
            "draft.pdf",
            1,
            ContentRef::generate(),
            UserId::new("u"),
        );
        let result = assess(&doc, None, Utc::now());
        assert!(!result.is_valid);
        assert!(!result.tampered_detected);
        assert!(result.message.contains("not fully signed"));
    }

    #[test]
    fn test_revoked_after_signing() {
        let cert = dean_certificate().with_status(CertificateStatus::Revoked);
        let doc = signed_document(&cert.id);
        let result = assess(&doc, Some(&cert), Utc::now());

        assert!(!result.is_valid);
        assert!(!result.tampered_detected);
        assert!(result.message.contains("revoked after signing"));
        assert!(result.signed_at.is_some());
    }

    #[test]
    fn test_certificate_mismatch_is_tampering() {
        let cert = dean_certificate();
        let doc = signed_document(&CertificateId::new("some-other-cert"));
        let result = assess(&doc, Some(&cert), Utc::now());

        assert!(!result.is_valid);
        assert!(result.tampered_detected);
    }

    #[test]
    fn test_signing_outside_window() {
        let mut cert = dean_certificate();
        // Window that ended before the document was sealed.
        cert.valid_from = Utc::now() - Duration::days(30);
        cert.valid_to = Utc::now() - Duration::days(10);
        let doc = signed_document(&cert.id);
        let result = assess(&doc, Some(&cert), Utc::now());

        assert!(!result.is_valid);
        assert!(!result.tampered_detected);
        assert!(result.message.contains("validity window"));
    }

    #[test]
    fn test_certificate_missing_from_directory() {
        let cert = dean_certificate();
        let doc = signed_document(&cert.id);
        let result = assess(&doc, None, Utc::now());

        assert!(!result.is_valid);
        assert!(!result.tampered_detected);
        assert!(result.message.contains("no longer on file"));
    }
}
