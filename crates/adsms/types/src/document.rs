//! Documents: the workflow unit of the signature system
//!
//! A [`Document`] owns an ordered chain of [`SignatureRequest`]s. The
//! signing order is fixed at submission and exactly one request is
//! eligible to act at any time: the lowest-order request still pending.
//! The document's status is never stored independently of that chain —
//! every mutation recomputes it through [`project_status`].

use crate::{
    CertificateId, SignatureRequest, SignatureStatus, UserId, WorkflowError, WorkflowResult,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Document Identifier ──────────────────────────────────────────────

/// Unique identifier for a document
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Content Reference ────────────────────────────────────────────────

/// Opaque handle to stored file bytes.
///
/// Owned by the blob store; the engine never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef(pub String);

impl ContentRef {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }
}

impl std::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Document Status ──────────────────────────────────────────────────

/// Lifecycle status of a document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Uploaded but not yet routed for signatures
    #[default]
    Draft,
    /// In the signing chain, at least one signer still to act
    Pending,
    /// Every signer completed
    Signed,
    /// A signer refused; the chain is frozen
    Rejected,
    /// Timed out before the chain completed
    Expired,
}

impl DocumentStatus {
    /// Check if this is a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Signed | Self::Rejected | Self::Expired)
    }
}

// ── Document Type ────────────────────────────────────────────────────

/// Category of an academic document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Certificate,
    Transcript,
    Marksheet,
    ProjectApproval,
    BonafideLetter,
    AdministrativeForm,
    Other,
}

impl DocumentType {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Certificate => "Certificate",
            Self::Transcript => "Transcript",
            Self::Marksheet => "Marksheet",
            Self::ProjectApproval => "Project Approval",
            Self::BonafideLetter => "Bonafide Letter",
            Self::AdministrativeForm => "Administrative Form",
            Self::Other => "Other",
        }
    }
}

// ── Status Projection ────────────────────────────────────────────────

/// Derive a document's status from its signature-request chain.
///
/// This is the single source of truth for document lifecycle:
/// - `Draft` if no requests exist yet
/// - `Rejected` if any request is rejected
/// - `Expired` if any request is expired and none is rejected
/// - `Signed` if all requests are completed
/// - `Pending` otherwise
pub fn project_status(requests: &[SignatureRequest]) -> DocumentStatus {
    if requests.is_empty() {
        return DocumentStatus::Draft;
    }
    if requests
        .iter()
        .any(|r| r.status == SignatureStatus::Rejected)
    {
        return DocumentStatus::Rejected;
    }
    if requests.iter().any(|r| r.status == SignatureStatus::Expired) {
        return DocumentStatus::Expired;
    }
    if requests
        .iter()
        .all(|r| r.status == SignatureStatus::Completed)
    {
        return DocumentStatus::Signed;
    }
    DocumentStatus::Pending
}

// ── Document ─────────────────────────────────────────────────────────

/// A document routed through an ordered multi-party signing chain
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier
    pub id: DocumentId,
    /// Title shown to signers
    pub title: String,
    /// Optional free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Document category
    pub doc_type: DocumentType,
    /// Lifecycle status, always equal to `project_status(&self.signatures)`
    pub status: DocumentStatus,
    /// Original file name
    pub file_name: String,
    /// File size in bytes
    pub file_size: u64,
    /// Handle to the stored file bytes
    pub content_ref: ContentRef,
    /// Who uploaded the document
    pub uploaded_by: UserId,
    /// When the document was uploaded
    pub uploaded_at: DateTime<Utc>,
    /// Content version, incremented on draft content replacement
    pub version: u32,
    /// Ordered signing chain, fixed at submission
    pub signatures: Vec<SignatureRequest>,
    /// Index of the request currently eligible to act
    pub current_signer_index: usize,
    /// When the last signature completed the chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// When the pending chain times out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a draft document around already-stored content
    pub fn new(
        title: impl Into<String>,
        doc_type: DocumentType,
        file_name: impl Into<String>,
        file_size: u64,
        content_ref: ContentRef,
        uploaded_by: UserId,
    ) -> Self {
        Self {
            id: DocumentId::generate(),
            title: title.into(),
            description: None,
            doc_type,
            status: DocumentStatus::Draft,
            file_name: file_name.into(),
            file_size,
            content_ref,
            uploaded_by,
            uploaded_at: Utc::now(),
            version: 1,
            signatures: Vec::new(),
            current_signer_index: 0,
            completed_at: None,
            expires_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Submit the draft for signatures with a fixed signer order.
    ///
    /// Rejects an empty list or a list naming the same signer twice.
    pub fn submit(
        &mut self,
        signers: &[UserId],
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> WorkflowResult<()> {
        if self.status.is_terminal() {
            return Err(WorkflowError::DocumentTerminal(self.id.clone()));
        }
        if !self.signatures.is_empty() {
            return Err(WorkflowError::InvalidWorkflow(
                "document has already been submitted for signatures".into(),
            ));
        }
        if signers.is_empty() {
            return Err(WorkflowError::InvalidWorkflow(
                "signer list must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for signer in signers {
            if !seen.insert(signer) {
                return Err(WorkflowError::InvalidWorkflow(format!(
                    "duplicate signer in list: {}",
                    signer
                )));
            }
        }

        self.signatures = signers
            .iter()
            .enumerate()
            .map(|(order, signer)| {
                SignatureRequest::new(self.id.clone(), signer.clone(), order as u32, now)
            })
            .collect();
        self.current_signer_index = 0;
        self.expires_at = Some(expires_at);
        self.reproject();
        Ok(())
    }

    /// Apply a signature by the given signer.
    ///
    /// Fails without mutation unless it is exactly this signer's turn.
    pub fn apply_sign(
        &mut self,
        signer: &UserId,
        now: DateTime<Utc>,
        certificate_id: CertificateId,
    ) -> WorkflowResult<()> {
        let index = self.check_turn(signer)?;
        self.signatures[index].complete(now, certificate_id);
        self.advance_turn();
        self.reproject();
        if self.status == DocumentStatus::Signed {
            self.completed_at = Some(now);
        }
        Ok(())
    }

    /// Apply a rejection by the given signer.
    ///
    /// A rejection anywhere in the chain is final: the document freezes
    /// as rejected and no later request can ever transition.
    pub fn apply_reject(
        &mut self,
        signer: &UserId,
        now: DateTime<Utc>,
        reason: impl Into<String>,
    ) -> WorkflowResult<()> {
        let index = self.check_turn(signer)?;
        self.signatures[index].reject(now, reason);
        self.reproject();
        Ok(())
    }

    /// Expire every request still pending and freeze the document.
    ///
    /// Returns `false` without mutation when there is nothing to expire
    /// (terminal document, or still a draft).
    pub fn apply_expire(&mut self) -> bool {
        if self.status.is_terminal() || self.status == DocumentStatus::Draft {
            return false;
        }
        for request in self.signatures.iter_mut().filter(|r| r.is_pending()) {
            request.expire();
        }
        self.reproject();
        true
    }

    /// Replace draft content with a new stored blob, bumping the version
    pub fn replace_content(
        &mut self,
        content_ref: ContentRef,
        file_size: u64,
    ) -> WorkflowResult<()> {
        if self.status != DocumentStatus::Draft {
            return Err(WorkflowError::InvalidWorkflow(
                "content can only be replaced while the document is a draft".into(),
            ));
        }
        self.content_ref = content_ref;
        self.file_size = file_size;
        self.version += 1;
        Ok(())
    }

    // ── Turn logic ───────────────────────────────────────────────────

    /// Check that the given signer holds the current turn.
    ///
    /// Returns the index of their request on success. Callers that need
    /// to consult external collaborators between the check and the
    /// mutation (the engine resolves certificates in between) can run
    /// this first; the mutation re-checks.
    pub fn check_turn(&self, signer: &UserId) -> WorkflowResult<usize> {
        if self.status.is_terminal() {
            return Err(WorkflowError::DocumentTerminal(self.id.clone()));
        }
        let Some(request) = self.signatures.iter().find(|r| &r.signer_id == signer) else {
            return Err(WorkflowError::UnknownSigner(signer.clone()));
        };
        if request.status == SignatureStatus::Completed {
            return Err(WorkflowError::AlreadySigned(signer.clone()));
        }
        match self.current_request() {
            Some(current) if &current.signer_id == signer => Ok(current.order as usize),
            _ => Err(WorkflowError::NotSignerTurn(signer.clone())),
        }
    }

    /// The request currently eligible to act: lowest order still pending
    pub fn current_request(&self) -> Option<&SignatureRequest> {
        self.signatures.iter().find(|r| r.is_pending())
    }

    fn advance_turn(&mut self) {
        self.current_signer_index = self
            .signatures
            .iter()
            .position(|r| r.is_pending())
            .unwrap_or(self.signatures.len());
    }

    /// Recompute the status from the signature chain.
    ///
    /// Transitions never assign `status` directly; they all route through
    /// here so the projection invariant holds by construction.
    pub fn reproject(&mut self) -> DocumentStatus {
        self.status = project_status(&self.signatures);
        self.status
    }

    // ── Query methods ────────────────────────────────────────────────

    /// Check if the document is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if the chain is pending on this signer's own slot
    pub fn awaits_signature_from(&self, signer: &UserId) -> bool {
        self.status == DocumentStatus::Pending
            && self
                .signatures
                .iter()
                .any(|r| &r.signer_id == signer && r.is_pending())
    }

    /// Check if it is this signer's turn to act
    pub fn is_signers_turn(&self, signer: &UserId) -> bool {
        self.status == DocumentStatus::Pending
            && self
                .current_request()
                .is_some_and(|r| &r.signer_id == signer)
    }

    /// The final completed request of a fully signed chain
    pub fn sealing_request(&self) -> Option<&SignatureRequest> {
        if self.status != DocumentStatus::Signed {
            return None;
        }
        self.signatures.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_document() -> Document {
        Document::new(
            "Bachelor Transcript",
            DocumentType::Transcript,
            "transcript.pdf",
            24_576,
            ContentRef::generate(),
            UserId::new("uploader-1"),
        )
    }

    fn signers(n: usize) -> Vec<UserId> {
        (0..n).map(|i| UserId::new(format!("signer-{}", i))).collect()
    }

    fn submitted(n: usize) -> Document {
        let mut doc = make_document();
        let now = Utc::now();
        doc.submit(&signers(n), now, now + Duration::days(7)).unwrap();
        doc
    }

    #[test]
    fn test_new_document_is_draft() {
        let doc = make_document();
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert_eq!(doc.version, 1);
        assert!(doc.signatures.is_empty());
        assert_eq!(project_status(&doc.signatures), DocumentStatus::Draft);
    }

    #[test]
    fn test_submit_creates_ordered_pending_chain() {
        let doc = submitted(3);
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert_eq!(doc.signatures.len(), 3);
        assert_eq!(doc.current_signer_index, 0);
        assert!(doc.expires_at.is_some());
        for (i, req) in doc.signatures.iter().enumerate() {
            assert_eq!(req.order as usize, i);
            assert!(req.is_pending());
        }
    }

    #[test]
    fn test_submit_rejects_empty_list() {
        let mut doc = make_document();
        let now = Utc::now();
        let result = doc.submit(&[], now, now + Duration::days(7));
        assert!(matches!(result, Err(WorkflowError::InvalidWorkflow(_))));
        assert_eq!(doc.status, DocumentStatus::Draft);
    }

    #[test]
    fn test_submit_rejects_duplicate_signer() {
        let mut doc = make_document();
        let now = Utc::now();
        let list = vec![UserId::new("a"), UserId::new("b"), UserId::new("a")];
        let result = doc.submit(&list, now, now + Duration::days(7));
        assert!(matches!(result, Err(WorkflowError::InvalidWorkflow(_))));
        assert!(doc.signatures.is_empty());
    }

    #[test]
    fn test_submit_twice_fails() {
        let mut doc = submitted(2);
        let now = Utc::now();
        let result = doc.submit(&signers(2), now, now + Duration::days(7));
        assert!(matches!(result, Err(WorkflowError::InvalidWorkflow(_))));
    }

    #[test]
    fn test_sequential_signing_to_signed() {
        let mut doc = submitted(2);
        let now = Utc::now();

        doc.apply_sign(&UserId::new("signer-0"), now, CertificateId::new("c0"))
            .unwrap();
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert_eq!(doc.current_signer_index, 1);
        assert!(doc.completed_at.is_none());

        doc.apply_sign(&UserId::new("signer-1"), now, CertificateId::new("c1"))
            .unwrap();
        assert_eq!(doc.status, DocumentStatus::Signed);
        assert!(doc.completed_at.is_some());
        assert!(doc.is_terminal());
        assert_eq!(doc.current_signer_index, doc.signatures.len());
    }

    #[test]
    fn test_out_of_turn_sign_fails_without_mutation() {
        let mut doc = submitted(2);
        let before = doc.clone();
        let result = doc.apply_sign(
            &UserId::new("signer-1"),
            Utc::now(),
            CertificateId::new("c1"),
        );
        assert!(matches!(result, Err(WorkflowError::NotSignerTurn(_))));
        assert_eq!(doc.status, before.status);
        for (a, b) in doc.signatures.iter().zip(before.signatures.iter()) {
            assert_eq!(a.status, b.status);
        }
    }

    #[test]
    fn test_unknown_signer() {
        let mut doc = submitted(2);
        let result = doc.apply_sign(
            &UserId::new("stranger"),
            Utc::now(),
            CertificateId::new("c"),
        );
        assert!(matches!(result, Err(WorkflowError::UnknownSigner(_))));
    }

    #[test]
    fn test_double_sign_fails_already_signed() {
        let mut doc = submitted(2);
        let now = Utc::now();
        doc.apply_sign(&UserId::new("signer-0"), now, CertificateId::new("c0"))
            .unwrap();
        let result = doc.apply_sign(&UserId::new("signer-0"), now, CertificateId::new("c0"));
        assert!(matches!(result, Err(WorkflowError::AlreadySigned(_))));
    }

    #[test]
    fn test_reject_freezes_chain() {
        let mut doc = submitted(3);
        let now = Utc::now();
        doc.apply_sign(&UserId::new("signer-0"), now, CertificateId::new("c0"))
            .unwrap();
        doc.apply_reject(&UserId::new("signer-1"), now, "incomplete data")
            .unwrap();

        assert_eq!(doc.status, DocumentStatus::Rejected);
        assert!(doc.is_terminal());
        // The downstream request is frozen pending, never acted on.
        assert_eq!(doc.signatures[2].status, SignatureStatus::Pending);

        let result = doc.apply_sign(&UserId::new("signer-2"), now, CertificateId::new("c2"));
        assert!(matches!(result, Err(WorkflowError::DocumentTerminal(_))));
    }

    #[test]
    fn test_expire_marks_remaining_pending() {
        let mut doc = submitted(3);
        let now = Utc::now();
        doc.apply_sign(&UserId::new("signer-0"), now, CertificateId::new("c0"))
            .unwrap();

        assert!(doc.apply_expire());
        assert_eq!(doc.status, DocumentStatus::Expired);
        assert_eq!(doc.signatures[0].status, SignatureStatus::Completed);
        assert_eq!(doc.signatures[1].status, SignatureStatus::Expired);
        assert_eq!(doc.signatures[2].status, SignatureStatus::Expired);
    }

    #[test]
    fn test_expire_is_idempotent() {
        let mut doc = submitted(2);
        assert!(doc.apply_expire());
        let frozen = doc.clone();
        assert!(!doc.apply_expire());
        assert_eq!(doc.status, frozen.status);
        for (a, b) in doc.signatures.iter().zip(frozen.signatures.iter()) {
            assert_eq!(a.status, b.status);
        }
    }

    #[test]
    fn test_expire_noop_on_draft() {
        let mut doc = make_document();
        assert!(!doc.apply_expire());
        assert_eq!(doc.status, DocumentStatus::Draft);
    }

    #[test]
    fn test_replace_content_bumps_version() {
        let mut doc = make_document();
        let new_ref = ContentRef::generate();
        doc.replace_content(new_ref.clone(), 99_000).unwrap();
        assert_eq!(doc.version, 2);
        assert_eq!(doc.content_ref, new_ref);
        assert_eq!(doc.file_size, 99_000);
    }

    #[test]
    fn test_replace_content_fails_once_pending() {
        let mut doc = submitted(1);
        let result = doc.replace_content(ContentRef::generate(), 1);
        assert!(matches!(result, Err(WorkflowError::InvalidWorkflow(_))));
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_projection_branches() {
        let doc_id = DocumentId::new("d");
        let now = Utc::now();
        let make = |statuses: &[SignatureStatus]| -> Vec<SignatureRequest> {
            statuses
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let mut r = SignatureRequest::new(
                        doc_id.clone(),
                        UserId::new(format!("u{}", i)),
                        i as u32,
                        now,
                    );
                    r.status = *s;
                    r
                })
                .collect()
        };

        use SignatureStatus::*;
        assert_eq!(project_status(&[]), DocumentStatus::Draft);
        assert_eq!(
            project_status(&make(&[Pending, Pending])),
            DocumentStatus::Pending
        );
        assert_eq!(
            project_status(&make(&[Completed, Pending])),
            DocumentStatus::Pending
        );
        assert_eq!(
            project_status(&make(&[Completed, Completed])),
            DocumentStatus::Signed
        );
        assert_eq!(
            project_status(&make(&[Completed, Rejected, Pending])),
            DocumentStatus::Rejected
        );
        // Rejection wins over expiry.
        assert_eq!(
            project_status(&make(&[Expired, Rejected])),
            DocumentStatus::Rejected
        );
        assert_eq!(
            project_status(&make(&[Completed, Expired])),
            DocumentStatus::Expired
        );
    }

    #[test]
    fn test_eligibility_queries() {
        let mut doc = submitted(2);
        let first = UserId::new("signer-0");
        let second = UserId::new("signer-1");

        assert!(doc.awaits_signature_from(&first));
        assert!(doc.awaits_signature_from(&second));
        assert!(doc.is_signers_turn(&first));
        assert!(!doc.is_signers_turn(&second));

        doc.apply_sign(&first, Utc::now(), CertificateId::new("c0"))
            .unwrap();
        assert!(!doc.awaits_signature_from(&first));
        assert!(doc.is_signers_turn(&second));
    }

    #[test]
    fn test_sealing_request() {
        let mut doc = submitted(2);
        assert!(doc.sealing_request().is_none());
        let now = Utc::now();
        doc.apply_sign(&UserId::new("signer-0"), now, CertificateId::new("c0"))
            .unwrap();
        doc.apply_sign(&UserId::new("signer-1"), now, CertificateId::new("c1"))
            .unwrap();
        let sealing = doc.sealing_request().unwrap();
        assert_eq!(sealing.order, 1);
        assert_eq!(sealing.certificate_id, Some(CertificateId::new("c1")));
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let back: DocumentStatus = serde_json::from_str("\"signed\"").unwrap();
        assert_eq!(back, DocumentStatus::Signed);
    }
}
