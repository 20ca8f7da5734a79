//! The Signature Workflow Engine: the main entry point
//!
//! The engine owns the document registry and enforces sequential signer
//! turn-taking. It:
//! 1. Creates draft documents around stored content
//! 2. Routes them through ordered signing chains
//! 3. Applies signatures, rejections, and expiry
//! 4. Emits one audit entry per accepted mutation
//! 5. Replays sealed chains for verification
//!
//! All mutating operations on one document are serialized through a
//! per-document exclusive lock; operations on different documents
//! proceed independently.

use crate::authz::{self, Capability};
use crate::verification;
use crate::{AuditOutcome, EngineConfig, Mutation};
use adsms_storage::{AuditLedger, BlobStore, CertificateDirectory, StorageError};
use adsms_types::{
    AuditAction, AuditLog, Certificate, Document, DocumentId, DocumentStatus, DocumentType,
    ResourceType, User, UserId, VerificationResult, WorkflowError, WorkflowResult,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

// ── Upload Request ───────────────────────────────────────────────────

/// Everything needed to create a draft document
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub title: String,
    pub description: Option<String>,
    pub doc_type: DocumentType,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn new(
        title: impl Into<String>,
        doc_type: DocumentType,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            doc_type,
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ── Workflow Statistics ──────────────────────────────────────────────

/// Aggregate counts across the document registry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkflowStats {
    pub total_documents: usize,
    pub draft_documents: usize,
    pub pending_documents: usize,
    pub signed_documents: usize,
    pub rejected_documents: usize,
    pub expired_documents: usize,
    /// Signature requests still waiting for a signer, across all pending documents
    pub pending_signatures: usize,
}

// ── Engine ───────────────────────────────────────────────────────────

/// The Signature Workflow Engine — routes documents, never signs for anyone
pub struct SignatureWorkflowEngine {
    /// Engine policy
    config: EngineConfig,
    /// Resolves signer certificates at signing time
    directory: Arc<dyn CertificateDirectory>,
    /// Receives one immutable entry per accepted mutation
    ledger: Arc<dyn AuditLedger>,
    /// Owns uploaded file bytes
    blobs: Arc<dyn BlobStore>,
    /// Document registry; each slot carries its own exclusive lock
    documents: RwLock<HashMap<DocumentId, Arc<Mutex<Document>>>>,
}

impl SignatureWorkflowEngine {
    /// Create an engine with default configuration
    pub fn new(
        directory: Arc<dyn CertificateDirectory>,
        ledger: Arc<dyn AuditLedger>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self::with_config(EngineConfig::default(), directory, ledger, blobs)
    }

    /// Create an engine with explicit configuration
    pub fn with_config(
        config: EngineConfig,
        directory: Arc<dyn CertificateDirectory>,
        ledger: Arc<dyn AuditLedger>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            config,
            directory,
            ledger,
            blobs,
            documents: RwLock::new(HashMap::new()),
        }
    }

    // ── Upload & Submission ──────────────────────────────────────────

    /// Upload a file and create a draft document around it.
    ///
    /// Emits `document_uploaded`.
    pub async fn upload(&self, actor: &User, request: UploadRequest) -> WorkflowResult<Mutation> {
        authz::require(actor.role, Capability::UploadDocument)?;

        let file_size = request.bytes.len() as u64;
        let content_ref = self
            .blobs
            .store(&request.bytes)
            .await
            .map_err(storage_failure)?;

        let mut document = Document::new(
            request.title,
            request.doc_type,
            request.file_name,
            file_size,
            content_ref,
            actor.id.clone(),
        );
        if let Some(description) = request.description {
            document = document.with_description(description);
        }

        let document_id = document.id.clone();
        let snapshot = document.clone();
        self.documents
            .write()
            .await
            .insert(document_id.clone(), Arc::new(Mutex::new(document)));

        tracing::info!(
            document_id = %document_id,
            uploaded_by = %actor.id,
            "Document uploaded"
        );

        let audit = self
            .emit(AuditLog::record(
                actor.id.clone(),
                AuditAction::DocumentUploaded,
                ResourceType::Document,
                document_id.0.clone(),
                format!("'{}' uploaded ({} bytes)", snapshot.title, file_size),
            ))
            .await;

        Ok(Mutation {
            document: snapshot,
            audit,
        })
    }

    /// Submit a draft for signatures with a fixed signer order.
    ///
    /// Only the uploader may route their document. Emits one
    /// `signature_requested` entry per signer.
    pub async fn submit(
        &self,
        document_id: &DocumentId,
        actor: &User,
        signers: &[UserId],
    ) -> WorkflowResult<Mutation> {
        authz::require(actor.role, Capability::SubmitForSignatures)?;

        let slot = self.slot(document_id).await?;
        let mut document = slot.lock().await;
        if document.uploaded_by != actor.id {
            return Err(WorkflowError::InvalidWorkflow(format!(
                "only the uploader may submit document {}",
                document_id
            )));
        }

        let now = Utc::now();
        document.submit(signers, now, now + self.config.pending_ttl)?;
        let snapshot = document.clone();
        drop(document);

        tracing::info!(
            document_id = %document_id,
            signers = signers.len(),
            "Document submitted for signatures"
        );

        let mut audit = AuditOutcome::Recorded;
        for request in &snapshot.signatures {
            let outcome = self
                .emit(AuditLog::record(
                    actor.id.clone(),
                    AuditAction::SignatureRequested,
                    ResourceType::Document,
                    document_id.0.clone(),
                    format!(
                        "signature requested from {} (order {})",
                        request.signer_id, request.order
                    ),
                ))
                .await;
            audit = audit.merge(outcome);
        }

        Ok(Mutation {
            document: snapshot,
            audit,
        })
    }

    /// Upload and immediately submit, for deployments that treat the two
    /// as a single user action. Emits both event kinds.
    pub async fn upload_and_submit(
        &self,
        actor: &User,
        request: UploadRequest,
        signers: &[UserId],
    ) -> WorkflowResult<Mutation> {
        let uploaded = self.upload(actor, request).await?;
        let submitted = self.submit(&uploaded.document.id, actor, signers).await?;
        Ok(Mutation {
            document: submitted.document,
            audit: uploaded.audit.merge(submitted.audit),
        })
    }

    // ── Signing Chain ────────────────────────────────────────────────

    /// Apply the caller's signature to the document.
    ///
    /// Preconditions, in order: the caller holds the current turn, and
    /// their certificate resolves to an active one covering this instant.
    /// Any failure leaves the chain untouched. Emits `signature_completed`.
    pub async fn sign(&self, document_id: &DocumentId, signer: &User) -> WorkflowResult<Mutation> {
        authz::require(signer.role, Capability::SignDocument)?;

        let slot = self.slot(document_id).await?;
        let mut document = slot.lock().await;

        // Turn check first: a caller out of turn gets the turn error even
        // when their certificate is also unusable.
        document.check_turn(&signer.id)?;

        let now = Utc::now();
        let certificate = self.resolve_active_certificate(signer, now).await?;

        document.apply_sign(&signer.id, now, certificate.id.clone())?;
        let snapshot = document.clone();
        drop(document);

        let sealed = snapshot.status == DocumentStatus::Signed;
        tracing::info!(
            document_id = %document_id,
            signer = %signer.id,
            sealed,
            "Signature applied"
        );

        let audit = self
            .emit(AuditLog::record(
                signer.id.clone(),
                AuditAction::SignatureCompleted,
                ResourceType::Document,
                document_id.0.clone(),
                if sealed {
                    format!("{} signed; chain complete", signer.id)
                } else {
                    format!("{} signed; awaiting next signer", signer.id)
                },
            ))
            .await;

        Ok(Mutation {
            document: snapshot,
            audit,
        })
    }

    /// Reject the document at the caller's slot.
    ///
    /// A rejection is final: the document freezes as rejected and no
    /// later signer can ever act. Emits `signature_rejected`.
    pub async fn reject(
        &self,
        document_id: &DocumentId,
        signer: &User,
        reason: impl Into<String>,
    ) -> WorkflowResult<Mutation> {
        authz::require(signer.role, Capability::SignDocument)?;
        let reason = reason.into();

        let slot = self.slot(document_id).await?;
        let mut document = slot.lock().await;
        document.apply_reject(&signer.id, Utc::now(), reason.clone())?;
        let snapshot = document.clone();
        drop(document);

        tracing::info!(
            document_id = %document_id,
            signer = %signer.id,
            "Document rejected"
        );

        let audit = self
            .emit(AuditLog::record(
                signer.id.clone(),
                AuditAction::SignatureRejected,
                ResourceType::Document,
                document_id.0.clone(),
                format!("{} rejected: {}", signer.id, reason),
            ))
            .await;

        Ok(Mutation {
            document: snapshot,
            audit,
        })
    }

    /// Expire a pending document past its deadline.
    ///
    /// Invoked by an external scheduler at its own cadence; `now` is the
    /// scheduler's clock. Idempotent: terminal, draft, and not-yet-due
    /// documents are left untouched without error or audit noise.
    pub async fn expire(
        &self,
        document_id: &DocumentId,
        now: DateTime<Utc>,
    ) -> WorkflowResult<Mutation> {
        let slot = self.slot(document_id).await?;
        let mut document = slot.lock().await;

        let due = document
            .expires_at
            .is_some_and(|deadline| now >= deadline);
        if !due || !document.apply_expire() {
            let snapshot = document.clone();
            return Ok(Mutation {
                document: snapshot,
                audit: AuditOutcome::Recorded,
            });
        }
        let snapshot = document.clone();
        drop(document);

        tracing::info!(document_id = %document_id, "Document expired");

        let audit = self
            .emit(AuditLog::record(
                snapshot.uploaded_by.clone(),
                AuditAction::DocumentExpired,
                ResourceType::Document,
                document_id.0.clone(),
                "pending signature chain timed out".to_string(),
            ))
            .await;

        Ok(Mutation {
            document: snapshot,
            audit,
        })
    }

    // ── Content ──────────────────────────────────────────────────────

    /// Replace draft content with new bytes, bumping the version.
    pub async fn replace_content(
        &self,
        document_id: &DocumentId,
        actor: &User,
        bytes: Vec<u8>,
    ) -> WorkflowResult<Mutation> {
        authz::require(actor.role, Capability::UploadDocument)?;

        let slot = self.slot(document_id).await?;
        let mut document = slot.lock().await;
        if document.uploaded_by != actor.id {
            return Err(WorkflowError::InvalidWorkflow(format!(
                "only the uploader may replace content of document {}",
                document_id
            )));
        }

        let file_size = bytes.len() as u64;
        let content_ref = self.blobs.store(&bytes).await.map_err(storage_failure)?;
        document.replace_content(content_ref, file_size)?;
        let snapshot = document.clone();
        drop(document);

        let audit = self
            .emit(AuditLog::record(
                actor.id.clone(),
                AuditAction::DocumentUploaded,
                ResourceType::Document,
                document_id.0.clone(),
                format!("content replaced (version {})", snapshot.version),
            ))
            .await;

        Ok(Mutation {
            document: snapshot,
            audit,
        })
    }

    /// Fetch the document's current content bytes.
    ///
    /// Emits `document_downloaded`.
    pub async fn download(
        &self,
        document_id: &DocumentId,
        actor: &User,
    ) -> WorkflowResult<(Vec<u8>, AuditOutcome)> {
        authz::require(actor.role, Capability::DownloadDocument)?;

        let content_ref = {
            let slot = self.slot(document_id).await?;
            let document = slot.lock().await;
            document.content_ref.clone()
        };
        let bytes = self
            .blobs
            .fetch(&content_ref)
            .await
            .map_err(storage_failure)?;

        let audit = self
            .emit(AuditLog::record(
                actor.id.clone(),
                AuditAction::DocumentDownloaded,
                ResourceType::Document,
                document_id.0.clone(),
                format!("{} bytes", bytes.len()),
            ))
            .await;

        Ok((bytes, audit))
    }

    // ── Verification ─────────────────────────────────────────────────

    /// Verify a document's authenticity by replaying its sealing
    /// signature against the certificate directory.
    pub async fn verify(
        &self,
        document_id: &DocumentId,
        now: DateTime<Utc>,
    ) -> WorkflowResult<VerificationResult> {
        let snapshot = self.document(document_id).await?;

        let certificate = match snapshot.sealing_request() {
            Some(sealing) => match self.directory.resolve(&sealing.signer_id).await {
                Ok(certificate) => Some(certificate),
                Err(StorageError::NotFound(_)) => None,
                Err(err) => return Err(storage_failure(err)),
            },
            None => None,
        };

        Ok(verification::assess(&snapshot, certificate.as_ref(), now))
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Get a snapshot of one document
    pub async fn document(&self, document_id: &DocumentId) -> WorkflowResult<Document> {
        let slot = self.slot(document_id).await?;
        let document = slot.lock().await;
        Ok(document.clone())
    }

    /// Snapshots of every document in the registry
    pub async fn documents(&self) -> Vec<Document> {
        let slots: Vec<Arc<Mutex<Document>>> =
            self.documents.read().await.values().cloned().collect();
        let mut snapshots = Vec::with_capacity(slots.len());
        for slot in slots {
            snapshots.push(slot.lock().await.clone());
        }
        snapshots
    }

    /// Every document naming this signer anywhere in its chain
    pub async fn documents_for_signer(&self, signer: &UserId) -> Vec<Document> {
        self.documents()
            .await
            .into_iter()
            .filter(|doc| doc.signatures.iter().any(|r| &r.signer_id == signer))
            .collect()
    }

    /// Documents whose pending chain still includes this signer's slot
    pub async fn pending_for_signer(&self, signer: &UserId) -> Vec<Document> {
        self.documents()
            .await
            .into_iter()
            .filter(|doc| doc.awaits_signature_from(signer))
            .collect()
    }

    /// Aggregate counts across the registry
    pub async fn stats(&self) -> WorkflowStats {
        let mut stats = WorkflowStats::default();
        for doc in self.documents().await {
            stats.total_documents += 1;
            match doc.status {
                DocumentStatus::Draft => stats.draft_documents += 1,
                DocumentStatus::Pending => {
                    stats.pending_documents += 1;
                    stats.pending_signatures +=
                        doc.signatures.iter().filter(|r| r.is_pending()).count();
                }
                DocumentStatus::Signed => stats.signed_documents += 1,
                DocumentStatus::Rejected => stats.rejected_documents += 1,
                DocumentStatus::Expired => stats.expired_documents += 1,
            }
        }
        stats
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn slot(&self, document_id: &DocumentId) -> WorkflowResult<Arc<Mutex<Document>>> {
        self.documents
            .read()
            .await
            .get(document_id)
            .cloned()
            .ok_or_else(|| WorkflowError::DocumentNotFound(document_id.clone()))
    }

    /// Resolve the caller's certificate and require it to be usable now
    async fn resolve_active_certificate(
        &self,
        signer: &User,
        now: DateTime<Utc>,
    ) -> WorkflowResult<Certificate> {
        let certificate = match self.directory.resolve(&signer.id).await {
            Ok(certificate) => certificate,
            Err(StorageError::NotFound(_)) => {
                return Err(WorkflowError::CertificateInvalid {
                    signer: signer.id.clone(),
                    reason: "no certificate on file".into(),
                })
            }
            Err(err) => return Err(storage_failure(err)),
        };

        if !certificate.is_active() {
            return Err(WorkflowError::CertificateInvalid {
                signer: signer.id.clone(),
                reason: format!("certificate status is {}", certificate.status),
            });
        }
        if !certificate.window_contains(now) {
            return Err(WorkflowError::CertificateInvalid {
                signer: signer.id.clone(),
                reason: "certificate is outside its validity window".into(),
            });
        }
        Ok(certificate)
    }

    /// Append an audit entry; failure never rolls back the mutation
    async fn emit(&self, entry: AuditLog) -> AuditOutcome {
        match self.ledger.append(entry).await {
            Ok(()) => AuditOutcome::Recorded,
            Err(err) => {
                tracing::warn!(error = %err, "Audit write failed");
                AuditOutcome::WriteFailed(err.to_string())
            }
        }
    }
}

fn storage_failure(err: StorageError) -> WorkflowError {
    WorkflowError::Storage(err.to_string())
}
