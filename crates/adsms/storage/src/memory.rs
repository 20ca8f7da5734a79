//! In-memory reference implementations for the collaborator traits.
//!
//! These adapters are deterministic and test-friendly. They also back the
//! mock deployment, which runs the whole system without external services.

use crate::traits::{AuditLedger, BlobStore, CertificateDirectory, QueryWindow};
use crate::{StorageError, StorageResult};
use adsms_types::{AuditLog, Certificate, CertificateStatus, ContentRef, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

// ── Certificate Directory ────────────────────────────────────────────

/// In-memory certificate directory adapter.
#[derive(Default)]
pub struct InMemoryCertificateDirectory {
    certificates: RwLock<HashMap<UserId, Certificate>>,
}

impl InMemoryCertificateDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a certificate on file for its user, replacing any previous one.
    pub fn issue(&self, certificate: Certificate) -> StorageResult<()> {
        let mut guard = self
            .certificates
            .write()
            .map_err(|_| StorageError::Backend("certificates lock poisoned".to_string()))?;
        guard.insert(certificate.user_id.clone(), certificate);
        Ok(())
    }

    /// Change the status of the certificate on file for a user.
    pub fn set_status(&self, user_id: &UserId, status: CertificateStatus) -> StorageResult<()> {
        let mut guard = self
            .certificates
            .write()
            .map_err(|_| StorageError::Backend("certificates lock poisoned".to_string()))?;
        let certificate = guard
            .get_mut(user_id)
            .ok_or_else(|| StorageError::NotFound(format!("no certificate for {}", user_id)))?;
        certificate.status = status;
        Ok(())
    }

    /// Revoke the certificate on file for a user.
    pub fn revoke(&self, user_id: &UserId) -> StorageResult<()> {
        self.set_status(user_id, CertificateStatus::Revoked)
    }
}

#[async_trait]
impl CertificateDirectory for InMemoryCertificateDirectory {
    async fn resolve(&self, user_id: &UserId) -> StorageResult<Certificate> {
        let guard = self
            .certificates
            .read()
            .map_err(|_| StorageError::Backend("certificates lock poisoned".to_string()))?;
        guard
            .get(user_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("no certificate for {}", user_id)))
    }
}

// ── Audit Ledger ─────────────────────────────────────────────────────

/// In-memory append-only audit ledger adapter.
#[derive(Default)]
pub struct InMemoryAuditLedger {
    entries: RwLock<Vec<AuditLog>>,
}

impl InMemoryAuditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries appended so far.
    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditLedger for InMemoryAuditLedger {
    async fn append(&self, entry: AuditLog) -> StorageResult<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| StorageError::WriteFailed("audit lock poisoned".to_string()))?;
        guard.push(entry);
        Ok(())
    }

    async fn list(&self, window: QueryWindow) -> StorageResult<Vec<AuditLog>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StorageError::Backend("audit lock poisoned".to_string()))?;
        let mut entries: Vec<AuditLog> = guard.iter().rev().skip(window.offset).cloned().collect();
        if window.limit > 0 {
            entries.truncate(window.limit);
        }
        Ok(entries)
    }

    async fn entries_for_resource(&self, resource_id: &str) -> StorageResult<Vec<AuditLog>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StorageError::Backend("audit lock poisoned".to_string()))?;
        Ok(guard
            .iter()
            .rev()
            .filter(|e| e.resource_id == resource_id)
            .cloned()
            .collect())
    }
}

// ── Blob Store ───────────────────────────────────────────────────────

/// In-memory blob store adapter.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ContentRef, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, bytes: &[u8]) -> StorageResult<ContentRef> {
        let mut guard = self
            .blobs
            .write()
            .map_err(|_| StorageError::Backend("blobs lock poisoned".to_string()))?;
        let content_ref = ContentRef::generate();
        guard.insert(content_ref.clone(), bytes.to_vec());
        Ok(content_ref)
    }

    async fn fetch(&self, content_ref: &ContentRef) -> StorageResult<Vec<u8>> {
        let guard = self
            .blobs
            .read()
            .map_err(|_| StorageError::Backend("blobs lock poisoned".to_string()))?;
        guard
            .get(content_ref)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("no blob for {}", content_ref)))
    }
}
