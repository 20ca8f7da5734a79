use crate::StorageResult;
use adsms_types::{AuditLog, Certificate, ContentRef, UserId};
use async_trait::async_trait;

/// Generic query window for paged reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryWindow {
    pub limit: usize,
    pub offset: usize,
}

/// Lookup interface for signer certificates.
///
/// The engine resolves a signer's active certificate at the moment of
/// signing. Resolution by signer identity, not certificate identity: the
/// directory owns the mapping and its lifecycle.
#[async_trait]
pub trait CertificateDirectory: Send + Sync {
    /// Resolve the certificate currently on file for a user.
    async fn resolve(&self, user_id: &UserId) -> StorageResult<Certificate>;
}

/// Append-only sink for audit facts.
///
/// No update, no delete. A failed append must surface as
/// `StorageError::WriteFailed` so callers can report it without rolling
/// back the mutation that produced the entry.
#[async_trait]
pub trait AuditLedger: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: AuditLog) -> StorageResult<()>;

    /// Read entries newest-first.
    async fn list(&self, window: QueryWindow) -> StorageResult<Vec<AuditLog>>;

    /// Read entries for one resource, newest-first.
    async fn entries_for_resource(&self, resource_id: &str) -> StorageResult<Vec<AuditLog>>;
}

/// Owner of uploaded file bytes.
///
/// The engine stores only the opaque reference; it never interprets it.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes and return the reference to them.
    async fn store(&self, bytes: &[u8]) -> StorageResult<ContentRef>;

    /// Fetch bytes by reference.
    async fn fetch(&self, content_ref: &ContentRef) -> StorageResult<Vec<u8>>;
}
