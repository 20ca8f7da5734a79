//! Collaborator seams consumed by the signature workflow engine
//!
//! The engine treats the certificate directory, audit ledger, and blob
//! store as narrow external interfaces. This crate defines those traits
//! plus deterministic in-memory adapters. Production deployments would
//! substitute the institutional PKI directory, a durable append-only
//! ledger, and a real object store behind the same traits.

#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod traits;

// Re-export main types
pub use error::{StorageError, StorageResult};
pub use memory::{InMemoryAuditLedger, InMemoryBlobStore, InMemoryCertificateDirectory};
pub use traits::{AuditLedger, BlobStore, CertificateDirectory, QueryWindow};
