//! Domain types for the Academic Digital Signature Management System
//!
//! The central aggregate is [`Document`]: a workflow unit carrying an
//! ordered chain of [`SignatureRequest`]s. Exactly one request is eligible
//! to act at any time (the lowest-order request still pending), and the
//! document's lifecycle status is always a pure function of its request
//! statuses — see [`project_status`].
//!
//! Everything here is data plus transition rules. Locking, audit emission,
//! and certificate resolution live in `adsms-engine`.

#![deny(unsafe_code)]

pub mod audit;
pub mod certificate;
pub mod document;
pub mod error;
pub mod signature;
pub mod user;
pub mod verification;

// Re-export main types
pub use audit::{AuditAction, AuditLog, AuditLogId, ResourceType};
pub use certificate::{Certificate, CertificateId, CertificateStatus};
pub use document::{
    project_status, ContentRef, Document, DocumentId, DocumentStatus, DocumentType,
};
pub use error::{WorkflowError, WorkflowResult};
pub use signature::{SignatureRequest, SignatureRequestId, SignatureStatus};
pub use user::{User, UserId, UserRole};
pub use verification::VerificationResult;
