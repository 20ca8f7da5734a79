//! Workflow error taxonomy
//!
//! Three tiers: validation errors (malformed input, rejected before any
//! state change), business-rule violations (wrong turn, terminal document,
//! bad certificate), and collaborator failures surfaced through
//! [`WorkflowError::Storage`]. Audit-write failures are deliberately NOT
//! here — they never fail the business operation and travel as a separate
//! outcome channel in the engine.

use crate::{DocumentId, UserId, UserRole};
use thiserror::Error;

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors produced by the signature workflow engine
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Malformed signer list or an operation illegal for the current phase
    #[error("invalid workflow: {0}")]
    InvalidWorkflow(String),

    /// The caller is not part of the document's signing chain
    #[error("signer {0} is not part of this document's signing chain")]
    UnknownSigner(UserId),

    /// The caller is in the chain but a lower-order request is still pending
    #[error("it is not signer {0}'s turn to act")]
    NotSignerTurn(UserId),

    /// The caller's request was already completed
    #[error("signer {0} has already signed this document")]
    AlreadySigned(UserId),

    /// The caller has no usable signing certificate
    #[error("certificate for signer {signer} cannot be used: {reason}")]
    CertificateInvalid { signer: UserId, reason: String },

    /// No document with this identity exists
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// The document is already signed, rejected, or expired
    #[error("document {0} is in a terminal state")]
    DocumentTerminal(DocumentId),

    /// The caller's role does not grant this operation
    #[error("role {role} is not permitted to {operation}")]
    Unauthorized { role: UserRole, operation: String },

    /// A collaborator (certificate directory, blob store) failed hard
    #[error("collaborator failure: {0}")]
    Storage(String),
}
