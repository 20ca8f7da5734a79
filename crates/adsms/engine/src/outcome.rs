//! Operation outcomes
//!
//! Business result and audit result are independent channels: a mutation
//! that succeeds but whose audit entry could not be persisted is still a
//! success, with the write failure surfaced alongside it.

use adsms_types::Document;

/// Whether the audit entries for a mutation reached the ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Every entry was appended
    Recorded,
    /// At least one append failed; the mutation itself stands
    WriteFailed(String),
}

impl AuditOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded)
    }

    /// Combine outcomes from a multi-entry mutation
    pub fn merge(self, other: AuditOutcome) -> AuditOutcome {
        match (self, other) {
            (Self::Recorded, Self::Recorded) => Self::Recorded,
            (Self::WriteFailed(a), Self::WriteFailed(b)) => {
                Self::WriteFailed(format!("{}; {}", a, b))
            }
            (Self::WriteFailed(reason), _) | (_, Self::WriteFailed(reason)) => {
                Self::WriteFailed(reason)
            }
        }
    }
}

/// Result of an accepted engine mutation
#[derive(Clone, Debug)]
pub struct Mutation {
    /// The document after the mutation
    pub document: Document,
    /// Whether the audit trail for this mutation was persisted
    pub audit: AuditOutcome,
}
