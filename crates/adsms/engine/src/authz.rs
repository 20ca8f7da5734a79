//! Authorization capability gate
//!
//! Role checks happen once, at the engine boundary, instead of being
//! scattered through callers. Signing is reserved for institutional
//! roles; everything else is open to any authenticated user.

use adsms_types::{UserRole, WorkflowError, WorkflowResult};

/// An operation a caller may or may not be permitted to perform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    UploadDocument,
    SubmitForSignatures,
    SignDocument,
    DownloadDocument,
    VerifyDocument,
}

impl Capability {
    fn operation(&self) -> &'static str {
        match self {
            Self::UploadDocument => "upload documents",
            Self::SubmitForSignatures => "submit documents for signatures",
            Self::SignDocument => "sign documents",
            Self::DownloadDocument => "download documents",
            Self::VerifyDocument => "verify documents",
        }
    }
}

/// Check whether a role grants a capability
pub fn role_allows(role: UserRole, capability: Capability) -> bool {
    match capability {
        Capability::SignDocument => matches!(
            role,
            UserRole::Admin | UserRole::Faculty | UserRole::Staff
        ),
        Capability::UploadDocument
        | Capability::SubmitForSignatures
        | Capability::DownloadDocument
        | Capability::VerifyDocument => true,
    }
}

/// Require a capability, failing with `Unauthorized` otherwise
pub fn require(role: UserRole, capability: Capability) -> WorkflowResult<()> {
    if role_allows(role, capability) {
        Ok(())
    } else {
        Err(WorkflowError::Unauthorized {
            role,
            operation: capability.operation().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_cannot_sign() {
        assert!(!role_allows(UserRole::Student, Capability::SignDocument));
        assert!(role_allows(UserRole::Student, Capability::UploadDocument));
        assert!(role_allows(UserRole::Student, Capability::VerifyDocument));
    }

    #[test]
    fn test_institutional_roles_can_sign() {
        for role in [UserRole::Admin, UserRole::Faculty, UserRole::Staff] {
            assert!(role_allows(role, Capability::SignDocument));
        }
    }

    #[test]
    fn test_require_produces_unauthorized() {
        let result = require(UserRole::Student, Capability::SignDocument);
        assert!(matches!(
            result,
            Err(WorkflowError::Unauthorized { .. })
        ));
    }
}
