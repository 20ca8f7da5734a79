//! Users: the identities that upload, route, and sign documents

use crate::CertificateStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── User Identifier ──────────────────────────────────────────────────

/// Unique identifier for a user
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── User Role ────────────────────────────────────────────────────────

/// Institutional role of a user.
///
/// Roles gate which engine operations are permitted; the check itself
/// lives at the engine boundary, not here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Faculty,
    Staff,
    Student,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Admin => "admin",
            Self::Faculty => "faculty",
            Self::Staff => "staff",
            Self::Student => "student",
        };
        write!(f, "{}", label)
    }
}

// ── User ─────────────────────────────────────────────────────────────

/// A registered user of the signature system
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,
    /// Institutional email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Institutional role
    pub role: UserRole,
    /// Department or faculty the user belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Status of the user's signing certificate
    pub certificate_status: CertificateStatus,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last recorded login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with a pending certificate
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            name: name.into(),
            role,
            department: None,
            certificate_status: CertificateStatus::Pending,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_certificate_status(mut self, status: CertificateStatus) -> Self {
        self.certificate_status = status;
        self
    }
}
