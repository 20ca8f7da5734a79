//! ADSMS Signature Workflow Engine
//!
//! Routes documents through ordered multi-signer approval chains. A
//! document is uploaded as a draft, submitted with a fixed signer order,
//! then signed one signer at a time until the chain seals (signed) or a
//! rejection or timeout freezes it. Every accepted mutation leaves an
//! audit entry; verification replays the sealed chain against the
//! certificate directory.
//!
//! ```
//! use adsms_engine::{SignatureWorkflowEngine, UploadRequest};
//! use adsms_storage::{
//!     InMemoryAuditLedger, InMemoryBlobStore, InMemoryCertificateDirectory,
//! };
//! use adsms_types::{
//!     Certificate, CertificateStatus, DocumentStatus, DocumentType, User, UserId, UserRole,
//! };
//! use chrono::{Duration, Utc};
//! use std::sync::Arc;
//!
//! let directory = Arc::new(InMemoryCertificateDirectory::new());
//! let engine = SignatureWorkflowEngine::new(
//!     directory.clone(),
//!     Arc::new(InMemoryAuditLedger::new()),
//!     Arc::new(InMemoryBlobStore::new()),
//! );
//!
//! let student = User::new("s@univ.edu", "Student", UserRole::Student)
//!     .with_id(UserId::new("student"));
//! let dean = User::new("d@univ.edu", "Dean", UserRole::Faculty)
//!     .with_id(UserId::new("dean"))
//!     .with_certificate_status(CertificateStatus::Active);
//!
//! let now = Utc::now();
//! directory
//!     .issue(Certificate::new(
//!         dean.id.clone(),
//!         "SN-DEAN-1",
//!         "CN=University CA",
//!         "CN=Dean of Studies",
//!         now - Duration::days(1),
//!         now + Duration::days(364),
//!     ))
//!     .unwrap();
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let request = UploadRequest::new(
//!         "Enrollment Form",
//!         DocumentType::AdministrativeForm,
//!         "form.pdf",
//!         b"%PDF-1.7".to_vec(),
//!     );
//!     let submitted = engine
//!         .upload_and_submit(&student, request, &[dean.id.clone()])
//!         .await
//!         .unwrap();
//!
//!     let signed = engine.sign(&submitted.document.id, &dean).await.unwrap();
//!     assert_eq!(signed.document.status, DocumentStatus::Signed);
//!
//!     let result = engine.verify(&signed.document.id, Utc::now()).await.unwrap();
//!     assert!(result.is_valid);
//! });
//! ```

#![deny(unsafe_code)]

pub mod authz;
pub mod config;
pub mod engine;
pub mod outcome;
pub mod verification;

pub use authz::{require, role_allows, Capability};
pub use config::EngineConfig;
pub use engine::{SignatureWorkflowEngine, UploadRequest, WorkflowStats};
pub use outcome::{AuditOutcome, Mutation};
pub use verification::assess;
