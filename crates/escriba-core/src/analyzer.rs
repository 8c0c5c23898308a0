//! Document analysis collaborator contract.
//!
//! Analysis itself is delegated to an external collaborator behind the
//! [`DocumentAnalyzer`] trait; this module owns upload validation and the
//! report shape. `escriba-interaction` currently provides a simulated
//! implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::{EscribaError, Result};

/// Maximum accepted upload size (10 MB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Media types accepted for analysis.
pub const ACCEPTED_MEDIA_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

/// A document selected for analysis, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    file_name: String,
    media_type: String,
    size_bytes: u64,
}

impl DocumentUpload {
    /// Validates and wraps an upload candidate.
    ///
    /// Rejects unsupported media types and files over [`MAX_UPLOAD_BYTES`]
    /// before any collaborator is invoked.
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        size_bytes: u64,
    ) -> Result<Self> {
        let media_type = media_type.into();
        if !ACCEPTED_MEDIA_TYPES.contains(&media_type.as_str()) {
            return Err(EscribaError::validation(format!(
                "Unsupported file type: {media_type} (expected PDF, JPG or PNG)"
            )));
        }
        if size_bytes > MAX_UPLOAD_BYTES {
            return Err(EscribaError::validation(format!(
                "File too large: {size_bytes} bytes (limit is {MAX_UPLOAD_BYTES})"
            )));
        }
        Ok(Self {
            file_name: file_name.into(),
            media_type,
            size_bytes,
        })
    }

    /// Guesses the media type from the file extension, then validates.
    pub fn from_path_hint(file_name: impl Into<String>, size_bytes: u64) -> Result<Self> {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let media_type = match extension.as_str() {
            "pdf" => "application/pdf",
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            other => {
                return Err(EscribaError::validation(format!(
                    "Unsupported file extension: .{other} (expected PDF, JPG or PNG)"
                )));
            }
        };
        Self::new(file_name, media_type, size_bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Severity of an individual analysis finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The check passed.
    #[strum(serialize = "ok")]
    Passed,
    /// Worth reviewing, not blocking.
    #[strum(serialize = "atenção")]
    Warning,
    /// A blocking problem.
    #[strum(serialize = "pendência")]
    Failed,
}

/// One finding inside an analysis report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// The collaborator's verdict on an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Detected document type (e.g. "Matrícula Imobiliária").
    pub document_type: String,
    /// Confidence in the detection, 0..=100.
    pub confidence: u8,
    pub findings: Vec<Finding>,
}

impl AnalysisReport {
    /// True when no finding is blocking.
    pub fn is_clean(&self) -> bool {
        !self
            .findings
            .iter()
            .any(|finding| finding.severity == Severity::Failed)
    }
}

/// External document-analysis collaborator.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(&self, upload: &DocumentUpload) -> Result<AnalysisReport>;
}
