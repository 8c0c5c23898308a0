//! Simulated document analysis.
//!
//! Stand-in for a future hosted analysis function: a fixed delay followed
//! by a canned report. Lives behind the `DocumentAnalyzer` contract so the
//! real collaborator can replace it without touching callers.

use std::time::Duration;

use async_trait::async_trait;

use escriba_core::analyzer::{
    AnalysisReport, DocumentAnalyzer, DocumentUpload, Finding, Severity,
};
use escriba_core::error::Result;

const SIMULATED_DELAY: Duration = Duration::from_secs(3);

/// Analyzer that simulates a remote analysis run.
pub struct SimulatedAnalyzer {
    delay: Duration,
}

impl SimulatedAnalyzer {
    pub fn new() -> Self {
        Self {
            delay: SIMULATED_DELAY,
        }
    }

    /// Overrides the simulated latency (used by tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for SimulatedAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentAnalyzer for SimulatedAnalyzer {
    async fn analyze(&self, upload: &DocumentUpload) -> Result<AnalysisReport> {
        tracing::debug!(file = upload.file_name(), "Simulating document analysis");
        tokio::time::sleep(self.delay).await;

        Ok(AnalysisReport {
            document_type: "Matrícula Imobiliária".to_string(),
            confidence: 85,
            findings: vec![
                Finding::new(Severity::Passed, "Documento autenticado corretamente"),
                Finding::new(Severity::Passed, "Assinaturas válidas detectadas"),
                Finding::new(
                    Severity::Warning,
                    "Verificar data de emissão (mais de 90 dias)",
                ),
                Finding::new(Severity::Failed, "Falta certidão de regularidade fiscal"),
            ],
        })
    }
}
