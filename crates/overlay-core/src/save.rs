//! Submits the modification list for recompilation

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::SaveError;
use crate::service::PdfService;
use crate::session::{DocumentSession, SessionState};

/// Recompiled document, ready for download
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct SaveController<S> {
    service: Arc<S>,
}

impl<S: PdfService> SaveController<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Save is allowed once loading has stopped, successfully or not
    pub fn can_save(session: &DocumentSession) -> bool {
        matches!(session.state(), SessionState::Ready | SessionState::Failed)
    }

    /// Compile the session's edits into a new document.
    ///
    /// The session is never mutated, so a failed save can be retried as is.
    pub async fn save(&self, session: &DocumentSession) -> Result<Artifact, SaveError> {
        if !Self::can_save(session) {
            return Err(SaveError::NotReady(session.state()));
        }

        let modifications = session.modifications();
        if modifications.is_empty() {
            info!("Save requested with no modifications");
            return Err(SaveError::NothingToSave);
        }

        info!(
            file = %session.source().name(),
            modifications = modifications.len(),
            "Submitting compile request"
        );

        let bytes = self
            .service
            .compile(session.source(), &modifications)
            .await
            .map_err(|e| {
                warn!(error = %e, "Compile failed");
                SaveError::Compile(e.user_message().to_string())
            })?;

        info!(bytes = bytes.len(), "Compile succeeded");

        Ok(Artifact {
            file_name: artifact_name(session.source().name()),
            bytes,
        })
    }
}

/// Download name for the recompiled document
pub fn artifact_name(source_name: &str) -> String {
    format!("edited_{}", source_name)
}
