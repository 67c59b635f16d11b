use std::path::PathBuf;

use thiserror::Error;

/// Every way a deployment run can fail. Callers treat all of them as
/// "deployment failed"; the variants only sharpen the printed message.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid network configuration: {0}")]
    Config(String),

    #[error("unusable contract artifact {path}: {reason}")]
    Artifact { path: PathBuf, reason: String },

    #[error("deployment failed: {0}")]
    Deployment(String),
}

impl DeployError {
    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Artifact {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
