use thiserror::Error;

#[derive(Debug, Error)]
pub enum RcTogetherError {
    #[error("RC Together responded with {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("serde failed: {0}")]
    SerdeError(#[from] serde_json::Error),
}
