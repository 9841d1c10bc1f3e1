use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatenaError {
    #[error("missing API key: set the MAGISTERIUM_API_KEY environment variable")]
    MissingCredential,

    #[error("invalid request: {0}")]
    InvalidPayload(String),

    #[error("upstream request timed out after {0} seconds")]
    UpstreamTimeout(u64),

    #[error("upstream error (status {status})")]
    Upstream { status: u16, detail: String },

    #[error("malformed upstream reply: {0}")]
    MalformedReply(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type CatenaResult<T> = Result<T, CatenaError>;
