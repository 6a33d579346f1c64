use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model api error: {status} for {endpoint}")]
    Http {
        status: StatusCode,
        endpoint: String,
    },
    #[error("model transport error for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid model endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error("completion response contained no choices")]
    EmptyCompletion,
    #[error("image response contained no data")]
    EmptyImage,
    #[error("no model tiers configured")]
    NoTiers,
    #[error("all model tiers failed; last error: {0}")]
    TiersExhausted(#[source] Box<GenerationError>),
}

impl GenerationError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
        }
    }
}
