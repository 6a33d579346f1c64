use http::StatusCode;
use thiserror::Error;

/// Any failure talking to the GitHub API. Nothing at this layer retries;
/// the error aborts the collect phase of the run.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("github api error: {status} for {endpoint}")]
    Http {
        status: StatusCode,
        endpoint: String,
    },
    #[error("github transport error for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("github payload decode error for {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid github request url: {0}")]
    Url(#[from] url::ParseError),
    #[error("repository pagination exceeded {max_pages} pages without an empty page")]
    PaginationOverflow { max_pages: u32 },
}

impl UpstreamError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
        }
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
