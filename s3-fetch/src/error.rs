use thiserror::Error;

/// Failures outside the classified fetch path. Each one turns into a 500.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build response: {0}")]
    Response(#[from] http::Error),
}
