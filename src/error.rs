//! Service map errors
//!
//! Two outcomes besides success: an upstream collection fetch failed, or
//! something else went wrong while deriving the graph. Neither yields a
//! partial graph.

use crate::kube::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceMapError {
    /// A resource collection could not be listed
    #[error(transparent)]
    UpstreamFetch(FetchError),

    /// Any other failure while building the graph
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<FetchError> for ServiceMapError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Api { .. } => ServiceMapError::UpstreamFetch(err),
            // The API server answered fine; re-encoding its answer did not
            FetchError::Decode { .. } => ServiceMapError::Unexpected(anyhow::Error::new(err)),
        }
    }
}

/// Result type for service map operations
pub type ServiceMapResult<T> = Result<T, ServiceMapError>;
