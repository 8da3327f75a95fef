use thiserror::Error;

/// Failures that abort a purge run
#[derive(Debug, Error)]
pub enum PurgeError {
    /// A required setting is missing, blank or malformed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The exclusion tag does not exist on the service
    #[error("could not find tag with name: '{0}'")]
    NotFound(String),

    /// The service answered with a non-success status
    #[error("{context}: {status}\n{body}")]
    Http {
        context: String,
        status: String,
        body: String,
    },

    /// The service returned data that does not add up
    #[error("data consistency error: {0}")]
    DataConsistency(String),
}
