use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("origin request policy `{id}` does not exist")]
    NotFound { id: String },

    /// The If-Match ETag no longer matches the remote policy.
    #[error("origin request policy `{id}` was modified since it was last read (stale ETag)")]
    Conflict { id: String },

    #[error("CloudFront request failed: {0}")]
    Remote(String),

    #[error("invalid origin request policy: {0}")]
    InvalidConfig(String),

    #[error("unexpected CloudFront response: {0}")]
    InvalidResponse(String),
}

impl PolicyError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PolicyError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, PolicyError::Conflict { .. })
    }
}

impl From<aws_sdk_cloudfront::error::BuildError> for PolicyError {
    fn from(value: aws_sdk_cloudfront::error::BuildError) -> Self {
        PolicyError::InvalidConfig(value.to_string())
    }
}
