use thiserror::Error;

/// Failures surfaced by the query layer.
///
/// `Internal` keeps the storage error as its source for logging but only
/// displays a generic message.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{what} not found")]
    NotFound { what: String },
    #[error("storage query failed")]
    Internal(#[source] anyhow::Error),
}

impl QueryError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<anyhow::Error> for QueryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
