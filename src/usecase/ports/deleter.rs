#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeleteError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("delete rejected: {0}")]
    Rejected(String),
}

/// Propagates a row deletion to whatever owns the backing data.
pub trait RecordDeleter<R> {
    fn delete(&self, record: &R) -> Result<(), DeleteError>;
}

impl<R, F> RecordDeleter<R> for F
where
    F: Fn(&R) -> Result<(), DeleteError>,
{
    fn delete(&self, record: &R) -> Result<(), DeleteError> {
        self(record)
    }
}
