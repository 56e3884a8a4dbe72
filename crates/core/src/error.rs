use thiserror::Error;

/// Result type for searchbench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy category, used for logging and for mapping failures to exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Search backend unreachable, timed out or answered with an error status
    Connectivity,
    /// Unknown environment profile, malformed test case or invalid settings
    Configuration,
    /// Malformed result payload from the search backend
    MetricComputation,
    /// Benchmark entry could not be persisted
    StoreWrite,
    /// Benchmark store could not be opened or read
    Store,
    /// Everything else (I/O, serialization, wrapped errors)
    Internal,
}

impl ErrorCategory {
    /// Stable code for the category, as it appears in logs and reports
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connectivity => "CONNECTIVITY_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::MetricComputation => "METRIC_COMPUTATION_ERROR",
            Self::StoreWrite => "STORE_WRITE_ERROR",
            Self::Store => "STORE_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Main error type for searchbench operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Search backend unreachable or timed out
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Malformed payload returned by the search backend
    #[error("Metric computation error: {0}")]
    MetricComputation(String),

    /// Benchmark entry could not be appended
    #[error("Store write error: {0}")]
    StoreWrite(String),

    /// Benchmark store could not be opened or read
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a connectivity error
    pub fn connectivity(msg: impl Into<String>) -> Self {
        Self::Connectivity(msg.into())
    }

    /// Creates a metric computation error
    pub fn metric_computation(msg: impl Into<String>) -> Self {
        Self::MetricComputation(msg.into())
    }

    /// Creates a store write error
    pub fn store_write(msg: impl Into<String>) -> Self {
        Self::StoreWrite(msg.into())
    }

    /// Creates a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Taxonomy category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Connectivity(_) => ErrorCategory::Connectivity,
            Self::MetricComputation(_) => ErrorCategory::MetricComputation,
            Self::StoreWrite(_) => ErrorCategory::StoreWrite,
            Self::Storage(_) => ErrorCategory::Store,
            Self::Io(_) | Self::Serialization(_) | Self::WithContext { .. } | Self::Other(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Whether this error is a search connectivity failure
    pub fn is_connectivity(&self) -> bool {
        self.category() == ErrorCategory::Connectivity
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            Error::connectivity("timeout").category(),
            ErrorCategory::Connectivity
        );
        assert_eq!(
            Error::config("unknown profile").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            Error::store_write("disk full").category(),
            ErrorCategory::StoreWrite
        );
        assert_eq!(
            Error::storage("unreachable").category().code(),
            "STORE_ERROR"
        );
        assert!(Error::connectivity("refused").is_connectivity());
        assert!(!Error::metric_computation("missing score").is_connectivity());
    }

    #[test]
    fn test_context_wraps_source() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = io.context("Failed to read suite").unwrap_err();
        assert!(err.to_string().starts_with("Failed to read suite"));
        assert_eq!(err.category(), ErrorCategory::Internal);
    }
}
