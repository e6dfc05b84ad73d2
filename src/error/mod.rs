use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or malformed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },

    /// Caller-supplied input was rejected before any network call.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the invalid input.
        message: String,
    },

    /// A call to the AI worker failed.
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// A worker response body could not be normalized.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// The project store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Anything that should not happen.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

/// Errors from a single call to the AI worker service.
///
/// One variant per failure class; the variant is what callers dispatch on,
/// the payload is best-effort diagnostics.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The worker could not be reached (connection failure or timeout).
    #[error("Unable to reach the AI worker: {message}")]
    Network {
        /// Underlying transport error text.
        message: String,
    },

    /// The worker responded with a non-2xx status.
    #[error("AI worker returned status {status}")]
    Http {
        /// HTTP status code returned by the worker.
        status: u16,
        /// Response body, when it could be read.
        body: Option<String>,
    },

    /// The worker responded 2xx but the body could not be decoded.
    #[error("Invalid response from the AI worker: {message}")]
    Parse {
        /// Decode error text.
        message: String,
        /// Raw response body, when it could be read.
        body: Option<String>,
    },

    /// Anything that does not fit the classes above.
    #[error("Unexpected worker failure: {message}")]
    Unknown {
        /// Description of the failure.
        message: String,
    },
}

impl WorkerError {
    /// User-facing message for rendering alongside a failed diagram.
    pub fn user_message(&self) -> String {
        match self {
            WorkerError::Network { .. } => {
                "We couldn't reach the AI worker. Check your connection and try again.".to_string()
            }
            WorkerError::Http { status, .. } if *status >= 500 => {
                "The AI worker encountered an internal error. Please try again in a moment."
                    .to_string()
            }
            WorkerError::Http { status, .. } => {
                format!("The AI worker returned an unexpected response: {status}.")
            }
            WorkerError::Parse { .. } => {
                "The AI worker returned data we couldn't understand. Please try again.".to_string()
            }
            WorkerError::Unknown { message } => message.clone(),
        }
    }
}

/// Errors from response-body normalization.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The payload was not valid JSON after every recovery pass.
    #[error("Unable to normalize AI JSON response")]
    UnnormalizableJson,
}

/// Project-store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A read from the store failed.
    #[error("Store read failed: {message}")]
    Read {
        /// Underlying store error text.
        message: String,
    },

    /// A write to the store failed.
    #[error("Store write failed: {message}")]
    Write {
        /// Underlying store error text.
        message: String,
    },

    /// The store itself could not be reached.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Underlying store error text.
        message: String,
    },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for worker calls
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Result type alias for normalization
pub type FormatResult<T> = Result<T, FormatError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
