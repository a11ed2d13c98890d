/// Result alias that carries the custom [`SortVizError`] type.
pub type Result<T> = std::result::Result<T, SortVizError>;

/// Common error type for the core crate.
///
/// None of these are fatal to the process. Input errors leave the loaded
/// sequence untouched, and errors raised inside a run end that run.
#[derive(Debug, thiserror::Error)]
pub enum SortVizError {
    /// Free-form message, mostly used for poisoned shared state.
    #[error("{0}")]
    Message(String),
    /// The textual input could not be turned into a sequence.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("too many elements: got {count}, at most {limit} allowed")]
    TooManyElements { count: usize, limit: usize },
    #[error("no sorting algorithm selected")]
    NoAlgorithmSelected,
    #[error("a sort is already running")]
    AlreadyRunning,
    /// Raised from a suspension point once cancellation was requested.
    #[error("run cancelled")]
    Cancelled,
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl SortVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for SortVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SortVizError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
