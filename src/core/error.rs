//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (configuration) error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Every slot of the ring is still waiting to be drained
    #[error("Slot pool full: {capacity} slots pending")]
    PoolFull { capacity: usize },

    /// Logger already stopped
    #[error("Logger already stopped")]
    LoggerStopped,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// Template does not fit the slot's template buffer
    #[error("Template of {len} bytes exceeds the {max} byte limit")]
    TemplateTooLong { len: usize, max: usize },

    /// Argument payload does not fit its cell and truncation is disabled
    #[error("Argument #{index} of {len} bytes exceeds the {max} byte limit")]
    ArgumentTooLarge { index: usize, len: usize, max: usize },

    /// More arguments than the slot has cells
    #[error("Too many arguments: slot holds at most {max}")]
    TooManyArguments { max: usize },

    /// Placeholder count and argument count disagree
    #[error("Template has {placeholders} placeholders but {arguments} arguments were supplied")]
    ArgumentCountMismatch { placeholders: usize, arguments: usize },

    /// Conversion spelling after `%` names a different kind than the argument
    #[error("Placeholder #{index} is written as '%{directive}' but the argument is {kind}")]
    TypeMismatch {
        index: usize,
        directive: String,
        kind: String,
    },

    /// A record builder was dropped without `commit()`
    #[error("Record was not terminated with commit()")]
    UnterminatedRecord,

    /// A slot could not be rendered back into text
    #[error("Render error: {0}")]
    RenderError(String),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a pool full error
    pub fn pool_full(capacity: usize) -> Self {
        LoggerError::PoolFull { capacity }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(index: usize, directive: &[u8], kind: impl Into<String>) -> Self {
        LoggerError::TypeMismatch {
            index,
            directive: String::from_utf8_lossy(directive).into_owned(),
            kind: kind.into(),
        }
    }

    /// Create a render error
    pub fn render<S: Into<String>>(msg: S) -> Self {
        LoggerError::RenderError(msg.into())
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True for errors caused by a malformed call site rather than load or I/O
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            LoggerError::TemplateTooLong { .. }
                | LoggerError::ArgumentTooLarge { .. }
                | LoggerError::TooManyArguments { .. }
                | LoggerError::ArgumentCountMismatch { .. }
                | LoggerError::TypeMismatch { .. }
                | LoggerError::UnterminatedRecord
        )
    }
}
