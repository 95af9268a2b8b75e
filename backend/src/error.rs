//! Error types for dataset loading, configuration and rendering.
//!
//! Per-field parse failures are never errors: an unparsable timestamp or
//! coordinate simply becomes `None` (or an `Invalid` coordinate quality) on the
//! record. The variants below cover the failures that actually stop something.

use std::fmt;
use std::path::PathBuf;

/// Result type for library operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Structured context for analytics errors.
///
/// Provides additional information about where and why an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "load_dataset", "read_config")
    pub operation: Option<String>,
    /// The entity involved (e.g., a chart id or a file path)
    pub entity: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity involved.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for library operations.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// The dataset could not be read. Terminal for the dashboard.
    #[error("Failed to load dataset {}: {source} {context}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        context: ErrorContext,
    },

    /// The dataset was read but contained no header line or no records.
    #[error("Empty dataset: {message} {context}")]
    EmptyDataset {
        message: String,
        context: ErrorContext,
    },

    /// Configuration file missing, unreadable or malformed.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Writing an output file failed (maintenance tools).
    #[error("Write error: {message} {context}")]
    Write {
        message: String,
        context: ErrorContext,
    },
}

impl AnalyticsError {
    /// Create a load error for `path`.
    pub fn load(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let context = ErrorContext::new("load_dataset").with_entity(path.display().to_string());
        Self::Load {
            path,
            source,
            context,
        }
    }

    /// Create an empty-dataset error.
    pub fn empty_dataset(message: impl Into<String>) -> Self {
        Self::EmptyDataset {
            message: message.into(),
            context: ErrorContext::new("require_records"),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error with context.
    pub fn configuration_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Configuration {
            message: message.into(),
            context,
        }
    }

    /// Create a write error with context.
    pub fn write_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Write {
            message: message.into(),
            context,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Load { context, .. }
            | Self::EmptyDataset { context, .. }
            | Self::Configuration { context, .. }
            | Self::Write { context, .. } => Some(context),
        }
    }
}

/// Failure of a single renderer. Isolated by the dashboard: the message is
/// shown inline in the container and the pass continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// The container exists but has no display area.
    #[error("container '{0}' has zero display area")]
    ZeroArea(String),

    /// The mapping library is not available.
    #[error("map library unavailable: {0}")]
    MapUnavailable(String),

    /// The data handed to the renderer is inconsistent (e.g. labels and values differ in length).
    #[error("invalid chart data for '{container}': {message}")]
    InvalidData { container: String, message: String },
}
