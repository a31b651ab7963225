//! Error types for the tone_sort library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tone_sort operations
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Error types for scanning, feature extraction and file placement
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Image file could not be opened, decoded or converted to RGB
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Decoded raster contains no pixels
    #[error("Image has no pixels: {id}")]
    EmptyImage { id: String },

    /// Source path does not exist
    #[error("Path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// Source path exists but is not a directory
    #[error("Path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Source path cannot be read
    #[error("Access denied: {}", path.display())]
    AccessDenied { path: PathBuf },

    /// Moving, copying or creating files failed
    #[error("File operation failed: {message}")]
    FileOperationError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be read, parsed or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Batch was aborted through the cancel flag
    #[error("Operation cancelled")]
    Cancelled,
}

impl ClassifierError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a file operation error with context
    pub fn file_operation(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileOperationError {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error only affects a single item of a batch
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClassifierError::ImageLoadError { .. }
                | ClassifierError::EmptyImage { .. }
                | ClassifierError::FileOperationError { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            ClassifierError::ImageLoadError { .. } | ClassifierError::EmptyImage { .. } => {
                "Could not read the image. It may be corrupt or in an unsupported format.".to_string()
            }
            ClassifierError::PathNotFound { path } => {
                format!("The folder '{}' does not exist.", path.display())
            }
            ClassifierError::NotADirectory { path } => {
                format!("'{}' is a file. Please choose a folder.", path.display())
            }
            ClassifierError::AccessDenied { path } => {
                format!("Permission denied while reading '{}'.", path.display())
            }
            ClassifierError::Cancelled => "The operation was cancelled.".to_string(),
            _ => "Classification failed. Please check the settings and try again.".to_string(),
        }
    }
}
