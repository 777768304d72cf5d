use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Cannot create output file {path}: {source}")]
    OutputCreate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for BundleError {
    fn user_message(&self) -> String {
        match self {
            BundleError::OutputCreate { path, source } => {
                format!("Could not create output file {}: {}", path, source)
            }
            BundleError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            BundleError::InvalidPattern { pattern, .. } => {
                format!("Invalid exclude pattern: {}", pattern)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            BundleError::OutputCreate { .. } => Some(
                "Check that the parent directory exists and that you have write permission for it.".to_string()
            ),
            BundleError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            BundleError::InvalidPattern { .. } => Some(
                "Exclude patterns are regular expressions; escape literal dots as \\. (e.g., --exclude-pattern '.*\\.bak')".to_string()
            ),
            _ => None,
        }
    }
}

impl BundleError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BundleError::Config { .. } | BundleError::InvalidPattern { .. } => 2,
            BundleError::OutputCreate { .. } => 3,
            BundleError::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
