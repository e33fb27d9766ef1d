use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Duplicate license plate: {plate}")]
    DuplicateKey { plate: String },

    #[error("Invalid {field} '{value}': {reason}")]
    Format {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{field} out of range '{value}': {reason}")]
    Range {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Row {index} is outside the displayed listings ({len} rows)")]
    Index { index: usize, len: usize },

    #[error("No listing with license plate {plate}")]
    NotFound { plate: String },

    #[error("Corrupt listing data: {reason}")]
    CorruptData { reason: String },

    #[error("Failed to persist listings: {reason}")]
    PersistenceWrite { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Lookup,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ListingError {
    pub fn format(field: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn range(field: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Range {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateKey { .. } | Self::Format { .. } | Self::Range { .. } => {
                ErrorCategory::Validation
            }
            Self::Index { .. } | Self::NotFound { .. } => ErrorCategory::Lookup,
            Self::CorruptData { .. }
            | Self::PersistenceWrite { .. }
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => match self {
                Self::CorruptData { .. } => ErrorSeverity::Medium,
                _ => ErrorSeverity::Critical,
            },
        }
    }

    /// Text shown to the user in a notification.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::DuplicateKey { .. } => concat!(
                "A car with this license plate already exists in our system. ",
                "Make sure you've entered the correct license."
            )
            .to_string(),
            Self::Format { field, .. } if field == "licensePlate" => {
                "Please enter a license plate in the following format: ABC123".to_string()
            }
            Self::Format { field, .. } if field == "owner" => {
                "Invalid name, please try again".to_string()
            }
            Self::Format { field, reason, .. } | Self::Range { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            Self::Index { .. } => "That listing is no longer displayed".to_string(),
            Self::NotFound { plate } => format!("No car with license plate {} found", plate),
            Self::CorruptData { .. } => {
                "Saved listings could not be read, some listings may be missing".to_string()
            }
            Self::PersistenceWrite { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                "Listings could not be saved, your change was not applied".to_string()
            }
            Self::ConfigError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::DuplicateKey { .. } => "Search for the plate to view the existing listing",
            Self::Format { .. } | Self::Range { .. } => "Correct the highlighted field and submit again",
            Self::Index { .. } | Self::NotFound { .. } => "Refresh the listing view and try again",
            Self::CorruptData { .. } => "Restore the storage slot from a backup or delete it to start over",
            Self::PersistenceWrite { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                "Check free disk space and permissions on the data directory"
            }
            Self::ConfigError { .. } => "Fix the configuration file or command line options",
        }
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;
