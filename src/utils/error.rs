use crate::domain::model::CoordinateRole;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Could not convert easting value '{value}' to float - format error!")]
    EastingFormatError { value: String },

    #[error("Could not convert northing value '{value}' to float - format error!")]
    NorthingFormatError { value: String },

    #[error("Could not convert zone value '{value}' to integer - format error!")]
    ZoneFormatError { value: String },

    #[error("Invalid input stream: {message}")]
    InvalidStream { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Present but malformed numeric input in a record.
    Format,
    /// The request body is not a JSON array of objects.
    Input,
    Configuration,
    System,
}

impl TransformError {
    /// Builds the format error matching the role whose value failed to parse.
    pub fn format(role: CoordinateRole, value: impl Into<String>) -> Self {
        let value = value.into();
        match role {
            CoordinateRole::Easting => Self::EastingFormatError { value },
            CoordinateRole::Northing => Self::NorthingFormatError { value },
            // hemisphere is compared, never parsed
            CoordinateRole::Zone | CoordinateRole::Hemisphere => Self::ZoneFormatError { value },
        }
    }

    pub fn is_format_error(&self) -> bool {
        self.category() == ErrorCategory::Format
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EastingFormatError { .. }
            | Self::NorthingFormatError { .. }
            | Self::ZoneFormatError { .. } => ErrorCategory::Format,
            Self::InvalidStream { .. } | Self::SerializationError(_) => ErrorCategory::Input,
            Self::TomlError(_) | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Format => format!("A record contains a malformed coordinate: {}", self),
            ErrorCategory::Input => format!("The request body could not be read: {}", self),
            ErrorCategory::Configuration => format!("The service is misconfigured: {}", self),
            ErrorCategory::System => format!("A system error occurred: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Format => {
                "Check the upstream data: easting/northing must be numbers and zone an integer"
            }
            ErrorCategory::Input => "Send a JSON array of flat objects",
            ErrorCategory::Configuration => {
                "Check the *_PROPERTY / *_DEFAULT environment variables or the TOML config file"
            }
            ErrorCategory::System => "Check file permissions and that the listen address is free",
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
