//! Error types for footsize

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for footsize operations
pub type Result<T> = std::result::Result<T, FootError>;

/// Which edge-detection pass of the measurement ran out of contours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPass {
    /// Pass over the whole photograph, looking for the paper
    First,
    /// Pass over the paper overlay, looking for the foot
    Second,
}

impl fmt::Display for DetectionPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionPass::First => write!(f, "pass 1"),
            DetectionPass::Second => write!(f, "pass 2"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FootError {
    /// Input bytes could not be decoded as a raster image
    #[error("Failed to decode image: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<image::ImageError>,
    },

    /// File extension is not one of the accepted image formats
    #[error("Unsupported image format: {file_name}")]
    UnsupportedFormat { file_name: String },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Too few ranked contours to pick the paper or the foot
    #[error("Insufficient contours, {pass}: found {found}, need {required}")]
    Detection {
        pass: DetectionPass,
        found: usize,
        required: usize,
    },

    /// No size chart exists for the platform/gender pair
    #[error("No size chart for platform '{platform}', gender '{gender}'")]
    ChartNotFound { platform: String, gender: String },

    #[error("Size chart {} has no rows", path.display())]
    EmptyChart { path: PathBuf },

    #[error("Malformed size chart {}", path.display())]
    Chart {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid foot size: {value}")]
    InvalidSize { value: f64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Writing an intermediate image to the debug directory failed
    #[error("Failed to save debug image {}", path.display())]
    DebugOutput {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl FootError {
    pub fn decode(source: image::ImageError) -> Self {
        Self::Decode {
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the photo was readable but the foot/paper could not be found
    pub fn is_detection(&self) -> bool {
        matches!(self, FootError::Detection { .. })
    }

    /// Message suitable for showing to the person who took the photo
    pub fn user_message(&self) -> String {
        match self {
            FootError::Decode { .. } | FootError::Io { .. } => {
                "Failed to read the uploaded image".to_string()
            }
            FootError::UnsupportedFormat { .. } => {
                "Invalid file format. Allowed formats: png, jpg, jpeg, gif".to_string()
            }
            FootError::Detection { .. } => {
                "Foot could not be detected. Try again with a clearer image.".to_string()
            }
            FootError::ChartNotFound { .. } => "Platform or gender file not found".to_string(),
            FootError::EmptyChart { .. } => "Foot size not found".to_string(),
            FootError::InvalidSize { .. } => "Invalid foot size value".to_string(),
            FootError::Chart { .. } | FootError::Config { .. } | FootError::DebugOutput { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
