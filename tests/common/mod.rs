#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from footsize for tests
pub use footsize::{
    BoundingBox, DetectionPass, EstimatorConfig, FootError, FootEstimator, MeasurementResult,
    PaperSize,
};
