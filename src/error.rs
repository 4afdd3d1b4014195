use thiserror::Error;

/// Top-level error type for grind spline generation.
#[derive(Debug, Error)]
pub enum GrindError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to the scene arena and its hierarchy.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("point index {index} is out of range for a spline with {len} points")]
    PointOutOfRange { index: usize, len: usize },
}

/// Errors raised by a generation run.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("surface is already being generated")]
    SurfaceBusy,

    #[error("generation run has already finished")]
    Finished,
}

/// Errors related to loading or validating tuning parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid tuning value {field} = {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Convenience type alias for results using [`GrindError`].
pub type Result<T> = std::result::Result<T, GrindError>;
