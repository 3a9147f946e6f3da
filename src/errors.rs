use std::{
    error::Error,
    fmt::{self, Display},
};

/// Failures from the polygon toolkit. Most of these are recoverable by the
/// pipelines, which keep whatever geometry they had before the failing step.
#[derive(Debug)]
pub enum GeometryError {
    EmptyGeometry,
    BooleanOpFailed(String),
}

impl Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::EmptyGeometry => write!(f, "Empty/Invalid/Dimensionless geometry"),
            GeometryError::BooleanOpFailed(msg) => write!(f, "Boolean operation failed: {}", msg),
        }
    }
}

impl Error for GeometryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

#[derive(Debug)]
pub enum ContextError {
    PoppedEmptyStack,
    SvgGenerationError(String),
    RasterError(String),
}

impl std::error::Error for ContextError {}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContextError::PoppedEmptyStack => write!(f, "Popping from an empty context stack."),
            ContextError::SvgGenerationError(msg) => write!(f, "Svg generation error: {}", msg),
            ContextError::RasterError(msg) => write!(f, "Raster generation error: {}", msg),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Invalid(String),
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Could not read config: {}", err),
            ConfigError::Parse(err) => write!(f, "Could not parse config: {}", err),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(err: ron::error::SpannedError) -> Self {
        ConfigError::Parse(err)
    }
}
