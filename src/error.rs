use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifeError {
    /// Zero-sized grid, or storage that does not hold exactly `width * height` cells.
    #[error("invalid grid dimension {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    #[error("grid dimension mismatch: expected {}x{}, found {}x{}", expected.0, expected.1, found.0, found.1)]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("workers per side must lie in 1..=8, got {0}")]
    InvalidSplit(usize),

    #[error("live-cell density must lie in [0, 1], got {0}")]
    InvalidDensity(f32),

    #[error("unknown pattern `{0}`")]
    UnknownPattern(String),

    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = LifeError> = std::result::Result<T, E>;
