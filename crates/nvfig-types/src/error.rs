use thiserror::Error;

#[derive(Error, Debug)]
pub enum FigureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("Non-finite field sample in frame {frame} (parameter = {parameter})")]
    NonFinite { frame: usize, parameter: f64 },

    #[error("Data error: {0}")]
    Data(String),

    #[error("Curve fit failed after {iterations} iterations: {message}")]
    FitFailed { iterations: usize, message: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FigureResult<T> = Result<T, FigureError>;
