use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueFunctionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Feature width or target length disagrees with what was expected.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Batch contains no rows")]
    EmptyBatch,

    /// Reading tensor values back to the host failed.
    #[error("Tensor data error: {0}")]
    TensorData(String),
}

pub type Result<T> = std::result::Result<T, ValueFunctionError>;
