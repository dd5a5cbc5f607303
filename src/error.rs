use thiserror::Error;

pub type StatsResult<T> = Result<T, StatsError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("empty input: no samples and no explicit range")]
    EmptyInput,

    #[error("invalid range: min={min}, max={max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("sample {value} is outside range [{min}, {max}]")]
    SampleOutOfRange { value: f64, min: f64, max: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
