use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutoscalerError {
    #[error("Invalid default params: {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type AutoscalerResult<T> = Result<T, AutoscalerError>;
