use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfragraphError {
    #[error(transparent)]
    State(#[from] crate::terraform::StateError),

    #[error(transparent)]
    Source(#[from] crate::sources::SourceError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("output error: {0}")]
    Output(String),
}
