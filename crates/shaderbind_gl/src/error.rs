use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlError {
    #[error("unable to create a constant buffer: {0}")]
    CreateBuffer(String),
    #[error("unable to create a sampler object: {0}")]
    CreateSampler(String),
}
