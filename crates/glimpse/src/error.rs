use crate::backend::ShaderStage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EffectError {
    #[error("could not get a webgl context")]
    NoContext,

    #[error("failed to compile {stage} shader:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("failed to link shader program:\n{log}")]
    ProgramLink { log: String },

    #[error("graphics backend error: {0}")]
    Backend(String),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

pub type Result<T, E = EffectError> = std::result::Result<T, E>;
