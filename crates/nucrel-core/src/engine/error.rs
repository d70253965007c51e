use super::codec::CodecError;
use super::config::ConfigError;
use crate::core::models::residue::ResidueId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Residue {id} is not available in the supplied lookup")]
    ResidueNotFound { id: ResidueId },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Relation codec error: {source}")]
    Codec {
        #[from]
        source: CodecError,
    },
}
