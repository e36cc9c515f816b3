use super::config::ConfigError;
use crate::core::io::dataset::DatasetError;
use crate::core::io::error::RenderError;
use crate::core::io::identifiers::IdentifierError;
use crate::core::thermo::DerivationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load guest identifiers: {0}")]
    Identifiers(#[from] IdentifierError),

    #[error("Failed to load measurements: {0}")]
    Dataset(#[from] DatasetError),

    #[error("No guest files are configured for host '{host}' (system '{system}')")]
    UnknownHost { system: String, host: String },

    #[error("Guest '{guest}' of system '{system}' has no structure or name in the guest files")]
    MissingGuest { system: String, guest: String },

    #[error("Derivation failed for system '{system}': {source}")]
    Derivation {
        system: String,
        #[source]
        source: DerivationError,
    },

    #[error("Failed to render output: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to write '{path}': {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
