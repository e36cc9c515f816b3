use hostguest::engine::config as core_config;
use std::path::PathBuf;

/// A fully resolved run: where the tables go and how they are derived.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub core_config: core_config::TabulationConfig,
}
