//! Reading the tool's inputs and rendering its outputs.
//!
//! Inputs are the `value;identifier` guest files and the TOML measurement dataset.
//! Outputs are rendered fully in memory by the [`json`], [`delimited`] and [`latex`] modules so
//! that nothing touches the filesystem until every renderer has succeeded.

pub mod dataset;
pub mod delimited;
pub mod error;
pub mod identifiers;
pub mod json;
pub mod latex;
pub(crate) mod number;
