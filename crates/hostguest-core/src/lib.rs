//! # Host-Guest Measurement Tables
//!
//! A small library for turning curated experimental binding measurements of host-guest
//! complexes (association constants, enthalpies, entropies and free energies, each with an
//! uncertainty) into consistent, publication-ready tables.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Unit-tagged measurement models, the pure thermodynamic
//!   conversion and error-propagation functions, and the file readers and table renderers.
//!
//! - **[`engine`]: The Logic Core.** Derivation configuration and the per-system pipeline
//!   that fills in missing quantities, combines replicates, inflates uncertainties for the
//!   titrant concentration error and rounds every pair to one significant digit.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that tie loading, derivation
//!   and rendering together behind a single entry point.

pub mod core;
pub mod engine;
pub mod workflows;
