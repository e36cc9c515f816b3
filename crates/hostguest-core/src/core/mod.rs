//! # Core Module
//!
//! Stateless building blocks for host-guest thermodynamics tables.
//!
//! - **Data Models** ([`models`]) - Units, tagged measurement values and system records
//! - **Thermodynamics** ([`thermo`]) - Free energy, association constant and entropy
//!   conversions, replicate combination, titrant error inflation and rounding
//! - **File I/O** ([`io`]) - Guest identifier files, the measurement dataset and the
//!   JSON, CSV and LaTeX table renderers

pub mod io;
pub mod models;
pub mod thermo;
