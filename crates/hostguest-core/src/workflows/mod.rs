//! # Workflows Module
//!
//! End-to-end entry points of the library.
//!
//! - **Tabulation** ([`tabulate`]) - Loads the guest identifier files and the curated
//!   measurement dataset, derives every system, checks the results for internal consistency
//!   and renders the JSON, delimited text and LaTeX tables.

pub mod tabulate;
